//! The four eSewa gateway operations.
//!
//! Each operation validates nothing itself (its input types already carry their
//! invariants), builds one request, performs one transport call, and normalizes the
//! response into an [`Outcome`]. Operations never return `Err`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{BridgeError, Result},
    esewa::{
        PaymentRequest, RefundRequest, TransactionId, TransactionQuery,
        outcome::{
            DEFAULT_REFUND_MESSAGE, FailureStyle, Outcome, PaymentSession, PaymentStatus,
            RefundReceipt, SESSION_CREATED_MESSAGE, TransactionVerification, reported_error,
            required_status,
        },
        payload::{build_refund_payload, build_session_payload, build_status_url, build_verify_url},
    },
    merchant::{GatewayEndpoints, MerchantConfig},
    transport::{HttpTransport, Transport},
};

/// Client for the eSewa ePay v2 API.
///
/// Holds the immutable merchant configuration, the resolved endpoints and the
/// transport. Safe to share behind an [`Arc`] across concurrent operations.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use esewa_mcp_bridge::{
///     EsewaGateway, MerchantConfig,
///     esewa::{TransactionId, TransactionQuery},
/// };
///
/// # async fn example() -> esewa_mcp_bridge::Result<()> {
/// let gateway = EsewaGateway::from_config(Arc::new(MerchantConfig::from_env()?))?;
///
/// let status = gateway.get_payment_status(&TransactionId::new("TXN1")?).await;
/// println!("{}", serde_json::to_string(&status).unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EsewaGateway<T: Transport = HttpTransport> {
    config: Arc<MerchantConfig>,
    endpoints: GatewayEndpoints,
    transport: T,
}

impl EsewaGateway<HttpTransport> {
    /// Creates a gateway using an [`HttpTransport`] built from `config.http`.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoints cannot be resolved or the HTTP client cannot
    /// be built.
    pub fn from_config(config: Arc<MerchantConfig>) -> Result<Self> {
        let transport = HttpTransport::with_config(&config.http)?;
        Self::new(config, transport)
    }
}

impl<T: Transport> EsewaGateway<T> {
    /// Creates a gateway over an explicit transport.
    ///
    /// The configuration is used as given; callers loading it from outside sources
    /// should go through the validating constructors on [`MerchantConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if an endpoint is not a valid URL.
    pub fn new(config: Arc<MerchantConfig>, transport: T) -> Result<Self> {
        let endpoints = config.gateway_endpoints()?;
        Ok(Self { config, endpoints, transport })
    }

    /// Returns the merchant configuration.
    #[must_use]
    pub fn config(&self) -> &MerchantConfig {
        &self.config
    }

    /// Returns the resolved gateway endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &GatewayEndpoints {
        &self.endpoints
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Creates a payment session and returns the payer redirect URL.
    ///
    /// Success: `{paymentUrl, message}`. Failure: `{error}`.
    #[instrument(skip(self, request), fields(transaction_id = %request.transaction_id, operation = "create_payment_session"))]
    pub async fn create_payment_session(&self, request: &PaymentRequest) -> Outcome<PaymentSession> {
        info!(amount = %request.amount, "creating payment session");
        let result = self.try_create_payment_session(request).await;
        finish(result, FailureStyle::Bare)
    }

    /// Verifies a transaction against the gateway.
    ///
    /// Success: `{status, response}`. Failure: `{status: "FAILED", error}`.
    #[instrument(skip(self, query), fields(transaction_id = %query.transaction_id, operation = "verify_transaction"))]
    pub async fn verify_transaction(&self, query: &TransactionQuery) -> Outcome<TransactionVerification> {
        info!("verifying transaction");
        let result = self.try_verify_transaction(query).await;
        finish(result, FailureStyle::WithStatus)
    }

    /// Requests a refund.
    ///
    /// Success: `{status, message}`. Failure: `{status: "FAILED", error}`.
    #[instrument(skip(self, request), fields(transaction_id = %request.transaction_id, operation = "refund_payment"))]
    pub async fn refund_payment(&self, request: &RefundRequest) -> Outcome<RefundReceipt> {
        info!(amount = %request.amount, "requesting refund");
        let result = self.try_refund_payment(request).await;
        finish(result, FailureStyle::WithStatus)
    }

    /// Looks up the current status of a transaction.
    ///
    /// Success: `{status, details}`. Failure: `{status: "FAILED", error}`.
    #[instrument(skip(self, transaction_id), fields(transaction_id = %transaction_id, operation = "get_payment_status"))]
    pub async fn get_payment_status(&self, transaction_id: &TransactionId) -> Outcome<PaymentStatus> {
        info!("fetching payment status");
        let result = self.try_get_payment_status(transaction_id).await;
        finish(result, FailureStyle::WithStatus)
    }

    async fn try_create_payment_session(&self, request: &PaymentRequest) -> Result<PaymentSession> {
        let payload = build_session_payload(request, &self.config);
        let body = encode_body(&payload)?;

        let response = self.transport.post_json(&self.endpoints.session, &body).await?;
        let body = response.json()?;
        reported_error(&body)?;

        let payment_url = body.get("data").and_then(Value::as_str).ok_or_else(|| {
            BridgeError::MalformedResponse("response has no `data` redirect URL".to_owned())
        })?;

        Ok(PaymentSession {
            payment_url: payment_url.to_owned(),
            message: SESSION_CREATED_MESSAGE.to_owned(),
        })
    }

    async fn try_verify_transaction(&self, query: &TransactionQuery) -> Result<TransactionVerification> {
        let url = build_verify_url(&self.endpoints.verify, query, &self.config)?;
        debug!(url = %url, "built verification URL");

        let response = self.transport.get(&url).await?;
        let body = response.json()?;
        let status = required_status(&body)?;

        Ok(TransactionVerification { status, response: body })
    }

    async fn try_refund_payment(&self, request: &RefundRequest) -> Result<RefundReceipt> {
        let payload = build_refund_payload(request, &self.config);
        let body = encode_body(&payload)?;

        let response = self.transport.post_json(&self.endpoints.refund, &body).await?;
        let body = response.json()?;
        let status = required_status(&body)?;

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(DEFAULT_REFUND_MESSAGE)
            .to_owned();

        Ok(RefundReceipt { status, message })
    }

    async fn try_get_payment_status(&self, transaction_id: &TransactionId) -> Result<PaymentStatus> {
        let url = build_status_url(&self.endpoints.status, transaction_id, &self.config)?;
        debug!(url = %url, "built status URL");

        let response = self.transport.get(&url).await?;
        let body = response.json()?;
        let status = required_status(&body)?;

        Ok(PaymentStatus { status, details: body })
    }
}

fn encode_body<S: serde::Serialize>(payload: &S) -> Result<Vec<u8>> {
    serde_json::to_vec(payload)
        .map_err(|e| BridgeError::InvalidInput(format!("cannot encode request body: {e}")))
}

fn finish<T>(result: Result<T>, style: FailureStyle) -> Outcome<T> {
    match &result {
        Ok(_) => info!("operation completed"),
        Err(error) => warn!(error_kind = error.kind().as_str(), error = %error, "operation failed"),
    }
    Outcome::from_result(result, style)
}
