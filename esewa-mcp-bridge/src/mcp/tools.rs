//! MCP tool parameters and handlers for eSewa operations.
//!
//! Each handler converts raw tool parameters into validated request types and runs
//! the matching [`EsewaGateway`] operation. Invalid parameters are reported through
//! the same [`Outcome`] failure shape as gateway failures, so a tool call always
//! yields a result object.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::warn;

use crate::{
    error::{BridgeError, Result},
    esewa::{
        Amount, EsewaGateway, FailureStyle, Outcome, PaymentRequest, PaymentSession, PaymentStatus,
        RefundReceipt, RefundRequest, TransactionId, TransactionQuery, TransactionVerification,
    },
    transport::Transport,
};

/// Parameters for `createPaymentSession`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionParams {
    /// Amount to charge, greater than zero.
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Unique identifier for this payment attempt.
    pub transaction_id: String,
    /// Name of the product being purchased.
    #[serde(default)]
    pub product_name: String,
    /// Absolute URL the payer returns to after a successful payment.
    pub return_url: String,
    /// Absolute URL the payer returns to after a failed or cancelled payment.
    pub cancel_url: String,
    /// Merchant code to use instead of the configured one.
    #[serde(default)]
    pub merchant_code: Option<String>,
}

impl CreatePaymentSessionParams {
    /// Validates the parameters into a [`PaymentRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidInput`] if any field is invalid.
    pub fn into_request(self) -> Result<PaymentRequest> {
        PaymentRequest::new(
            Amount::new(self.amount)?,
            TransactionId::new(self.transaction_id)?,
            self.product_name,
            self.return_url,
            self.cancel_url,
            self.merchant_code,
        )
    }
}

/// Parameters for `verifyTransaction`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTransactionParams {
    /// Transaction identifier used when the session was created.
    pub transaction_id: String,
    /// Total amount of the transaction. Sent without trailing fractional zeros,
    /// so `500.00` is queried as `500`.
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub amount: Option<Decimal>,
}

impl VerifyTransactionParams {
    /// Validates the parameters into a [`TransactionQuery`].
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidInput`] if the id is blank or the amount is
    /// missing or not positive.
    pub fn into_query(self) -> Result<TransactionQuery> {
        let transaction_id = TransactionId::new(self.transaction_id)?;
        let amount = self.amount.ok_or_else(|| {
            BridgeError::InvalidInput("amount is required to verify a transaction".to_owned())
        })?;
        Ok(TransactionQuery { transaction_id, amount: Some(Amount::new(amount)?) })
    }
}

/// Parameters for `refundPayment`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundPaymentParams {
    /// Transaction to refund.
    pub transaction_id: String,
    /// Amount to refund, greater than zero.
    #[schemars(with = "f64")]
    pub amount: Decimal,
}

impl RefundPaymentParams {
    /// Validates the parameters into a [`RefundRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidInput`] if any field is invalid.
    pub fn into_request(self) -> Result<RefundRequest> {
        Ok(RefundRequest {
            transaction_id: TransactionId::new(self.transaction_id)?,
            amount: Amount::new(self.amount)?,
        })
    }
}

/// Parameters for `getPaymentStatus`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPaymentStatusParams {
    /// Transaction to look up.
    pub transaction_id: String,
}

/// Handles `createPaymentSession`.
pub async fn create_payment_session<T: Transport>(
    gateway: &EsewaGateway<T>,
    params: CreatePaymentSessionParams,
) -> Outcome<PaymentSession> {
    match params.into_request() {
        Ok(request) => gateway.create_payment_session(&request).await,
        Err(error) => rejected("createPaymentSession", error, FailureStyle::Bare),
    }
}

/// Handles `verifyTransaction`.
pub async fn verify_transaction<T: Transport>(
    gateway: &EsewaGateway<T>,
    params: VerifyTransactionParams,
) -> Outcome<TransactionVerification> {
    match params.into_query() {
        Ok(query) => gateway.verify_transaction(&query).await,
        Err(error) => rejected("verifyTransaction", error, FailureStyle::WithStatus),
    }
}

/// Handles `refundPayment`.
pub async fn refund_payment<T: Transport>(
    gateway: &EsewaGateway<T>,
    params: RefundPaymentParams,
) -> Outcome<RefundReceipt> {
    match params.into_request() {
        Ok(request) => gateway.refund_payment(&request).await,
        Err(error) => rejected("refundPayment", error, FailureStyle::WithStatus),
    }
}

/// Handles `getPaymentStatus`.
pub async fn get_payment_status<T: Transport>(
    gateway: &EsewaGateway<T>,
    params: GetPaymentStatusParams,
) -> Outcome<PaymentStatus> {
    match TransactionId::new(params.transaction_id) {
        Ok(transaction_id) => gateway.get_payment_status(&transaction_id).await,
        Err(error) => rejected("getPaymentStatus", error, FailureStyle::WithStatus),
    }
}

fn rejected<T>(tool: &'static str, error: BridgeError, style: FailureStyle) -> Outcome<T> {
    warn!(tool, error = %error, "rejected tool parameters");
    Outcome::from_result(Err(error), style)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use rust_decimal_macros::dec;
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::{esewa::FailureKind, merchant::MerchantConfig, transport::TransportResponse};

    /// Counts calls and answers every request with the same JSON body.
    #[derive(Debug, Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    impl CountingTransport {
        fn reply(&self) -> Result<TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TransportResponse {
                status: 200,
                body: br#"{"status":"COMPLETE","data":"https://pay/redirect"}"#.to_vec(),
                headers: Vec::new(),
            })
        }
    }

    impl Transport for CountingTransport {
        async fn get<'a>(&'a self, _url: &'a Url) -> Result<TransportResponse> {
            self.reply()
        }

        async fn post_json<'a>(&'a self, _url: &'a Url, _body: &'a [u8]) -> Result<TransportResponse> {
            self.reply()
        }

        fn protocol_name(&self) -> &'static str {
            "counting"
        }
    }

    fn gateway() -> EsewaGateway<CountingTransport> {
        EsewaGateway::new(Arc::new(MerchantConfig::default()), CountingTransport::default()).unwrap()
    }

    #[test]
    fn test_params_deserialize_camel_case() {
        let params: CreatePaymentSessionParams = serde_json::from_value(json!({
            "amount": 100.5,
            "transactionId": "TXN1",
            "productName": "Book",
            "returnUrl": "https://shop.example/ok",
            "cancelUrl": "https://shop.example/cancel"
        }))
        .unwrap();

        assert_eq!(params.amount, dec!(100.5));
        assert_eq!(params.transaction_id, "TXN1");
        assert!(params.merchant_code.is_none());

        let request = params.into_request().unwrap();
        assert_eq!(request.amount.to_string(), "100.5");
    }

    #[test]
    fn test_params_schema_names() {
        let schema = serde_json::to_value(schemars::schema_for!(CreatePaymentSessionParams)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for name in ["amount", "transactionId", "productName", "returnUrl", "cancelUrl", "merchantCode"] {
            assert!(properties.contains_key(name), "missing {name}");
        }
        assert_eq!(properties["amount"]["type"], "number");
    }

    #[test]
    fn test_verify_amount_schema_describes_normalization() {
        let schema = serde_json::to_value(schemars::schema_for!(VerifyTransactionParams)).unwrap();
        let description = schema["properties"]["amount"]["description"].as_str().unwrap();
        assert!(description.contains("`500.00` is queried as `500`"), "{description}");
    }

    #[tokio::test]
    async fn test_invalid_amount_never_reaches_gateway() {
        let gateway = gateway();
        let params = RefundPaymentParams { transaction_id: "TXN1".to_owned(), amount: dec!(0) };

        let outcome = refund_payment(&gateway, params).await;
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::InvalidInput);
        assert_eq!(failure.status, Some("FAILED"));
        assert_eq!(gateway.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_transaction_id_rejected() {
        let gateway = gateway();

        let outcome =
            get_payment_status(&gateway, GetPaymentStatusParams { transaction_id: " ".to_owned() })
                .await;
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::InvalidInput);

        let outcome = create_payment_session(
            &gateway,
            CreatePaymentSessionParams {
                amount: dec!(10),
                transaction_id: String::new(),
                product_name: "Book".to_owned(),
                return_url: "https://shop.example/ok".to_owned(),
                cancel_url: "https://shop.example/cancel".to_owned(),
                merchant_code: None,
            },
        )
        .await;
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("status").is_none());
        assert!(value["error"].as_str().unwrap().contains("transactionId"));
        assert_eq!(gateway.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_verify_requires_amount() {
        let gateway = gateway();
        let params: VerifyTransactionParams =
            serde_json::from_value(json!({"transactionId": "T1"})).unwrap();

        let outcome = verify_transaction(&gateway, params).await;
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_valid_params_dispatch_once() {
        let gateway = gateway();

        let outcome = verify_transaction(
            &gateway,
            VerifyTransactionParams { transaction_id: "T1".to_owned(), amount: Some(dec!(500)) },
        )
        .await;
        assert_eq!(outcome.success().unwrap().status, "COMPLETE");

        let outcome = get_payment_status(
            &gateway,
            GetPaymentStatusParams { transaction_id: "T1".to_owned() },
        )
        .await;
        assert!(outcome.is_success());
        assert_eq!(gateway.transport().calls.load(Ordering::SeqCst), 2);
    }
}
