//! Uniform operation results.
//!
//! Every gateway operation resolves to an [`Outcome`]: either the operation's success
//! payload or a [`Failure`]. Both serialize to the flat JSON shapes MCP callers
//! receive, and neither path raises.
//!
//! ```text
//! createPaymentSession  {paymentUrl, message}  |  {error}
//! verifyTransaction     {status, response}     |  {status: "FAILED", error}
//! refundPayment         {status, message}      |  {status: "FAILED", error}
//! getPaymentStatus      {status, details}      |  {status: "FAILED", error}
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::error::{BridgeError, Result};

/// Status reported for failed verify, refund, and status operations.
pub const FAILED_STATUS: &str = "FAILED";

/// Message returned for a successfully created session.
pub const SESSION_CREATED_MESSAGE: &str = "Payment session created successfully";

/// Refund message used when the gateway does not provide one.
pub const DEFAULT_REFUND_MESSAGE: &str = "Refund processed";

/// Classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection refused, timeout, DNS or TLS failure.
    Network,
    /// Non-2xx status or a failure reported by the gateway.
    Gateway,
    /// 2xx response missing the fields the operation needs.
    MalformedResponse,
    /// Rejected before any request was sent.
    InvalidInput,
}

impl FailureKind {
    /// Returns the kind as a static string for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Gateway => "gateway",
            Self::MalformedResponse => "malformed_response",
            Self::InvalidInput => "invalid_input",
        }
    }
}

/// How a failure is rendered for a given operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStyle {
    /// `{error}` only.
    Bare,
    /// `{status: "FAILED", error}`.
    WithStatus,
}

/// A failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// `"FAILED"` for operations that report a status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    /// Human-readable failure message. Never empty.
    pub error: String,
    /// Failure classification (not serialized).
    #[serde(skip)]
    pub kind: FailureKind,
}

impl Failure {
    /// Builds a failure from an error.
    #[must_use]
    pub fn from_error(error: &BridgeError, style: FailureStyle) -> Self {
        let status = match style {
            FailureStyle::Bare => None,
            FailureStyle::WithStatus => Some(FAILED_STATUS),
        };
        let mut message = error.to_string();
        if message.is_empty() {
            message = "unknown error".to_owned();
        }
        Self { status, error: message, kind: error.kind() }
    }
}

/// Result of a gateway operation.
///
/// Serializes untagged, so callers see either the success payload or the failure
/// fields at the top level.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    /// The operation succeeded.
    Success(T),
    /// The operation failed.
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// Folds a fallible result into an outcome.
    pub fn from_result(result: Result<T>, style: FailureStyle) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(Failure::from_error(&error, style)),
        }
    }

    /// Returns true if the operation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the success payload, if any.
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Returns the error message, if the operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.failure().map(|failure| failure.error.as_str())
    }
}

/// A created payment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    /// Gateway URL the payer is redirected to.
    pub payment_url: String,
    /// Confirmation message.
    pub message: String,
}

/// Result of a transaction verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionVerification {
    /// Gateway-reported status (e.g. `COMPLETE`, `PENDING`).
    pub status: String,
    /// Raw gateway response body.
    pub response: Value,
}

/// Result of a refund request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefundReceipt {
    /// Gateway-reported refund status.
    pub status: String,
    /// Gateway message, or [`DEFAULT_REFUND_MESSAGE`].
    pub message: String,
}

/// Result of a status lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentStatus {
    /// Gateway-reported status.
    pub status: String,
    /// Raw gateway response body.
    pub details: Value,
}

/// Extracts the `status` string from a gateway response body.
pub(crate) fn required_status(body: &Value) -> Result<String> {
    reported_error(body)?;
    body.get("status")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| BridgeError::MalformedResponse("response has no `status` field".to_owned()))
}

/// Fails if a 2xx body carries an eSewa error payload (`error_message`) instead of data.
pub(crate) fn reported_error(body: &Value) -> Result<()> {
    if body.get("status").is_none()
        && body.get("data").is_none()
        && let Some(message) = body.get("error_message").and_then(Value::as_str)
    {
        return Err(BridgeError::GatewayError(message.to_owned()));
    }
    Ok(())
}
