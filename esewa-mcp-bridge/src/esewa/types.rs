//! Validated request types for gateway operations.
//!
//! Raw MCP parameters are converted into these types before any payload is built,
//! so the builders and operations can rely on their invariants.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer, ser::Error as _};
use serde_json::value::RawValue;
use url::Url;

use crate::error::{BridgeError, Result};

/// A strictly positive payment amount.
///
/// The value is stored in normalized form (no trailing fractional zeros), which is
/// also its canonical string form: `100.00` renders as `100` and `100.50` as `100.5`.
/// The same rendering is used for signing, query strings, and JSON bodies, so one
/// logical amount always serializes identically.
///
/// # Examples
///
/// ```
/// use esewa_mcp_bridge::esewa::Amount;
/// use rust_decimal::Decimal;
///
/// let amount = Amount::new(Decimal::new(10050, 2))?;
/// assert_eq!(amount.to_string(), "100.5");
///
/// assert!(Amount::new(Decimal::ZERO).is_err());
/// # Ok::<(), esewa_mcp_bridge::BridgeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an amount, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidInput`] if `value` is not greater than zero.
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(BridgeError::InvalidInput(format!(
                "amount must be greater than zero, got {value}"
            )));
        }
        Ok(Self(value.normalize()))
    }

    /// Returns the normalized decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amounts go on the wire as JSON numbers spelled exactly like their canonical
/// string, never through a float, so the body carries the text that was signed.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let number = RawValue::from_string(self.0.to_string()).map_err(S::Error::custom)?;
        number.serialize(serializer)
    }
}

/// Caller-assigned identifier of one payment attempt.
///
/// Opaque: the only check is that it is not blank. It is passed to the gateway
/// exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wraps a transaction identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidInput`] if the identifier is empty or whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(BridgeError::InvalidInput("transactionId cannot be empty".to_owned()));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Input for creating a payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount to charge.
    pub amount: Amount,
    /// Unique id of this payment attempt.
    pub transaction_id: TransactionId,
    /// Human-readable product name (not sent to the gateway).
    pub product_name: String,
    /// Where the gateway redirects after a successful payment.
    pub return_url: String,
    /// Where the gateway redirects after a failed or cancelled payment.
    pub cancel_url: String,
    /// Overrides the configured merchant code for this session.
    pub merchant_code: Option<String>,
}

impl PaymentRequest {
    /// Builds a request, validating the redirect URLs.
    ///
    /// The URLs are kept verbatim; parsing only checks they are absolute.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidInput`] if a redirect URL is not absolute or the
    /// merchant code override is blank.
    pub fn new(
        amount: Amount,
        transaction_id: TransactionId,
        product_name: impl Into<String>,
        return_url: impl Into<String>,
        cancel_url: impl Into<String>,
        merchant_code: Option<String>,
    ) -> Result<Self> {
        let return_url = return_url.into();
        let cancel_url = cancel_url.into();
        validate_redirect_url("returnUrl", &return_url)?;
        validate_redirect_url("cancelUrl", &cancel_url)?;

        if merchant_code.as_deref().is_some_and(|code| code.trim().is_empty()) {
            return Err(BridgeError::InvalidInput("merchantCode cannot be blank".to_owned()));
        }

        Ok(Self {
            amount,
            transaction_id,
            product_name: product_name.into(),
            return_url,
            cancel_url,
            merchant_code,
        })
    }
}

fn validate_redirect_url(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BridgeError::InvalidInput(format!("{name} is required")));
    }
    let url = Url::parse(value)
        .map_err(|e| BridgeError::InvalidInput(format!("{name} is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BridgeError::InvalidInput(format!("{name} must be an http(s) URL")));
    }
    Ok(())
}

/// Lookup of a transaction on the gateway.
///
/// `amount` is only needed for verification; status lookups ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Transaction to look up.
    pub transaction_id: TransactionId,
    /// Expected total amount.
    pub amount: Option<Amount>,
}

/// Refund of a previously completed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundRequest {
    /// Transaction to refund.
    pub transaction_id: TransactionId,
    /// Amount to refund.
    pub amount: Amount,
}
