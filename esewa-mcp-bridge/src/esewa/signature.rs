//! Canonical field signing.
//!
//! eSewa authenticates a session by a digest over a fixed set of request fields.
//! The digest is computed over a canonical message:
//!
//! 1. field names sorted in ascending byte order,
//! 2. each field rendered as `name=value`,
//! 3. the renderings joined with `,`,
//!
//! which is then hashed with SHA-256 and hex-encoded (lowercase).
//!
//! # Examples
//!
//! ```
//! use esewa_mcp_bridge::esewa::signature::{canonical_message, generate_signature};
//!
//! let fields = [("total_amount", "100"), ("transaction_uuid", "TXN1"), ("product_code", "EPAYTEST")];
//! assert_eq!(
//!     canonical_message(fields),
//!     "product_code=EPAYTEST,total_amount=100,transaction_uuid=TXN1"
//! );
//! assert_eq!(generate_signature(fields).len(), 64);
//! ```

use std::fmt;

use sha2::{Digest, Sha256};

use crate::esewa::{Amount, TransactionId};

/// Field names participating in the session-creation signature, in wire order.
pub const SESSION_SIGNED_FIELD_NAMES: &str = "total_amount,transaction_uuid,product_code";

/// A value taking part in a signature.
///
/// Numbers render without locale formatting; amounts use their normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Free-form text, rendered verbatim.
    Text(&'a str),
    /// Decimal amount.
    Amount(Amount),
    /// Integer value.
    Integer(i64),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Amount(amount) => write!(f, "{amount}"),
            Self::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a TransactionId> for FieldValue<'a> {
    fn from(value: &'a TransactionId) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<Amount> for FieldValue<'_> {
    fn from(value: Amount) -> Self {
        Self::Amount(value)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Builds the canonical message for a set of fields.
///
/// Insertion order of `fields` does not matter. The input is only read.
#[must_use]
pub fn canonical_message<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: fmt::Display,
{
    let mut pairs: Vec<(K, V)> = fields.into_iter().collect();
    pairs.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    pairs
        .iter()
        .map(|(name, value)| format!("{}={value}", name.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Computes the hex-encoded SHA-256 digest of the canonical message of `fields`.
///
/// # Examples
///
/// ```
/// use esewa_mcp_bridge::esewa::signature::generate_signature;
///
/// let a = generate_signature([("a", 1), ("b", 2)]);
/// let b = generate_signature([("b", 2), ("a", 1)]);
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn generate_signature<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: fmt::Display,
{
    let message = canonical_message(fields);
    hex::encode(Sha256::digest(message.as_bytes()))
}

/// The signed field set of a session-creation request.
#[derive(Debug, Clone, Copy)]
pub struct SignedFields<'a> {
    /// Total amount charged.
    pub total_amount: Amount,
    /// Transaction identifier.
    pub transaction_uuid: &'a TransactionId,
    /// Merchant (product) code.
    pub product_code: &'a str,
}

impl<'a> SignedFields<'a> {
    /// Returns the fields in the order listed by [`SESSION_SIGNED_FIELD_NAMES`].
    #[must_use]
    pub fn fields(&self) -> [(&'static str, FieldValue<'a>); 3] {
        [
            ("total_amount", self.total_amount.into()),
            ("transaction_uuid", self.transaction_uuid.into()),
            ("product_code", FieldValue::Text(self.product_code)),
        ]
    }

    /// Computes the session signature.
    #[must_use]
    pub fn sign(&self) -> String {
        generate_signature(self.fields())
    }
}
