//! Error types for the eSewa MCP bridge.
//!
//! This module defines all error types that can occur while talking to the eSewa
//! gateway. All errors implement the standard [`std::error::Error`] trait via
//! [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Network Errors** ([`BridgeError::HttpError`]): transport failures (connect, timeout, DNS,
//!   TLS)
//! - **Gateway Errors** ([`BridgeError::GatewayError`]): non-2xx responses or gateway-reported
//!   failures
//! - **Malformed Responses** ([`BridgeError::MalformedResponse`]): 2xx bodies missing expected
//!   fields
//! - **Validation Errors** ([`BridgeError::InvalidInput`], [`BridgeError::ConfigError`]): rejected
//!   before any request leaves the process
//!
//! Operations never surface these errors directly to MCP callers; they are folded into
//! an [`Outcome`](crate::esewa::Outcome) at the operation boundary.
//!
//! # Examples
//!
//! ```
//! use esewa_mcp_bridge::error::{BridgeError, Result};
//!
//! fn require_id(id: &str) -> Result<&str> {
//!     if id.is_empty() {
//!         return Err(BridgeError::InvalidInput("transactionId is required".to_owned()));
//!     }
//!     Ok(id)
//! }
//!
//! assert!(require_id("").is_err());
//! ```

use thiserror::Error;

use crate::esewa::FailureKind;

/// Result type alias for bridge operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur in the eSewa bridge.
///
/// The `Display` output of each variant is what MCP callers see in the `error` field
/// of a failed operation, so messages are short and never contain credentials.
///
/// # Error Recovery
///
/// - **Transient errors** ([`HttpError`](Self::HttpError)): the caller may retry; the bridge
///   itself never does
/// - **Validation errors** ([`InvalidInput`](Self::InvalidInput)): fix input and call again
/// - **Gateway errors** ([`GatewayError`](Self::GatewayError),
///   [`MalformedResponse`](Self::MalformedResponse)): check merchant credentials and the
///   transaction state on the gateway
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum BridgeError {
    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]. Common causes include:
    /// - Network timeouts (default: 30 seconds)
    /// - Connection refused
    /// - DNS resolution failures
    /// - TLS errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The gateway rejected the request.
    ///
    /// Raised for non-2xx HTTP statuses. The message carries the status code and a
    /// short excerpt of the gateway's body.
    #[error("Gateway error: {0}")]
    GatewayError(String),

    /// The gateway answered 2xx but the body was not what the operation expects.
    ///
    /// Common causes include a non-JSON body or a missing `data` / `status` field.
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// Caller input failed validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use esewa_mcp_bridge::error::BridgeError;
    ///
    /// let err = BridgeError::InvalidInput("amount must be greater than zero".to_owned());
    /// assert_eq!(err.to_string(), "Invalid input: amount must be greater than zero");
    /// ```
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Merchant configuration is unusable.
    ///
    /// Raised while loading configuration at startup: empty credentials, bad endpoint
    /// overrides, unparsable TOML, or out-of-range timeouts.
    #[error("Invalid merchant configuration: {0}")]
    ConfigError(String),

    /// Transport-level precondition failed before a request was sent.
    #[error("Transport error: {0}")]
    TransportError(String),
}

impl BridgeError {
    /// Classifies this error into the failure taxonomy reported to callers.
    ///
    /// # Examples
    ///
    /// ```
    /// use esewa_mcp_bridge::{error::BridgeError, esewa::FailureKind};
    ///
    /// let err = BridgeError::GatewayError("gateway returned status 500".to_owned());
    /// assert_eq!(err.kind(), FailureKind::Gateway);
    /// ```
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::HttpError(_) | Self::TransportError(_) => FailureKind::Network,
            Self::GatewayError(_) => FailureKind::Gateway,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
            Self::InvalidInput(_) | Self::ConfigError(_) => FailureKind::InvalidInput,
        }
    }
}
