//! Transport abstraction for gateway calls.
//!
//! Gateway operations build URLs and bodies; a [`Transport`] moves the bytes.
//! [`HttpTransport`] is the production implementation over reqwest. Tests and
//! alternative front ends can supply their own.
//!
//! # Examples
//!
//! ```rust,no_run
//! use esewa_mcp_bridge::transport::{HttpTransport, Transport};
//! use url::Url;
//!
//! # async fn example() -> esewa_mcp_bridge::error::Result<()> {
//! let transport = HttpTransport::new()?;
//! let url = Url::parse("https://rc-epay.esewa.com.np/api/epay/transaction/TXN1?product_code=EPAYTEST")
//!     .expect("valid URL");
//!
//! let response = transport.get(&url).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use serde_json::Value;
use url::Url;

use crate::error::{BridgeError, Result};

pub mod config;
pub mod http;

pub use config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_GATEWAY_TIMEOUT_SECS, HttpConfig, HttpVersion,
    MAX_CONNECT_TIMEOUT_SECS, MAX_GATEWAY_TIMEOUT_SECS,
};
pub use http::HttpTransport;

/// Response from transport operations.
///
/// Only 2xx responses are returned as `Ok`; implementations map other statuses to
/// [`BridgeError::GatewayError`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MalformedResponse`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body)
            .map_err(|e| BridgeError::MalformedResponse(format!("response is not valid JSON: {e}")))
    }
}

/// Outbound HTTP collaborator used by the gateway operations.
///
/// Implementations must be safe to share across concurrent operations and must
/// bound each call with a timeout.
pub trait Transport: Send + Sync {
    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent, times out, or the gateway answers
    /// with a non-2xx status.
    fn get<'a>(&'a self, url: &'a Url)
    -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Executes a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent, times out, or the gateway answers
    /// with a non-2xx status.
    fn post_json<'a>(
        &'a self,
        url: &'a Url,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    ///
    /// Examples: "http/1.1", "http/2", "http"
    fn protocol_name(&self) -> &'static str;
}
