//! HTTP transport implementation.
//!
//! This module provides HTTP/1.1 and HTTP/2 transport using reqwest.

use std::{sync::LazyLock, time::Duration};

use reqwest::{Client, Method, header};
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{BridgeError, Result},
    transport::{Transport, TransportResponse},
};

/// Longest slice of a rejected response body echoed into the error message.
const ERROR_BODY_EXCERPT_CHARS: usize = 200;

/// Default HTTP client with connection pooling enabled.
///
/// Shared by every [`HttpTransport::new`] so default transports reuse one pool.
static DEFAULT_HTTP_CLIENT: LazyLock<std::result::Result<Client, String>> = LazyLock::new(|| {
    build_client(&HttpConfig::default()).map_err(|e| e.to_string())
});

fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .pool_idle_timeout(Duration::from_secs(90));

    builder = match config.http_version {
        HttpVersion::Http1 => builder.http1_only(),
        HttpVersion::Http2 => builder.http2_prior_knowledge(),
        HttpVersion::Auto => builder,
    };

    builder.build().map_err(BridgeError::HttpError)
}

/// Rejects schemes reqwest should never be pointed at.
fn validate_url(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BridgeError::TransportError(format!(
            "unsupported URL scheme: {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(BridgeError::TransportError(format!("URL missing host: {url}")));
    }
    Ok(())
}

fn body_excerpt(body: &[u8]) -> String {
    String::from_utf8_lossy(body).chars().take(ERROR_BODY_EXCERPT_CHARS).collect()
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Supports connection pooling and keep-alive. Every request is bounded by the
/// configured timeout.
///
/// # Examples
///
/// ```
/// use esewa_mcp_bridge::transport::{HttpConfig, HttpTransport, HttpVersion, Transport};
///
/// let config = HttpConfig { timeout_secs: 15, http_version: HttpVersion::Http1, ..Default::default() };
/// let transport = HttpTransport::with_config(&config)?;
/// assert_eq!(transport.protocol_name(), "http/1.1");
/// # Ok::<(), esewa_mcp_bridge::BridgeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Uses a shared client for connection pooling efficiency.
    ///
    /// # Errors
    ///
    /// Returns error if the shared client could not be built (TLS backend failure).
    pub fn new() -> Result<Self> {
        let client = DEFAULT_HTTP_CLIENT.as_ref().map_err(|e| {
            BridgeError::TransportError(format!("failed to create HTTP client: {e}"))
        })?;
        Ok(Self { client: client.clone(), http_version: HttpVersion::Auto })
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let client = build_client(config)?;
        Ok(Self { client, http_version: config.http_version })
    }

    #[instrument(skip(self, method, url, body), fields(method = %method, host = url.host_str()))]
    async fn execute_request(
        &self,
        method: Method,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<TransportResponse> {
        validate_url(url)?;

        let mut request = self
            .client
            .request(method, url.clone())
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let response = request.send().await?;
        let status = response.status();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let response_body = response.bytes().await.map_err(BridgeError::HttpError)?.to_vec();
        debug!(status = status.as_u16(), bytes = response_body.len(), "gateway responded");

        if !status.is_success() {
            return Err(BridgeError::GatewayError(format!(
                "gateway returned status {}: {}",
                status.as_u16(),
                body_excerpt(&response_body)
            )));
        }

        Ok(TransportResponse { status: status.as_u16(), body: response_body, headers })
    }
}

impl Transport for HttpTransport {
    async fn get<'a>(&'a self, url: &'a Url) -> Result<TransportResponse> {
        self.execute_request(Method::GET, url, None).await
    }

    async fn post_json<'a>(&'a self, url: &'a Url, body: &'a [u8]) -> Result<TransportResponse> {
        self.execute_request(Method::POST, url, Some(body)).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}
