//! Gateway call budget.
//!
//! Every eSewa operation makes exactly one outbound call and never retries, so
//! `timeout_secs` is the upper bound on how long a tool invocation can wait on the
//! gateway. When it elapses the operation reports a network failure
//! (`{status: "FAILED", error}`, or `{error}` for session creation).
//!
//! Read from the `[http]` table of the merchant configuration file:
//!
//! ```toml
//! [http]
//! timeout_secs = 20
//! connect_timeout_secs = 5
//! http_version = "http1"
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Default bound on one gateway call, connect through last response byte.
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;
/// Largest accepted gateway call bound.
pub const MAX_GATEWAY_TIMEOUT_SECS: u64 = 300;
/// Default bound on establishing the TLS connection to eSewa.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Largest accepted connect bound.
pub const MAX_CONNECT_TIMEOUT_SECS: u64 = 60;

/// Connection and timeout settings for calls to the eSewa gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Idle connections kept per gateway host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Bound on one gateway call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bound on connecting to the gateway, in seconds. Must not exceed `timeout_secs`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Protocol used towards the gateway.
    #[serde(default)]
    pub http_version: HttpVersion,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            http_version: HttpVersion::default(),
        }
    }
}

impl HttpConfig {
    /// Checks that every gateway call stays bounded.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if:
    /// - `timeout_secs` is outside `1..=MAX_GATEWAY_TIMEOUT_SECS`
    /// - `connect_timeout_secs` is outside `1..=MAX_CONNECT_TIMEOUT_SECS`
    /// - `connect_timeout_secs` is longer than `timeout_secs`
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_GATEWAY_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return Err(BridgeError::ConfigError(format!(
                "gateway timeout_secs must be between 1 and {MAX_GATEWAY_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            )));
        }
        if !(1..=MAX_CONNECT_TIMEOUT_SECS).contains(&self.connect_timeout_secs) {
            return Err(BridgeError::ConfigError(format!(
                "gateway connect_timeout_secs must be between 1 and {MAX_CONNECT_TIMEOUT_SECS}, got {}",
                self.connect_timeout_secs
            )));
        }
        if self.connect_timeout_secs > self.timeout_secs {
            return Err(BridgeError::ConfigError(format!(
                "gateway connect_timeout_secs ({}) exceeds timeout_secs ({})",
                self.connect_timeout_secs, self.timeout_secs
            )));
        }
        Ok(())
    }

    /// Bound on one gateway call.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Bound on connecting to the gateway.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Protocol used towards the gateway.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 with prior knowledge.
    Http2,
    /// Whatever ALPN negotiates with the gateway.
    #[default]
    Auto,
}

// session, verify, refund and status share one host per environment
fn default_pool_max_idle() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    DEFAULT_GATEWAY_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gateway_budget() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.http_version, HttpVersion::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_table_from_merchant_toml() {
        let toml = "
            timeout_secs = 20
            connect_timeout_secs = 5
            http_version = \"http2\"
        ";

        let config: HttpConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert_eq!(config.http_version, HttpVersion::Http2);
    }

    #[test]
    fn test_partial_http_table_keeps_gateway_defaults() {
        let config: HttpConfig = toml::from_str("timeout_secs = 60").unwrap();
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
    }

    #[test]
    fn test_unbounded_gateway_call_rejected() {
        let zero = HttpConfig { timeout_secs: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(BridgeError::ConfigError(msg)) if msg.contains("timeout_secs")));

        let too_long = HttpConfig { timeout_secs: MAX_GATEWAY_TIMEOUT_SECS + 1, ..Default::default() };
        assert!(too_long.validate().is_err());

        let bad_connect = HttpConfig { connect_timeout_secs: MAX_CONNECT_TIMEOUT_SECS + 1, ..Default::default() };
        assert!(bad_connect.validate().is_err());

        let edges = HttpConfig { timeout_secs: MAX_GATEWAY_TIMEOUT_SECS, connect_timeout_secs: 1, ..Default::default() };
        assert!(edges.validate().is_ok());
    }

    #[test]
    fn test_connect_longer_than_call_rejected() {
        let config = HttpConfig { timeout_secs: 5, connect_timeout_secs: 10, ..Default::default() };
        assert!(matches!(config.validate(), Err(BridgeError::ConfigError(msg)) if msg.contains("exceeds")));

        let equal = HttpConfig { timeout_secs: 5, connect_timeout_secs: 5, ..Default::default() };
        assert!(equal.validate().is_ok());
    }

    #[test]
    fn test_unknown_http_version_rejected() {
        let result: std::result::Result<HttpConfig, _> = toml::from_str("http_version = \"http3\"");
        assert!(result.is_err());
    }
}
