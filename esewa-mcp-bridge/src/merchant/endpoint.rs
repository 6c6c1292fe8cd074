//! Gateway endpoint resolution.
//!
//! Each [`Environment`] has a built-in endpoint set; individual endpoints can be
//! overridden through [`EndpointConfig`].

use serde::Deserialize;
use url::Url;

use crate::{
    error::{BridgeError, Result},
    merchant::config::EndpointConfig,
};

const SANDBOX_SESSION_URL: &str = "https://rc-epay.esewa.com.np/api/epay/main/v2/form";
const SANDBOX_VERIFY_URL: &str = "https://rc-epay.esewa.com.np/api/epay/transaction/status/";
const SANDBOX_REFUND_URL: &str = "https://rc-epay.esewa.com.np/api/epay/refund";
const SANDBOX_STATUS_URL: &str = "https://rc-epay.esewa.com.np/api/epay/transaction/";

const PRODUCTION_SESSION_URL: &str = "https://epay.esewa.com.np/api/epay/main/v2/form";
const PRODUCTION_VERIFY_URL: &str = "https://epay.esewa.com.np/api/epay/transaction/status/";
const PRODUCTION_REFUND_URL: &str = "https://epay.esewa.com.np/api/epay/refund";
const PRODUCTION_STATUS_URL: &str = "https://epay.esewa.com.np/api/epay/transaction/";

/// eSewa deployment to talk to.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Test deployment (`rc-epay.esewa.com.np`).
    #[default]
    Sandbox,
    /// Live deployment (`epay.esewa.com.np`).
    Production,
}

impl Environment {
    /// Returns the environment name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    const fn default_urls(self) -> [&'static str; 4] {
        match self {
            Self::Sandbox => {
                [SANDBOX_SESSION_URL, SANDBOX_VERIFY_URL, SANDBOX_REFUND_URL, SANDBOX_STATUS_URL]
            }
            Self::Production => [
                PRODUCTION_SESSION_URL,
                PRODUCTION_VERIFY_URL,
                PRODUCTION_REFUND_URL,
                PRODUCTION_STATUS_URL,
            ],
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = BridgeError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "sandbox" | "test" => Ok(Self::Sandbox),
            "production" | "live" => Ok(Self::Production),
            other => Err(BridgeError::ConfigError(format!(
                "unknown environment '{other}', expected 'sandbox' or 'production'"
            ))),
        }
    }
}

/// Resolved gateway endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEndpoints {
    /// Session creation (POST).
    pub session: Url,
    /// Transaction verification (GET with query).
    pub verify: Url,
    /// Refund (POST).
    pub refund: Url,
    /// Status lookup base; the transaction id is appended as a path segment.
    pub status: Url,
}

impl GatewayEndpoints {
    /// Resolves endpoints for `environment`, applying `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if an endpoint is not a valid URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use esewa_mcp_bridge::merchant::{EndpointConfig, Environment, GatewayEndpoints};
    ///
    /// let endpoints = GatewayEndpoints::resolve(Environment::Production, &EndpointConfig::default())?;
    /// assert_eq!(endpoints.refund.as_str(), "https://epay.esewa.com.np/api/epay/refund");
    /// # Ok::<(), esewa_mcp_bridge::BridgeError>(())
    /// ```
    pub fn resolve(environment: Environment, overrides: &EndpointConfig) -> Result<Self> {
        let [session, verify, refund, status] = environment.default_urls();
        Ok(Self {
            session: parse_endpoint("session", overrides.session.as_deref().unwrap_or(session))?,
            verify: parse_endpoint("verify", overrides.verify.as_deref().unwrap_or(verify))?,
            refund: parse_endpoint("refund", overrides.refund.as_deref().unwrap_or(refund))?,
            status: parse_endpoint("status", overrides.status.as_deref().unwrap_or(status))?,
        })
    }

    /// Returns `(name, url)` pairs for reporting.
    #[must_use]
    pub fn iter(&self) -> [(&'static str, &Url); 4] {
        [
            ("session", &self.session),
            ("verify", &self.verify),
            ("refund", &self.refund),
            ("status", &self.status),
        ]
    }
}

fn parse_endpoint(name: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| BridgeError::ConfigError(format!("endpoint '{name}' is invalid: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(BridgeError::ConfigError(format!("endpoint '{name}' is not a base URL")));
    }
    Ok(url)
}
