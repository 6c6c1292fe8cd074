//! Merchant configuration types.
//!
//! Configuration is loaded once at startup, from the environment or a TOML file,
//! validated, and then shared read-only by every operation.
//!
//! ```toml
//! merchant_code = "EPAYTEST"
//! secret_key = "8gBm/:&EnhH.1/q"
//! auth_token = "123456"
//! environment = "sandbox"
//!
//! [endpoints]
//! refund = "https://rc-epay.esewa.com.np/api/epay/refund"
//!
//! [http]
//! timeout_secs = 20
//! ```

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::{
    error::{BridgeError, Result},
    merchant::endpoint::{Environment, GatewayEndpoints},
    transport::HttpConfig,
};

/// Environment variable holding the merchant code.
pub const ENV_MERCHANT_CODE: &str = "ESEWA_MERCHANT_CODE";
/// Environment variable holding the secret key.
pub const ENV_SECRET_KEY: &str = "ESEWA_SECRET_KEY";
/// Environment variable holding the refund auth token.
pub const ENV_TOKEN: &str = "ESEWA_TOKEN";
/// Environment variable selecting `sandbox` or `production`.
pub const ENV_ENVIRONMENT: &str = "ESEWA_ENVIRONMENT";

/// Sandbox merchant code published by eSewa.
pub const SANDBOX_MERCHANT_CODE: &str = "EPAYTEST";
/// Sandbox secret key published by eSewa.
pub const SANDBOX_SECRET_KEY: &str = "8gBm/:&EnhH.1/q";
/// Sandbox refund token.
pub const SANDBOX_TOKEN: &str = "123456";

/// Root merchant configuration.
///
/// Missing credentials fall back to the public sandbox values. The secret key and
/// auth token are held as [`SecretString`], so `Debug` output never shows them.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantConfig {
    /// Merchant code assigned by eSewa (`product_code` on the wire).
    #[serde(default = "default_merchant_code")]
    pub merchant_code: String,

    /// Merchant secret key.
    #[serde(default = "default_secret_key")]
    pub secret_key: SecretString,

    /// Static token authorizing refund requests.
    #[serde(default = "default_auth_token")]
    pub auth_token: SecretString,

    /// Gateway deployment.
    #[serde(default)]
    pub environment: Environment,

    /// Endpoint overrides.
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            merchant_code: default_merchant_code(),
            secret_key: default_secret_key(),
            auth_token: default_auth_token(),
            environment: Environment::default(),
            endpoints: EndpointConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

fn default_merchant_code() -> String {
    SANDBOX_MERCHANT_CODE.to_owned()
}

fn default_secret_key() -> SecretString {
    SecretString::from(SANDBOX_SECRET_KEY.to_owned())
}

fn default_auth_token() -> SecretString {
    SecretString::from(SANDBOX_TOKEN.to_owned())
}

impl MerchantConfig {
    /// Loads configuration from the process environment.
    ///
    /// Reads [`ENV_MERCHANT_CODE`], [`ENV_SECRET_KEY`], [`ENV_TOKEN`] and
    /// [`ENV_ENVIRONMENT`]; unset or empty variables keep their sandbox defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if a value is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if a value is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use esewa_mcp_bridge::merchant::{Environment, MerchantConfig};
    /// use secrecy::ExposeSecret;
    ///
    /// let config = MerchantConfig::from_lookup(|name| match name {
    ///     "ESEWA_MERCHANT_CODE" => Some("SHOP42".to_owned()),
    ///     "ESEWA_ENVIRONMENT" => Some("production".to_owned()),
    ///     _ => None,
    /// })?;
    ///
    /// assert_eq!(config.merchant_code, "SHOP42");
    /// assert_eq!(config.environment, Environment::Production);
    /// assert_eq!(config.auth_token.expose_secret(), "123456");
    /// # Ok::<(), esewa_mcp_bridge::BridgeError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let mut config = Self::default();
        if let Some(code) = read(ENV_MERCHANT_CODE) {
            config.merchant_code = code;
        }
        if let Some(secret) = read(ENV_SECRET_KEY) {
            config.secret_key = SecretString::from(secret);
        }
        if let Some(token) = read(ENV_TOKEN) {
            config.auth_token = SecretString::from(token);
        }
        if let Some(environment) = read(ENV_ENVIRONMENT) {
            config.environment = environment.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if TOML parsing or validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| BridgeError::ConfigError(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its contents are invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| BridgeError::ConfigError(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Resolves the gateway endpoints for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if an endpoint override is not a valid URL.
    pub fn gateway_endpoints(&self) -> Result<GatewayEndpoints> {
        GatewayEndpoints::resolve(self.environment, &self.endpoints)
    }

    /// Validates the configuration.
    ///
    /// This method checks for:
    /// - Non-blank merchant code, secret key and auth token
    /// - Endpoint overrides that are HTTPS and not loopback addresses
    /// - HTTP timeouts within bounds
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::ConfigError` if any validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use esewa_mcp_bridge::merchant::MerchantConfig;
    ///
    /// let toml = r#"
    ///     merchant_code = "EPAYTEST"
    ///     environment = "sandbox"
    /// "#;
    ///
    /// let config: MerchantConfig = toml::from_str(toml).unwrap();
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        validate_credential("merchant_code", &self.merchant_code)?;
        validate_credential("secret_key", self.secret_key.expose_secret())?;
        validate_credential("auth_token", self.auth_token.expose_secret())?;

        self.endpoints.validate()?;
        self.http.validate()?;

        // overrides are well-formed; make sure they also resolve
        self.gateway_endpoints()?;

        Ok(())
    }
}

fn validate_credential(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BridgeError::ConfigError(format!("{name} cannot be empty")));
    }
    if value.chars().any(char::is_control) {
        return Err(BridgeError::ConfigError(format!("{name} contains control characters")));
    }
    Ok(())
}

/// Per-endpoint URL overrides.
///
/// Unset entries use the environment's built-in endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointConfig {
    /// Session creation endpoint.
    pub session: Option<String>,
    /// Verification endpoint.
    pub verify: Option<String>,
    /// Refund endpoint.
    pub refund: Option<String>,
    /// Status lookup base endpoint.
    pub status: Option<String>,
}

impl EndpointConfig {
    /// Validates endpoint overrides for security issues.
    ///
    /// Every override must be an HTTPS URL whose host is not localhost or a
    /// loopback address.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::ConfigError` if any endpoint is invalid.
    pub fn validate(&self) -> Result<()> {
        let endpoints = [
            ("session", &self.session),
            ("verify", &self.verify),
            ("refund", &self.refund),
            ("status", &self.status),
        ];

        for (name, endpoint) in endpoints {
            if let Some(url) = endpoint {
                validate_endpoint_url(name, url)?;
            }
        }

        Ok(())
    }
}

/// Validates an endpoint override.
pub(crate) fn validate_endpoint_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| {
        BridgeError::ConfigError(format!("endpoint '{name}' is invalid '{value}': {e}"))
    })?;

    if url.scheme() != "https" {
        return Err(BridgeError::ConfigError(format!(
            "endpoint '{name}' must use HTTPS, got: {}",
            url.scheme()
        )));
    }

    if let Some(host) = url.host_str() {
        let host_lower = host.to_lowercase();
        if host_lower == "localhost"
            || host_lower == "::1"
            || host_lower == "[::1]"
            || host_lower.starts_with("127.")
        {
            return Err(BridgeError::ConfigError(format!(
                "endpoint '{name}' must not be localhost or loopback: {host}"
            )));
        }
    }

    Ok(())
}
