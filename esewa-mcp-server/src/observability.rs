//! Observability infrastructure for the eSewa MCP server.
//!
//! Provides structured logging and configuration health checks.

use std::io;

use esewa_mcp_bridge::{
    MerchantConfig,
    merchant::{
        Environment, GatewayEndpoints,
        config::{SANDBOX_MERCHANT_CODE, SANDBOX_SECRET_KEY, SANDBOX_TOKEN},
    },
};
use secrecy::ExposeSecret;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log format configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format for development.
    Pretty,
    /// JSON format for production log aggregation.
    Json,
}

impl LogFormat {
    /// Determines log format from environment.
    ///
    /// Checks `LOG_FORMAT` environment variable:
    /// - `json` => JSON format
    /// - `pretty` or unset => Pretty format
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Initializes structured logging.
///
/// Output always goes to stderr; stdout carries the MCP stdio protocol.
///
/// # Environment Variables
///
/// - `LOG_FORMAT`: `json` or `pretty` (default: `pretty`)
/// - `RUST_LOG`: Log level filter (default: `info`)
pub fn init_observability(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}

/// Health check status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// System is healthy and operational.
    Healthy,
    /// System is degraded but operational.
    Degraded,
    /// System is unhealthy and not operational.
    Unhealthy,
}

impl HealthStatus {
    /// Returns string representation for JSON serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Individual health check result.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Check name.
    pub name: String,
    /// Check status.
    pub status: HealthCheckStatus,
    /// Optional message with details.
    pub message: Option<String>,
}

/// Health check status for individual checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthCheckStatus {
    /// Check passed.
    Pass,
    /// Check failed.
    Fail,
    /// Check warning (degraded but operational).
    Warn,
}

impl HealthCheckStatus {
    /// Returns string representation for JSON serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warn => "warn",
        }
    }
}

impl HealthCheck {
    /// Creates a passing health check with a message.
    #[must_use]
    pub fn pass_with_message<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self { name: name.into(), status: HealthCheckStatus::Pass, message: Some(message.into()) }
    }

    /// Creates a failing health check with error message.
    #[must_use]
    pub fn fail<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self { name: name.into(), status: HealthCheckStatus::Fail, message: Some(message.into()) }
    }

    /// Creates a warning health check.
    #[must_use]
    pub fn warn<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self { name: name.into(), status: HealthCheckStatus::Warn, message: Some(message.into()) }
    }

    #[cfg(test)]
    fn pass(name: impl Into<String>) -> Self {
        Self { name: name.into(), status: HealthCheckStatus::Pass, message: None }
    }
}

/// Runs the configuration health checks.
///
/// Sandbox credentials against the production environment and plain-HTTP
/// endpoints are reported as warnings; blank credentials fail.
#[must_use]
pub fn check_configuration(config: &MerchantConfig, endpoints: &GatewayEndpoints) -> Vec<HealthCheck> {
    let production = config.environment == Environment::Production;
    let mut checks = Vec::with_capacity(5);

    checks.push(credential_check(
        "merchant_code",
        &config.merchant_code,
        production && config.merchant_code == SANDBOX_MERCHANT_CODE,
        &config.merchant_code,
    ));
    let secret_key = config.secret_key.expose_secret();
    checks.push(credential_check(
        "secret_key",
        secret_key,
        production && secret_key == SANDBOX_SECRET_KEY,
        "configured",
    ));
    let auth_token = config.auth_token.expose_secret();
    checks.push(credential_check(
        "auth_token",
        auth_token,
        production && auth_token == SANDBOX_TOKEN,
        "configured",
    ));

    let insecure: Vec<&str> = endpoints
        .iter()
        .into_iter()
        .filter(|(_, url)| url.scheme() != "https")
        .map(|(name, _)| name)
        .collect();
    let hosts: Vec<String> = endpoints
        .iter()
        .into_iter()
        .map(|(name, url)| format!("{name}={}", url.host_str().unwrap_or("?")))
        .collect();
    checks.push(if insecure.is_empty() {
        HealthCheck::pass_with_message("endpoints", hosts.join(", "))
    } else {
        HealthCheck::warn("endpoints", format!("not using HTTPS: {}", insecure.join(", ")))
    });

    checks.push(HealthCheck::pass_with_message(
        "http_transport",
        format!(
            "timeout {}s, connect timeout {}s",
            config.http.timeout_secs, config.http.connect_timeout_secs
        ),
    ));

    checks
}

fn credential_check(name: &str, value: &str, sandbox_in_production: bool, message: &str) -> HealthCheck {
    if value.trim().is_empty() {
        HealthCheck::fail(name, "not configured")
    } else if sandbox_in_production {
        HealthCheck::warn(name, "sandbox value used in production")
    } else {
        HealthCheck::pass_with_message(name, message)
    }
}

/// Overall health report for the system.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Overall system status.
    pub status: HealthStatus,
    /// Server version.
    pub version: String,
    /// Merchant code in use.
    pub merchant_code: String,
    /// Gateway environment.
    pub environment: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// Individual health checks.
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    /// Serializes health report to JSON string.
    ///
    /// # Errors
    ///
    /// Returns error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::json!({
            "status": self.status.as_str(),
            "version": self.version,
            "merchant_code": self.merchant_code,
            "environment": self.environment,
            "uptime_secs": self.uptime_secs,
            "checks": self.checks.iter().map(|c| {
                let mut obj = serde_json::json!({
                    "name": c.name,
                    "status": c.status.as_str(),
                });
                if let Some(msg) = &c.message {
                    obj["message"] = serde_json::Value::String(msg.clone());
                }
                obj
            }).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&json)
    }

    /// Determines overall health status from individual checks.
    #[must_use]
    pub fn compute_status(checks: &[HealthCheck]) -> HealthStatus {
        if checks.iter().any(|c| c.status == HealthCheckStatus::Fail) {
            HealthStatus::Unhealthy
        } else if checks.iter().any(|c| c.status == HealthCheckStatus::Warn) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}
