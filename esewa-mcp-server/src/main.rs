//! eSewa MCP Server - exposes eSewa payment operations as MCP tools over stdio.
//!
//! # Configuration
//!
//! - `ESEWA_CONFIG`: path to a TOML merchant configuration file. When unset, the
//!   configuration is read from `ESEWA_MERCHANT_CODE`, `ESEWA_SECRET_KEY`,
//!   `ESEWA_TOKEN` and `ESEWA_ENVIRONMENT`, with sandbox defaults.
//! - `LOG_FORMAT`: `json` or `pretty` (default: `pretty`), written to stderr.
//! - `RUST_LOG`: log filter (default: `info`).

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from rmcp and reqwest"
)]

mod observability;
mod server;

use std::sync::Arc;

use esewa_mcp_bridge::{EsewaGateway, MerchantConfig};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{error, info};

use crate::{
    observability::{LogFormat, init_observability},
    server::EsewaServer,
};

/// Environment variable naming the TOML configuration file.
const CONFIG_PATH_ENV: &str = "ESEWA_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_observability(LogFormat::from_env());

    let config = load_config().inspect_err(|e| error!(error = %e, "invalid configuration"))?;
    info!(
        merchant_code = %config.merchant_code,
        environment = config.environment.as_str(),
        "starting esewa-mcp-server"
    );

    let gateway = EsewaGateway::from_config(Arc::new(config))?;
    let service = EsewaServer::new(Arc::new(gateway)).serve(stdio()).await?;

    let reason = service.waiting().await?;
    info!(?reason, "esewa-mcp-server stopped");
    Ok(())
}

fn load_config() -> esewa_mcp_bridge::Result<MerchantConfig> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => {
            info!(path = %path, "loading configuration file");
            MerchantConfig::from_file(path)
        }
        _ => MerchantConfig::from_env(),
    }
}
