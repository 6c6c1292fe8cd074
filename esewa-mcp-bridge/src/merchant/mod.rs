//! Merchant configuration and gateway endpoints.

pub mod config;
pub mod endpoint;

pub use config::{EndpointConfig, MerchantConfig};
pub use endpoint::{Environment, GatewayEndpoints};
