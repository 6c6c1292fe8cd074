//! eSewa MCP Bridge: eSewa ePay v2 payments as MCP tools
//!
//! A Rust library that exposes the eSewa payment gateway through Anthropic's Model
//! Context Protocol (MCP), so AI agents can create payment sessions, verify
//! transactions, issue refunds and query payment status.
//!
//! # What is eSewa MCP Bridge?
//!
//! The gateway integration layer behind four tools:
//!
//! - **Canonical signing**: sorted `name=value` pairs joined with `,`, SHA-256, hex
//! - **Deterministic payloads**: fixed wire order, JSON numbers for amounts
//! - **Uniform results**: every call yields a success payload or an `error`, never a panic
//! - **Explicit configuration**: one validated, immutable [`MerchantConfig`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   AI Agent      │  Any MCP-compatible agent
//! └────────┬────────┘
//!          │ MCP Protocol (JSON-RPC 2.0)
//!          │
//! ┌────────▼────────────────────────────────────────┐
//! │          eSewa MCP Bridge (this crate)          │
//! │  ┌──────────────┐      ┌──────────────────┐     │
//! │  │  MCP Tools   │──────│  EsewaGateway    │     │
//! │  │  (params,    │      │  (payloads,      │     │
//! │  │   schemas)   │      │   signatures)    │     │
//! │  └──────────────┘      └──────────────────┘     │
//! └────────┬────────────────────────────────────────┘
//!          │ HTTPS (Transport)
//!          │
//! ┌────────▼────────┐
//! │  eSewa ePay v2  │  rc-epay.esewa.com.np / epay.esewa.com.np
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Create a Payment Session
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use esewa_mcp_bridge::{
//!     EsewaGateway, MerchantConfig,
//!     mcp::{CreatePaymentSessionParams, create_payment_session},
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> esewa_mcp_bridge::error::Result<()> {
//! // Reads ESEWA_MERCHANT_CODE, ESEWA_SECRET_KEY, ESEWA_TOKEN, ESEWA_ENVIRONMENT
//! let config = Arc::new(MerchantConfig::from_env()?);
//! let gateway = EsewaGateway::from_config(config)?;
//!
//! let params = CreatePaymentSessionParams {
//!     amount: Decimal::from(100),
//!     transaction_id: "TXN-0001".to_string(),
//!     product_name: "Annual subscription".to_string(),
//!     return_url: "https://shop.example.com/esewa/success".to_string(),
//!     cancel_url: "https://shop.example.com/esewa/failure".to_string(),
//!     merchant_code: None,
//! };
//!
//! let outcome = create_payment_session(&gateway, params).await;
//! println!("{}", serde_json::to_string(&outcome).unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Sign Fields Directly
//!
//! ```rust
//! use esewa_mcp_bridge::esewa::signature::{canonical_message, generate_signature};
//!
//! let fields = [("total_amount", "100"), ("transaction_uuid", "TXN1"), ("product_code", "EPAYTEST")];
//!
//! assert_eq!(
//!     canonical_message(fields),
//!     "product_code=EPAYTEST,total_amount=100,transaction_uuid=TXN1"
//! );
//! println!("signature: {}", generate_signature(fields));
//! ```
//!
//! # Module Organization
//!
//! - [`esewa`]: signing, payload construction, gateway operations, result normalization
//! - [`mcp`]: MCP tool parameters and handlers
//! - [`merchant`]: merchant configuration and endpoint resolution
//! - [`transport`]: transport abstraction and the reqwest-based HTTP transport
//! - [`error`]: error types with recovery guidance
//!
//! # Security Considerations
//!
//! - **The secret key never leaves the process**: session requests carry only the digest
//! - **Secrets are wrapped**: the secret key and auth token are `secrecy::SecretString`,
//!   so `Debug` output of configuration and refund bodies never shows them
//! - **HTTPS endpoints**: endpoint overrides must be HTTPS and not loopback addresses
//! - **Bounded calls**: every request honors the configured timeout (30 s by default)
//!
//! # Error Handling
//!
//! Gateway operations return [`Outcome`](esewa::Outcome) values instead of errors. A
//! failure carries an `error` message and a [`FailureKind`](esewa::FailureKind):
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use esewa_mcp_bridge::{
//!     EsewaGateway, MerchantConfig,
//!     esewa::{FailureKind, TransactionId},
//! };
//!
//! # async fn example() -> esewa_mcp_bridge::error::Result<()> {
//! let gateway = EsewaGateway::from_config(Arc::new(MerchantConfig::default()))?;
//! let outcome = gateway.get_payment_status(&TransactionId::new("TXN-0001")?).await;
//!
//! match outcome.failure().map(|failure| failure.kind) {
//!     None => println!("status received"),
//!     Some(FailureKind::Network) => eprintln!("gateway unreachable, try again later"),
//!     Some(FailureKind::Gateway) => eprintln!("gateway rejected the request"),
//!     Some(FailureKind::MalformedResponse) => eprintln!("unexpected gateway response"),
//!     Some(FailureKind::InvalidInput) => eprintln!("fix the input"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from rmcp and reqwest"
)]

pub mod error;
pub mod esewa;
pub mod mcp;
pub mod merchant;
pub mod transport;

pub use error::{BridgeError, Result};
pub use esewa::EsewaGateway;
pub use merchant::MerchantConfig;
