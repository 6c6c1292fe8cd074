//! eSewa ePay v2 integration.
//!
//! This module implements the gateway integration layer:
//!
//! - [`signature`]: canonical field signing (sorted `name=value` pairs, SHA-256, hex)
//! - [`payload`]: request bodies and URLs for the four operations
//! - [`gateway`]: [`EsewaGateway`], which sends requests through a
//!   [`Transport`](crate::transport::Transport)
//! - [`outcome`]: normalization of responses and failures into [`Outcome`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use esewa_mcp_bridge::{
//!     EsewaGateway, MerchantConfig,
//!     esewa::{Amount, PaymentRequest, TransactionId},
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> esewa_mcp_bridge::Result<()> {
//! let gateway = EsewaGateway::from_config(Arc::new(MerchantConfig::default()))?;
//!
//! let request = PaymentRequest::new(
//!     Amount::new(Decimal::from(100))?,
//!     TransactionId::new("TXN-2024-0001")?,
//!     "Annual subscription",
//!     "https://shop.example/esewa/success",
//!     "https://shop.example/esewa/failure",
//!     None,
//! )?;
//!
//! let outcome = gateway.create_payment_session(&request).await;
//! if let Some(session) = outcome.success() {
//!     println!("redirect payer to {}", session.payment_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod gateway;
pub mod outcome;
pub mod payload;
pub mod signature;
pub mod types;

pub use gateway::EsewaGateway;
pub use outcome::{
    Failure, FailureKind, FailureStyle, Outcome, PaymentSession, PaymentStatus, RefundReceipt,
    TransactionVerification,
};
pub use signature::{SignedFields, generate_signature};
pub use types::{Amount, PaymentRequest, RefundRequest, TransactionId, TransactionQuery};

#[cfg(test)]
mod tests {
    mod proptest_signature;
}
