//! Model Context Protocol (MCP) integration.
//!
//! This module holds the tool-facing layer: parameter types with JSON Schema
//! descriptions and the handlers that route each tool to an [`EsewaGateway`]
//! operation. Protocol plumbing (stdio framing, tool registration) lives in the
//! server binary.
//!
//! # Available Tools
//!
//! - `createPaymentSession`: [`create_payment_session`]
//! - `verifyTransaction`: [`verify_transaction`]
//! - `refundPayment`: [`refund_payment`]
//! - `getPaymentStatus`: [`get_payment_status`]
//!
//! # Architecture
//!
//! ```text
//! AI Agent
//!     │
//!     │ MCP Protocol (JSON-RPC 2.0)
//!     ▼
//! MCP Tools (this module)
//!     │
//!     │ Parameter validation
//!     ▼
//! EsewaGateway (esewa module)
//!     │
//!     │ Signed payloads
//!     ▼
//! eSewa ePay v2 (HTTPS)
//! ```
//!
//! [`EsewaGateway`]: crate::esewa::EsewaGateway

pub mod tools;

pub use tools::{
    CreatePaymentSessionParams, GetPaymentStatusParams, RefundPaymentParams,
    VerifyTransactionParams, create_payment_session, get_payment_status, refund_payment,
    verify_transaction,
};
