//! Payment flow example against the eSewa sandbox.
//!
//! Creates a payment session, then looks up the transaction status. Without
//! overrides the public sandbox credentials are used.
//!
//! # Running this example
//!
//! ```bash
//! export ESEWA_ENVIRONMENT=sandbox
//! cargo run --example payment_flow
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::uninlined_format_args,
    reason = "examples are allowed to use println and simple formatting"
)]

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use esewa_mcp_bridge::{
    EsewaGateway, MerchantConfig,
    esewa::{Amount, FailureKind, PaymentRequest, TransactionId},
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("esewa_mcp_bridge=debug").init();

    let config = Arc::new(MerchantConfig::from_env()?);
    println!("Merchant: {} ({})", config.merchant_code, config.environment.as_str());

    let gateway = EsewaGateway::from_config(config)?;

    let stamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let transaction_id = TransactionId::new(format!("demo-{stamp}"))?;

    let request = PaymentRequest::new(
        Amount::new(Decimal::new(10_050, 2))?,
        transaction_id.clone(),
        "Demo product",
        "https://shop.example.com/esewa/success",
        "https://shop.example.com/esewa/failure",
        None,
    )?;

    let session = gateway.create_payment_session(&request).await;
    match session.failure() {
        None => println!("Session: {}", serde_json::to_string_pretty(&session)?),
        Some(failure) if failure.kind == FailureKind::Network => {
            eprintln!("Gateway unreachable: {}", failure.error);
            return Ok(());
        }
        Some(failure) => eprintln!("Session failed ({}): {}", failure.kind.as_str(), failure.error),
    }

    let status = gateway.get_payment_status(&transaction_id).await;
    println!("Status: {}", serde_json::to_string_pretty(&status)?);

    Ok(())
}
