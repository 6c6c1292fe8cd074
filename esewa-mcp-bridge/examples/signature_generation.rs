//! Signature generation example.
//!
//! Shows the canonical message and digest for a session request, and how the
//! amount form affects neither.
//!
//! # Running this example
//!
//! ```bash
//! cargo run --example signature_generation
//! ```

#![allow(
    clippy::print_stdout,
    clippy::uninlined_format_args,
    reason = "examples are allowed to use println and simple formatting"
)]

use esewa_mcp_bridge::esewa::{
    Amount, SignedFields, TransactionId,
    signature::{SESSION_SIGNED_FIELD_NAMES, canonical_message},
};
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let transaction_uuid = TransactionId::new("TXN1")?;

    for amount in [Decimal::new(100, 0), Decimal::new(10_000, 2)] {
        let signed = SignedFields {
            total_amount: Amount::new(amount)?,
            transaction_uuid: &transaction_uuid,
            product_code: "EPAYTEST",
        };

        println!("amount input:      {}", amount);
        println!("signed fields:     {}", SESSION_SIGNED_FIELD_NAMES);
        println!("canonical message: {}", canonical_message(signed.fields()));
        println!("signature:         {}", signed.sign());
        println!();
    }

    Ok(())
}
