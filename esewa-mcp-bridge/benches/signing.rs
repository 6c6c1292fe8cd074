//! Benchmarks for signature generation and payload construction.
//!
//! Run with: `cargo bench --bench signing`

#![allow(clippy::let_underscore_must_use, reason = "Criterion benchmarks ignore results")]
#![allow(clippy::unwrap_used, reason = "Benchmark fixtures are known-valid")]
#![allow(missing_docs, reason = "Benchmark functions are self-documenting")]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use esewa_mcp_bridge::{
    MerchantConfig,
    esewa::{
        Amount, PaymentRequest, SignedFields, TransactionId,
        payload::build_session_payload,
        signature::generate_signature,
    },
};
use rust_decimal::Decimal;

fn setup_request() -> PaymentRequest {
    PaymentRequest::new(
        Amount::new(Decimal::new(1_234_550, 2)).unwrap(),
        TransactionId::new("241028-103000-0001").unwrap(),
        "Annual subscription",
        "https://shop.example.com/esewa/success",
        "https://shop.example.com/esewa/failure",
        None,
    )
    .unwrap()
}

/// Session signature over the three signed fields.
fn bench_session_signature(c: &mut Criterion) {
    let request = setup_request();

    c.bench_function("session_signature", |b| {
        b.iter(|| {
            let signed = SignedFields {
                total_amount: black_box(request.amount),
                transaction_uuid: black_box(&request.transaction_id),
                product_code: black_box("EPAYTEST"),
            };
            black_box(signed.sign())
        });
    });
}

/// Generic signing as the number of fields grows.
fn bench_signature_field_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("signature_field_count");

    for count in &[3usize, 10, 50] {
        let fields: Vec<(String, String)> =
            (0..*count).rev().map(|i| (format!("field_{i:03}"), format!("value-{i}"))).collect();

        group.bench_with_input(BenchmarkId::new("fields", count), &fields, |b, fields| {
            b.iter(|| black_box(generate_signature(black_box(fields.iter()))));
        });
    }

    group.finish();
}

/// Full session payload: signing plus JSON encoding.
fn bench_session_payload(c: &mut Criterion) {
    let request = setup_request();
    let config = MerchantConfig::default();

    c.bench_function("session_payload_json", |b| {
        b.iter(|| {
            let payload = build_session_payload(black_box(&request), black_box(&config));
            black_box(serde_json::to_vec(&payload))
        });
    });
}

criterion_group!(
    benches,
    bench_session_signature,
    bench_signature_field_count,
    bench_session_payload
);
criterion_main!(benches);
