//! Gateway request construction.
//!
//! Builders are pure: they combine validated caller input with the merchant
//! configuration and never touch the network.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use url::Url;

use crate::{
    error::{BridgeError, Result},
    esewa::{
        PaymentRequest, RefundRequest, TransactionId, TransactionQuery,
        signature::{SESSION_SIGNED_FIELD_NAMES, SignedFields},
        types::Amount,
    },
    merchant::MerchantConfig,
};

/// Session-creation body.
///
/// Field order is the wire order.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPayload<'a> {
    /// Amount charged.
    pub amount: Amount,
    /// Redirect target on failure or cancellation.
    pub failure_url: &'a str,
    /// Always zero.
    pub product_delivery_charge: u32,
    /// Always zero.
    pub product_service_charge: u32,
    /// Merchant code.
    pub product_code: &'a str,
    /// Digest over the fields named in `signed_field_names`.
    pub signature: String,
    /// Comma-separated list of signed fields.
    pub signed_field_names: &'static str,
    /// Redirect target on success.
    pub success_url: &'a str,
    /// Always zero.
    pub tax_amount: u32,
    /// Total amount, equal to `amount`.
    pub total_amount: Amount,
    /// Transaction identifier.
    pub transaction_uuid: &'a TransactionId,
}

/// Builds the signed session-creation body.
///
/// The merchant code override on `request` takes precedence over the configured one,
/// and is also the code that gets signed.
///
/// # Examples
///
/// ```
/// use esewa_mcp_bridge::{
///     esewa::{Amount, PaymentRequest, TransactionId, payload::build_session_payload},
///     merchant::MerchantConfig,
/// };
/// use rust_decimal::Decimal;
///
/// let request = PaymentRequest::new(
///     Amount::new(Decimal::from(100))?,
///     TransactionId::new("TXN1")?,
///     "Book",
///     "https://shop.example/success",
///     "https://shop.example/failure",
///     None,
/// )?;
/// let config = MerchantConfig::default();
/// let payload = build_session_payload(&request, &config);
///
/// assert_eq!(payload.product_code, "EPAYTEST");
/// assert_eq!(payload.signature.len(), 64);
/// # Ok::<(), esewa_mcp_bridge::BridgeError>(())
/// ```
#[must_use]
pub fn build_session_payload<'a>(
    request: &'a PaymentRequest,
    config: &'a MerchantConfig,
) -> SessionPayload<'a> {
    let product_code = request.merchant_code.as_deref().unwrap_or(&config.merchant_code);

    let signature = SignedFields {
        total_amount: request.amount,
        transaction_uuid: &request.transaction_id,
        product_code,
    }
    .sign();

    SessionPayload {
        amount: request.amount,
        failure_url: &request.cancel_url,
        product_delivery_charge: 0,
        product_service_charge: 0,
        product_code,
        signature,
        signed_field_names: SESSION_SIGNED_FIELD_NAMES,
        success_url: &request.return_url,
        tax_amount: 0,
        total_amount: request.amount,
        transaction_uuid: &request.transaction_id,
    }
}

/// Builds the verification URL.
///
/// Appends `product_code`, `total_amount` and `transaction_uuid`, in that order.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidInput`] if `query` carries no amount.
pub fn build_verify_url(base: &Url, query: &TransactionQuery, config: &MerchantConfig) -> Result<Url> {
    let amount = query.amount.ok_or_else(|| {
        BridgeError::InvalidInput("amount is required to verify a transaction".to_owned())
    })?;

    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("product_code", &config.merchant_code)
        .append_pair("total_amount", &amount.to_string())
        .append_pair("transaction_uuid", query.transaction_id.as_str());
    Ok(url)
}

/// Builds the status lookup URL: `<base>/<transaction id>?product_code=<code>`.
///
/// The transaction id becomes exactly one percent-encoded path segment.
///
/// # Errors
///
/// Returns [`BridgeError::ConfigError`] if `base` cannot take path segments.
///
/// # Examples
///
/// ```
/// use esewa_mcp_bridge::{
///     esewa::{TransactionId, payload::build_status_url},
///     merchant::MerchantConfig,
/// };
/// use url::Url;
///
/// let base = Url::parse("https://rc-epay.esewa.com.np/api/epay/transaction/").unwrap();
/// let id = TransactionId::new("order 7/a")?;
/// let url = build_status_url(&base, &id, &MerchantConfig::default())?;
///
/// assert_eq!(
///     url.as_str(),
///     "https://rc-epay.esewa.com.np/api/epay/transaction/order%207%2Fa?product_code=EPAYTEST"
/// );
/// # Ok::<(), esewa_mcp_bridge::BridgeError>(())
/// ```
pub fn build_status_url(base: &Url, transaction_id: &TransactionId, config: &MerchantConfig) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| BridgeError::ConfigError(format!("status endpoint is not a base URL: {base}")))?
        .pop_if_empty()
        .push(transaction_id.as_str());
    url.query_pairs_mut().append_pair("product_code", &config.merchant_code);
    Ok(url)
}

/// Refund body.
///
/// The token stays wrapped until serialization.
#[derive(Debug, Clone, Serialize)]
pub struct RefundPayload<'a> {
    /// Merchant code.
    pub product_code: &'a str,
    /// Transaction to refund.
    pub transaction_uuid: &'a TransactionId,
    /// Amount to refund.
    pub refund_amount: Amount,
    /// Merchant auth token.
    #[serde(serialize_with = "expose_token")]
    pub token: &'a SecretString,
}

fn expose_token<S: Serializer>(token: &&SecretString, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(token.expose_secret())
}

/// Builds the refund body.
#[must_use]
pub fn build_refund_payload<'a>(
    request: &'a RefundRequest,
    config: &'a MerchantConfig,
) -> RefundPayload<'a> {
    RefundPayload {
        product_code: &config.merchant_code,
        transaction_uuid: &request.transaction_id,
        refund_amount: request.amount,
        token: &config.auth_token,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;
    use sha2::{Digest, Sha256};

    use super::*;

    fn request(amount: rust_decimal::Decimal, merchant_code: Option<&str>) -> PaymentRequest {
        PaymentRequest::new(
            Amount::new(amount).unwrap(),
            TransactionId::new("TXN1").unwrap(),
            "Book",
            "https://shop.example/success",
            "https://shop.example/failure",
            merchant_code.map(str::to_owned),
        )
        .unwrap()
    }

    #[test]
    fn test_session_payload_wire_order() {
        let request = request(dec!(100), None);
        let config = MerchantConfig::default();
        let body = serde_json::to_string(&build_session_payload(&request, &config)).unwrap();

        let keys = [
            "amount",
            "failure_url",
            "product_delivery_charge",
            "product_service_charge",
            "product_code",
            "signature",
            "signed_field_names",
            "success_url",
            "tax_amount",
            "total_amount",
            "transaction_uuid",
        ];
        let positions: Vec<usize> =
            keys.iter().map(|key| body.find(&format!("\"{key}\":")).unwrap()).collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "unexpected key order: {body}");
    }

    #[test]
    fn test_session_payload_values() {
        let request = request(dec!(100.00), None);
        let config = MerchantConfig::default();
        let value = serde_json::to_value(build_session_payload(&request, &config)).unwrap();

        let expected_signature = hex::encode(Sha256::digest(
            b"product_code=EPAYTEST,total_amount=100,transaction_uuid=TXN1",
        ));
        assert_eq!(
            value,
            json!({
                "amount": 100,
                "failure_url": "https://shop.example/failure",
                "product_delivery_charge": 0,
                "product_service_charge": 0,
                "product_code": "EPAYTEST",
                "signature": expected_signature,
                "signed_field_names": "total_amount,transaction_uuid,product_code",
                "success_url": "https://shop.example/success",
                "tax_amount": 0,
                "total_amount": 100,
                "transaction_uuid": "TXN1"
            })
        );
    }

    #[test]
    fn test_session_payload_never_contains_secret() {
        let request = request(dec!(100), None);
        let config = MerchantConfig::default();
        let body = serde_json::to_string(&build_session_payload(&request, &config)).unwrap();
        assert!(!body.contains(config.secret_key.expose_secret()));
    }

    #[test]
    fn test_session_payload_merchant_override_is_signed() {
        let config = MerchantConfig::default();
        let overridden = request(dec!(100), Some("SHOP42"));
        let default = request(dec!(100), None);

        let payload = build_session_payload(&overridden, &config);
        assert_eq!(payload.product_code, "SHOP42");
        assert_ne!(payload.signature, build_session_payload(&default, &config).signature);
    }

    #[test]
    fn test_verify_url_query() {
        let base = Url::parse("https://rc-epay.esewa.com.np/api/epay/transaction/status/").unwrap();
        let query = TransactionQuery {
            transaction_id: TransactionId::new("T1").unwrap(),
            amount: Some(Amount::new(dec!(500)).unwrap()),
        };

        let url = build_verify_url(&base, &query, &MerchantConfig::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://rc-epay.esewa.com.np/api/epay/transaction/status/\
             ?product_code=EPAYTEST&total_amount=500&transaction_uuid=T1"
        );
    }

    #[test]
    fn test_verify_url_encodes_reserved_characters() {
        let base = Url::parse("https://rc-epay.esewa.com.np/api/epay/transaction/status/").unwrap();
        let query = TransactionQuery {
            transaction_id: TransactionId::new("a&b=c").unwrap(),
            amount: Some(Amount::new(dec!(1.50)).unwrap()),
        };

        let url = build_verify_url(&base, &query, &MerchantConfig::default()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[1], ("total_amount".to_owned(), "1.5".to_owned()));
        assert_eq!(pairs[2], ("transaction_uuid".to_owned(), "a&b=c".to_owned()));
    }

    #[test]
    fn test_verify_url_requires_amount() {
        let base = Url::parse("https://rc-epay.esewa.com.np/api/epay/transaction/status/").unwrap();
        let query = TransactionQuery { transaction_id: TransactionId::new("T1").unwrap(), amount: None };
        assert!(matches!(
            build_verify_url(&base, &query, &MerchantConfig::default()),
            Err(BridgeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_status_url_with_and_without_trailing_slash() {
        let config = MerchantConfig::default();
        let id = TransactionId::new("TXN1").unwrap();

        for base in [
            "https://rc-epay.esewa.com.np/api/epay/transaction/",
            "https://rc-epay.esewa.com.np/api/epay/transaction",
        ] {
            let url = build_status_url(&Url::parse(base).unwrap(), &id, &config).unwrap();
            assert_eq!(
                url.as_str(),
                "https://rc-epay.esewa.com.np/api/epay/transaction/TXN1?product_code=EPAYTEST"
            );
        }
    }

    #[test]
    fn test_refund_payload() {
        let config = MerchantConfig::default();
        let request = RefundRequest {
            transaction_id: TransactionId::new("TXN9").unwrap(),
            amount: Amount::new(dec!(250.50)).unwrap(),
        };

        let payload = build_refund_payload(&request, &config);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "product_code": "EPAYTEST",
                "transaction_uuid": "TXN9",
                "refund_amount": 250.5,
                "token": "123456"
            })
        );
        assert!(!format!("{payload:?}").contains("123456"));
    }

    #[test]
    fn test_wire_amounts_match_signed_form() {
        let config = MerchantConfig::default();

        for value in [dec!(0.0000001), dec!(12345678901234567.89), dec!(100.50)] {
            let request = request(value, None);
            let signed = request.amount.to_string();
            let body = serde_json::to_string(&build_session_payload(&request, &config)).unwrap();

            assert!(body.contains(&format!("\"amount\":{signed},")), "{body}");
            assert!(body.contains(&format!("\"total_amount\":{signed},")), "{body}");
            let expected_signature = hex::encode(Sha256::digest(format!(
                "product_code=EPAYTEST,total_amount={signed},transaction_uuid=TXN1"
            )));
            assert!(body.contains(&expected_signature));

            let refund = RefundRequest {
                transaction_id: TransactionId::new("TXN1").unwrap(),
                amount: request.amount,
            };
            let body = serde_json::to_string(&build_refund_payload(&refund, &config)).unwrap();
            assert!(body.contains(&format!("\"refund_amount\":{signed},")), "{body}");
        }
    }
}
