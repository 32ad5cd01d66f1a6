//! Request signing for the Binance futures API

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::common::errors::{RelayError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Query string in canonical form: key-sorted `key=value` pairs. Does not
/// mutate the input.
pub(crate) fn canonical_query(params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign a parameter set for an authenticated Binance futures request.
///
/// Binance verifies an HMAC-SHA256 digest over the query string; the relay
/// signs the canonical form plus `&timestamp={timestamp}` and sends the
/// query in that same order. Lowercase hex output.
pub fn sign_query(secret: &str, params: &[(String, String)], timestamp: i64) -> Result<String> {
    let payload = format!("{}&timestamp={}", canonical_query(params), timestamp);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| RelayError::Signature(format!("failed to create HMAC: {}", e)))?;
    mac.update(payload.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}
