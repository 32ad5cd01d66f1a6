//! Request signing for the MEXC contract API

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::common::errors::{RelayError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Canonical query string: parameters sorted by key, joined as
/// `key=value&...`. The input is never mutated; insertion order is
/// irrelevant.
pub(crate) fn canonical_query(params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign a parameter set for an authenticated MEXC request.
///
/// The signed payload is the canonical query string followed by
/// `&timestamp={timestamp}`; the separator is emitted even for an empty
/// parameter set. Returns the HMAC-SHA256 digest as lowercase hex.
pub fn sign_query(secret: &str, params: &[(String, String)], timestamp: i64) -> Result<String> {
    let payload = format!("{}&timestamp={}", canonical_query(params), timestamp);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| RelayError::Signature(format!("failed to create HMAC: {}", e)))?;
    mac.update(payload.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}
