//! Request signing for the Bybit v5 API

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::common::errors::{RelayError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Canonical query string over JSON-typed parameters: key-sorted
/// `key=value` pairs, with strings rendered bare and booleans/numbers in
/// their JSON form (`true`, `20`). The input is never mutated.
pub(crate) fn canonical_query(params: &[(String, Value)]) -> String {
    let mut sorted: Vec<&(String, Value)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{}={}", key, s),
            other => format!("{}={}", key, other),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign a parameter set for an authenticated Bybit v5 request.
///
/// The signed payload is `{timestamp}{api_key}{canonical query}`; the digest
/// is HMAC-SHA256 over the API secret, lowercase hex.
pub fn sign_request(
    secret: &str,
    api_key: &str,
    params: &[(String, Value)],
    timestamp: i64,
) -> Result<String> {
    let payload = format!("{}{}{}", timestamp, api_key, canonical_query(params));

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| RelayError::Signature(format!("failed to create HMAC: {}", e)))?;
    mac.update(payload.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Authentication headers for Bybit requests.
///
/// Unlike MEXC and Binance, Bybit carries timestamp and signature in
/// headers; the signature covers the parameters wherever they travel
/// (JSON body for POST, query string for GET).
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub api_key: String,
    pub timestamp: i64,
    pub signature: String,
}

/// Build the header triple for one request.
pub fn generate_auth_headers(
    api_key: &str,
    api_secret: &str,
    params: &[(String, Value)],
    timestamp: i64,
) -> Result<AuthHeaders> {
    let signature = sign_request(api_secret, api_key, params, timestamp)?;

    Ok(AuthHeaders {
        api_key: api_key.to_string(),
        timestamp,
        signature,
    })
}

impl AuthHeaders {
    /// Add authentication headers to a reqwest RequestBuilder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("X-BAPI-API-KEY", &self.api_key)
            .header("X-BAPI-TIMESTAMP", self.timestamp.to_string())
            .header("X-BAPI-SIGN", &self.signature)
    }
}
