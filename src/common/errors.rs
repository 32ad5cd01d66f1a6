//! Error types for the relay

use thiserror::Error;

/// Result type alias using our RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

/// Main error type for relay operations
#[derive(Error, Debug)]
pub enum RelayError {
    /// Malformed or out-of-range instruction fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or incomplete credentials for the requested exchange
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Signature computation failure
    #[error("Signature error: {0}")]
    Signature(String),

    /// The exchange rejected the call; carries the exchange's own code and message
    #[error("Exchange error (code {code}): {message}")]
    Exchange { code: i64, message: String },

    /// Transport-level failure reaching the exchange
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Unrecognized exchange name
    #[error("Unsupported exchange: {0}")]
    UnsupportedExchange(String),

    /// Unrecognized trading action
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// HTTP-equivalent status for the response envelope.
    ///
    /// Input and configuration problems resolve locally to 400; everything
    /// that reached (or failed to reach) an exchange is 500. The 403 case is
    /// owned by the inbound gate, never by this layer.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::Validation(_)
            | RelayError::Configuration(_)
            | RelayError::UnsupportedExchange(_)
            | RelayError::UnsupportedAction(_) => 400,
            _ => 500,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Connectivity(err.to_string())
    }
}
