//! Configuration types

use serde::{Deserialize, Serialize};

use crate::common::types::Exchange;

/// Main relay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// MEXC account configuration
    #[serde(default)]
    pub mexc: Option<ExchangeSettings>,
    /// Binance account configuration
    #[serde(default)]
    pub binance: Option<ExchangeSettings>,
    /// Bybit account configuration
    #[serde(default)]
    pub bybit: Option<ExchangeSettings>,
    /// Audit collector configuration (optional)
    #[serde(default)]
    pub audit: Option<AuditConfig>,
    /// General relay settings
    #[serde(default)]
    pub settings: RelaySettings,
}

impl RelayConfig {
    /// Settings block for one exchange, if configured.
    pub fn exchange(&self, exchange: Exchange) -> Option<&ExchangeSettings> {
        match exchange {
            Exchange::Mexc => self.mexc.as_ref(),
            Exchange::Binance => self.binance.as_ref(),
            Exchange::Bybit => self.bybit.as_ref(),
        }
    }
}

/// Per-exchange account configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExchangeSettings {
    /// API key for authenticated requests
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret for signing requests
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Base URL override; adapters fall back to the production endpoint
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ExchangeSettings {
    /// Credentials pair, when both halves are present.
    pub fn credentials(&self) -> Option<ExchangeCredentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => {
                Some(ExchangeCredentials::new(key.clone(), secret.clone()))
            }
            _ => None,
        }
    }
}

/// General relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Leverage applied when an instruction omits it
    #[serde(default = "default_leverage")]
    pub default_leverage: u32,
    /// Probe `get_account_info` before every trade
    #[serde(default)]
    pub preflight_check: bool,
    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_leverage: default_leverage(),
            preflight_check: false,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_leverage() -> u32 {
    20
}

fn default_request_timeout() -> u64 {
    30
}

/// Audit collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Collector base URL
    pub url: String,
    /// Bearer token for the internal collector
    pub service_key: String,
}

/// API credentials for authenticated requests.
///
/// The secret never appears in Debug output, logs, or serialized forms.
#[derive(Clone)]
pub struct ExchangeCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ExchangeCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self { api_key, api_secret }
    }
}

impl std::fmt::Debug for ExchangeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
