//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{AuditConfig, ExchangeSettings, RelayConfig};
use crate::common::errors::{RelayError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Flat credential variables (MEXC_API_KEY, BYBIT_API_SECRET, ...)
/// 2. Environment variables (prefixed with RELAY_)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<RelayConfig> {
    let mut builder = Config::builder();

    // Add default config file if it exists
    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // Add environment variables with RELAY_ prefix
    builder = builder.add_source(
        Environment::with_prefix("RELAY")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| RelayError::Configuration(e.to_string()))?;

    let mut config: RelayConfig = config
        .try_deserialize()
        .map_err(|e| RelayError::Configuration(e.to_string()))?;

    apply_env_credentials(&mut config);
    Ok(config)
}

/// Overlay the flat per-exchange credential variables onto a loaded
/// configuration. Values set in the environment win over the file.
pub fn apply_env_credentials(config: &mut RelayConfig) {
    overlay_exchange(&mut config.mexc, "MEXC");
    overlay_exchange(&mut config.binance, "BINANCE");
    overlay_exchange(&mut config.bybit, "BYBIT");

    if let (Ok(url), Ok(service_key)) =
        (std::env::var("AUDIT_URL"), std::env::var("AUDIT_SERVICE_KEY"))
    {
        config.audit = Some(AuditConfig { url, service_key });
    }
}

fn overlay_exchange(settings: &mut Option<ExchangeSettings>, prefix: &str) {
    let api_key = std::env::var(format!("{}_API_KEY", prefix)).ok();
    let api_secret = std::env::var(format!("{}_API_SECRET", prefix)).ok();
    let base_url = std::env::var(format!("{}_BASE_URL", prefix)).ok();

    if api_key.is_none() && api_secret.is_none() && base_url.is_none() {
        return;
    }

    let entry = settings.get_or_insert_with(ExchangeSettings::default);
    if api_key.is_some() {
        entry.api_key = api_key;
    }
    if api_secret.is_some() {
        entry.api_secret = api_secret;
    }
    if base_url.is_some() {
        entry.base_url = base_url;
    }
}
