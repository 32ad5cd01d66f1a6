//! Trait definition for exchange adapters

use async_trait::async_trait;
use serde_json::Value;

use super::errors::Result;
use super::types::{Exchange, OrderRequest};

/// Uniform capability set every exchange adapter implements.
///
/// Adapters own the exchange-specific signing, parameter naming, endpoint
/// paths, and success sentinel; callers only see this contract and the
/// normalized error taxonomy.
///
/// `set_leverage` and `execute_trade` are not idempotent from the exchange's
/// perspective. The dispatcher issues exactly one call per step and never
/// retries them; any retry policy belongs to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Set leverage for a symbol via the exchange's leverage endpoint.
    async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<Value>;

    /// Submit an order, translating the neutral parameters into the
    /// exchange's vocabulary.
    async fn execute_trade(&self, order: &OrderRequest) -> Result<Value>;

    /// Fetch account information. No side effects; doubles as a
    /// connectivity probe.
    async fn get_account_info(&self) -> Result<Value>;

    /// Fetch open positions, optionally filtered to one symbol.
    async fn get_positions<'a>(&self, symbol: Option<&'a str>) -> Result<Value>;

    /// Which exchange this adapter talks to.
    fn exchange(&self) -> Exchange;
}
