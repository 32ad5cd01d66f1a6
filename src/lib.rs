//! trade-relay Library
//!
//! A single-entry relay that validates normalized trade instructions and
//! executes them against MEXC, Binance, or Bybit derivatives REST APIs
//! behind one uniform adapter interface.

pub mod audit;
pub mod binance;
pub mod bybit;
pub mod common;
pub mod config;
pub mod dispatch;
pub mod mexc;

// Re-export commonly used types
pub use common::errors::{RelayError, Result};
pub use common::traits::ExchangeClient;
pub use common::types::{
    Exchange, OrderRequest, OrderType, ResponseEnvelope, Side, TradeAction, TradeInstruction,
};
pub use config::types::{ExchangeCredentials, RelayConfig};
pub use dispatch::action::{map_action, OrderIntent};
pub use dispatch::TradeDispatcher;

pub use binance::BinanceClient;
pub use bybit::BybitClient;
pub use mexc::MexcClient;
