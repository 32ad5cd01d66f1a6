//! Unified types shared by the dispatcher and the exchange adapters

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::errors::RelayError;

/// Supported exchange identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Mexc,
    Binance,
    Bybit,
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exchange::Mexc => write!(f, "mexc"),
            Exchange::Binance => write!(f, "binance"),
            Exchange::Bybit => write!(f, "bybit"),
        }
    }
}

impl FromStr for Exchange {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mexc" => Ok(Exchange::Mexc),
            "binance" => Ok(Exchange::Binance),
            "bybit" => Ok(Exchange::Bybit),
            _ => Err(RelayError::UnsupportedExchange(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Exchange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Generic trading action carried by an inbound instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Long,
    Short,
    CloseLong,
    CloseShort,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Long => write!(f, "LONG"),
            TradeAction::Short => write!(f, "SHORT"),
            TradeAction::CloseLong => write!(f, "CLOSE_LONG"),
            TradeAction::CloseShort => write!(f, "CLOSE_SHORT"),
        }
    }
}

impl FromStr for TradeAction {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LONG" => Ok(TradeAction::Long),
            "SHORT" => Ok(TradeAction::Short),
            "CLOSE_LONG" => Ok(TradeAction::CloseLong),
            "CLOSE_SHORT" => Ok(TradeAction::CloseShort),
            _ => Err(RelayError::UnsupportedAction(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for TradeAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Order type (market or limit)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    #[default]
    Market,
    Limit,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
        }
    }
}

impl FromStr for OrderType {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            _ => Err(RelayError::Validation(format!("unsupported order type: {}", s))),
        }
    }
}

impl<'de> Deserialize<'de> for OrderType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// One normalized trade instruction, as received from the inbound gate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInstruction {
    /// Target exchange
    pub exchange: Exchange,
    /// Generic action to perform
    pub action: TradeAction,
    /// Exchange-native symbol (e.g. `BTC_USDT` on MEXC, `BTCUSDT` elsewhere)
    pub symbol: String,
    /// Order quantity in contract units; must be positive
    pub quantity: Decimal,
    /// Limit price; required for LIMIT orders, ignored otherwise
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Order type, defaults to MARKET
    #[serde(default)]
    pub order_type: OrderType,
    /// Leverage to set before submitting; falls back to the configured default
    #[serde(default)]
    pub leverage: Option<u32>,
}

/// Exchange-neutral order parameters, derived from an instruction by the
/// dispatcher. Adapters translate these into each exchange's vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub reduce_only: bool,
}

/// Uniform response envelope returned to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    /// Caller-supplied correlation id, echoed unchanged
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// HTTP-equivalent status; not part of the serialized body
    #[serde(skip)]
    pub status: u16,
}

impl ResponseEnvelope {
    /// Envelope for a successfully executed instruction.
    pub fn success(request_id: &str, result: Value) -> Self {
        Self {
            success: true,
            request_id: request_id.to_string(),
            result: Some(result),
            error: None,
            status: 200,
        }
    }

    /// Envelope for a failed instruction, with the status derived from the
    /// error taxonomy.
    pub fn failure(request_id: &str, error: &RelayError) -> Self {
        Self {
            success: false,
            request_id: request_id.to_string(),
            result: None,
            error: Some(error.to_string()),
            status: error.status_code(),
        }
    }
}
