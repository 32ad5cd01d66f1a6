//! Common test utilities and fixtures

use rust_decimal_macros::dec;

use trade_relay::common::types::{Exchange, OrderType, TradeAction, TradeInstruction};
use trade_relay::config::types::{ExchangeSettings, RelayConfig};

/// Create a sample market LONG instruction for testing
pub fn sample_instruction(exchange: Exchange, symbol: &str) -> TradeInstruction {
    TradeInstruction {
        exchange,
        action: TradeAction::Long,
        symbol: symbol.to_string(),
        quantity: dec!(0.1),
        price: None,
        order_type: OrderType::Market,
        leverage: Some(20),
    }
}

/// Relay configuration with one exchange pointed at a stub server
pub fn test_config(exchange: Exchange, base_url: &str) -> RelayConfig {
    let settings = ExchangeSettings {
        api_key: Some("test_key".to_string()),
        api_secret: Some("test_secret".to_string()),
        base_url: Some(base_url.to_string()),
    };

    let mut config = RelayConfig::default();
    match exchange {
        Exchange::Mexc => config.mexc = Some(settings),
        Exchange::Binance => config.binance = Some(settings),
        Exchange::Bybit => config.bybit = Some(settings),
    }
    config
}

/// Sample exchange response bodies
pub mod exchange_responses {
    /// MEXC order acknowledgement
    pub const MEXC_ORDER_OK: &str = r#"{
        "success": true,
        "code": 0,
        "data": {
            "orderId": "123456",
            "symbol": "BTC_USDT"
        }
    }"#;

    /// MEXC leverage acknowledgement
    pub const MEXC_LEVERAGE_OK: &str = r#"{
        "success": true,
        "code": 0,
        "data": {
            "leverage": 20
        }
    }"#;

    /// Binance order acknowledgement
    pub const BINANCE_ORDER_OK: &str = r#"{
        "orderId": 4567,
        "symbol": "BTCUSDT",
        "status": "NEW",
        "side": "BUY",
        "type": "MARKET"
    }"#;

    /// Bybit success envelope
    pub const BYBIT_ORDER_OK: &str = r#"{
        "retCode": 0,
        "retMsg": "OK",
        "result": {
            "orderId": "f2b7d-4a1c",
            "orderLinkId": ""
        }
    }"#;

    /// Bybit rejection with a non-zero retCode
    pub const BYBIT_ORDER_REJECTED: &str = r#"{
        "retCode": 10001,
        "retMsg": "params error: side invalid",
        "result": {}
    }"#;

    /// Bybit leverage acknowledgement
    pub const BYBIT_LEVERAGE_OK: &str = r#"{
        "retCode": 0,
        "retMsg": "OK",
        "result": {}
    }"#;
}
