//! End-to-end dispatch tests against stubbed exchange endpoints
//!
//! These run the real dispatcher and real adapters; only the exchange side
//! is a stub server. Call counts on the stubs double as the no-retry and
//! no-network assertions.

mod common;

use rust_decimal_macros::dec;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{exchange_responses, sample_instruction, test_config};
use trade_relay::common::types::{Exchange, OrderType, TradeAction};
use trade_relay::dispatch::TradeDispatcher;

fn json_body(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).expect("fixture must be valid JSON")
}

#[tokio::test]
async fn test_mexc_long_sets_leverage_then_submits_buy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/private/position/change-leverage"))
        .and(query_param("symbol", "BTC_USDT"))
        .and(query_param("leverage", "20"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json_body(exchange_responses::MEXC_LEVERAGE_OK)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/private/order/submit"))
        .and(query_param("side", "BUY"))
        .and(query_param("reduceOnly", "false"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json_body(exchange_responses::MEXC_ORDER_OK)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = TradeDispatcher::new(test_config(Exchange::Mexc, &server.uri()));
    let instruction = sample_instruction(Exchange::Mexc, "BTC_USDT");

    let envelope = dispatcher.dispatch(&instruction, "req-long-1").await;

    assert!(envelope.success, "expected success, got {:?}", envelope.error);
    assert_eq!(envelope.status, 200);
    assert_eq!(envelope.request_id, "req-long-1");
    assert_eq!(envelope.result.unwrap()["data"]["orderId"], "123456");
}

#[tokio::test]
async fn test_close_short_submits_reduce_only_buy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/private/position/change-leverage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json_body(exchange_responses::MEXC_LEVERAGE_OK)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/private/order/submit"))
        .and(query_param("side", "BUY"))
        .and(query_param("reduceOnly", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json_body(exchange_responses::MEXC_ORDER_OK)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = TradeDispatcher::new(test_config(Exchange::Mexc, &server.uri()));
    let mut instruction = sample_instruction(Exchange::Mexc, "BTC_USDT");
    instruction.action = TradeAction::CloseShort;

    let envelope = dispatcher.dispatch(&instruction, "req-close-1").await;
    assert!(envelope.success, "expected success, got {:?}", envelope.error);
}

#[tokio::test]
async fn test_bybit_rejection_surfaces_ret_msg_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v5/position/set-leverage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json_body(exchange_responses::BYBIT_LEVERAGE_OK)),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The expect(1) is the no-retry assertion: a second submission would
    // fail verification when the server drops.
    Mock::given(method("POST"))
        .and(path("/v5/order/create"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json_body(exchange_responses::BYBIT_ORDER_REJECTED)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = TradeDispatcher::new(test_config(Exchange::Bybit, &server.uri()));
    let instruction = sample_instruction(Exchange::Bybit, "BTCUSDT");

    let envelope = dispatcher.dispatch(&instruction, "req-reject-1").await;

    assert!(!envelope.success);
    assert_eq!(envelope.status, 500);
    assert!(envelope.error.unwrap().contains("params error"));
}

#[tokio::test]
async fn test_validation_failure_issues_no_outbound_calls() {
    let server = MockServer::start().await;

    // Any request reaching the stub fails the test
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dispatcher = TradeDispatcher::new(test_config(Exchange::Mexc, &server.uri()));
    let mut instruction = sample_instruction(Exchange::Mexc, "BTC_USDT");
    instruction.quantity = dec!(-1);

    let envelope = dispatcher.dispatch(&instruction, "req-bad-qty").await;

    assert!(!envelope.success);
    assert_eq!(envelope.status, 400);
    assert!(envelope.error.unwrap().contains("quantity"));
}

#[tokio::test]
async fn test_limit_without_price_issues_no_outbound_calls() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dispatcher = TradeDispatcher::new(test_config(Exchange::Binance, &server.uri()));
    let mut instruction = sample_instruction(Exchange::Binance, "BTCUSDT");
    instruction.order_type = OrderType::Limit;
    instruction.price = None;

    let envelope = dispatcher.dispatch(&instruction, "req-bad-limit").await;

    assert!(!envelope.success);
    assert_eq!(envelope.status, 400);
}

#[tokio::test]
async fn test_unrecognized_exchange_never_parses_into_an_instruction() {
    let parse = serde_json::from_str::<trade_relay::common::types::TradeInstruction>(
        r#"{"exchange":"kraken","action":"LONG","symbol":"BTC_USDT","quantity":0.1}"#,
    );

    let err = parse.unwrap_err().to_string();
    assert!(err.contains("kraken"));
}

#[tokio::test]
async fn test_unconfigured_exchange_rejected_without_network() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // Config carries bybit only; the instruction asks for mexc
    let dispatcher = TradeDispatcher::new(test_config(Exchange::Bybit, &server.uri()));
    let instruction = sample_instruction(Exchange::Mexc, "BTC_USDT");

    let envelope = dispatcher.dispatch(&instruction, "req-unconfigured").await;

    assert!(!envelope.success);
    assert_eq!(envelope.status, 400);
    assert!(envelope.error.unwrap().contains("mexc"));
}

#[tokio::test]
async fn test_preflight_probe_runs_before_leverage_when_enabled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/private/account/assets"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 0, "data": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/private/position/change-leverage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json_body(exchange_responses::MEXC_LEVERAGE_OK)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/private/order/submit"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json_body(exchange_responses::MEXC_ORDER_OK)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(Exchange::Mexc, &server.uri());
    config.settings.preflight_check = true;

    let dispatcher = TradeDispatcher::new(config);
    let envelope = dispatcher
        .dispatch(&sample_instruction(Exchange::Mexc, "BTC_USDT"), "req-probe-1")
        .await;

    assert!(envelope.success, "expected success, got {:?}", envelope.error);
}

#[tokio::test]
async fn test_preflight_probe_failure_blocks_the_trade() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/private/account/assets"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(Exchange::Mexc, &server.uri());
    config.settings.preflight_check = true;

    let dispatcher = TradeDispatcher::new(config);
    let envelope = dispatcher
        .dispatch(&sample_instruction(Exchange::Mexc, "BTC_USDT"), "req-probe-2")
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.status, 500);
    assert!(envelope.error.unwrap().contains("probe"));
}
