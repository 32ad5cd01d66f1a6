//! REST adapter for the Bybit v5 API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument};

use super::auth::{canonical_query, generate_auth_headers};
use crate::common::errors::{RelayError, Result};
use crate::common::traits::ExchangeClient;
use crate::common::types::{Exchange, OrderRequest, OrderType, Side};
use crate::config::types::ExchangeCredentials;

/// Production endpoint for Bybit v5
pub const DEFAULT_BASE_URL: &str = "https://api.bybit.com";

/// Authenticated client for the Bybit v5 API.
///
/// Auth travels in headers (`X-BAPI-API-KEY`, `X-BAPI-TIMESTAMP`,
/// `X-BAPI-SIGN`); POST parameters go in a JSON body, GET parameters in the
/// query string. Success is discriminated by the body `retCode`, not the
/// HTTP status, and the `result` field is unwrapped on success.
#[derive(Debug, Clone)]
pub struct BybitClient {
    client: Client,
    base_url: String,
    credentials: ExchangeCredentials,
}

impl BybitClient {
    /// Create a new client with the default timeout.
    pub fn new(base_url: &str, credentials: ExchangeCredentials) -> Result<Self> {
        Self::with_timeout(base_url, credentials, Duration::from_secs(30))
    }

    /// Create a new client with a custom timeout.
    pub fn with_timeout(
        base_url: &str,
        credentials: ExchangeCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// POST with the parameters as a JSON body and the signature computed
    /// over their canonical query form.
    async fn post_signed(&self, path: &str, params: &[(String, Value)], default_msg: &str) -> Result<Value> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let headers = generate_auth_headers(
            &self.credentials.api_key,
            &self.credentials.api_secret,
            params,
            timestamp,
        )?;

        let body: Map<String, Value> = params.iter().cloned().collect();
        let request = self.client.post(format!("{}{}", self.base_url, path));
        let response = headers.apply_to_request(request).json(&body).send().await?;

        let payload: Value = response.json().await?;
        Self::check_body(payload, default_msg)
    }

    /// GET with the parameters in the query string, signed the same way.
    async fn get_signed(&self, path: &str, params: &[(String, Value)], default_msg: &str) -> Result<Value> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let headers = generate_auth_headers(
            &self.credentials.api_key,
            &self.credentials.api_secret,
            params,
            timestamp,
        )?;

        let query = canonical_query(params);
        let url = if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        };

        let response = headers.apply_to_request(self.client.get(&url)).send().await?;

        let payload: Value = response.json().await?;
        Self::check_body(payload, default_msg)
    }

    /// Apply the `retCode == 0` success sentinel and unwrap `result`.
    fn check_body(payload: Value, default_msg: &str) -> Result<Value> {
        let ret_code = payload.get("retCode").and_then(Value::as_i64).unwrap_or(-1);
        if ret_code != 0 {
            let message = payload
                .get("retMsg")
                .and_then(Value::as_str)
                .unwrap_or(default_msg)
                .to_string();
            return Err(RelayError::Exchange {
                code: ret_code,
                message,
            });
        }
        Ok(payload.get("result").cloned().unwrap_or(Value::Null))
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Buy => "Buy",
        Side::Sell => "Sell",
    }
}

fn order_type_name(order_type: OrderType) -> &'static str {
    match order_type {
        OrderType::Market => "Market",
        OrderType::Limit => "Limit",
    }
}

#[async_trait]
impl ExchangeClient for BybitClient {
    #[instrument(skip(self))]
    async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<Value> {
        let params = vec![
            ("category".to_string(), Value::from("linear")),
            ("symbol".to_string(), Value::from(symbol)),
            ("buyLeverage".to_string(), Value::from(leverage.to_string())),
            ("sellLeverage".to_string(), Value::from(leverage.to_string())),
        ];
        debug!("Changing leverage for {}", symbol);

        self.post_signed("/v5/position/set-leverage", &params, "Failed to set leverage")
            .await
    }

    #[instrument(skip(self))]
    async fn execute_trade(&self, order: &OrderRequest) -> Result<Value> {
        let mut params = vec![
            ("category".to_string(), Value::from("linear")),
            ("symbol".to_string(), Value::from(order.symbol.as_str())),
            ("side".to_string(), Value::from(side_name(order.side))),
            (
                "orderType".to_string(),
                Value::from(order_type_name(order.order_type)),
            ),
            ("qty".to_string(), Value::from(order.quantity.to_string())),
            ("reduceOnly".to_string(), Value::from(order.reduce_only)),
        ];
        if order.order_type == OrderType::Limit {
            if let Some(price) = order.price {
                params.push(("price".to_string(), Value::from(price.to_string())));
            }
        }
        debug!("Submitting {} {} order for {}", side_name(order.side), order_type_name(order.order_type), order.symbol);

        self.post_signed("/v5/order/create", &params, "Order execution failed")
            .await
    }

    #[instrument(skip(self))]
    async fn get_account_info(&self) -> Result<Value> {
        let params = vec![("accountType".to_string(), Value::from("CONTRACT"))];

        self.get_signed("/v5/account/wallet-balance", &params, "Failed to get account info")
            .await
    }

    #[instrument(skip(self))]
    async fn get_positions<'a>(&self, symbol: Option<&'a str>) -> Result<Value> {
        let mut params = vec![("category".to_string(), Value::from("linear"))];
        if let Some(s) = symbol {
            params.push(("symbol".to_string(), Value::from(s)));
        }

        self.get_signed("/v5/position/list", &params, "Failed to get positions")
            .await
    }

    fn exchange(&self) -> Exchange {
        Exchange::Bybit
    }
}
