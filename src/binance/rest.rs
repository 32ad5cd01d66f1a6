//! REST adapter for the Binance USD-M futures API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use super::auth::{canonical_query, sign_query};
use crate::common::errors::{RelayError, Result};
use crate::common::traits::ExchangeClient;
use crate::common::types::{Exchange, OrderRequest, OrderType};
use crate::config::types::ExchangeCredentials;

/// Production endpoint for Binance USD-M futures
pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

/// Authenticated client for the Binance futures API.
///
/// Same auth placement as MEXC: API key in the `X-MBX-APIKEY` header,
/// `timestamp` and `signature` appended to the query string.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    credentials: ExchangeCredentials,
}

impl BinanceClient {
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

    fn signed_url(&self, path: &str, params: &[(String, String)], timestamp: i64) -> Result<String> {
        let signature = sign_query(&self.credentials.api_secret, params, timestamp)?;
        let query = canonical_query(params);
        let url = if query.is_empty() {
            format!(
                "{}{}?timestamp={}&signature={}",
                self.base_url, path, timestamp, signature
            )
        } else {
            format!(
                "{}{}?{}&timestamp={}&signature={}",
                self.base_url, path, query, timestamp, signature
            )
        };
        Ok(url)
    }

    /// Binance signals failure via HTTP status; the body carries
    /// `{code, msg}` which we fold into the normalized error.
    async fn check_response(response: reqwest::Response, default_msg: &str) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let code = body
                .get("code")
                .and_then(Value::as_i64)
                .unwrap_or_else(|| status.as_u16() as i64);
            let message = body
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or(default_msg)
                .to_string();
            return Err(RelayError::Exchange { code, message });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    #[instrument(skip(self))]
    async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<Value> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let params = vec![
            ("symbol".to_string(), symbol.to_string()),
            ("leverage".to_string(), leverage.to_string()),
        ];

        let url = self.signed_url("/fapi/v1/leverage", &params, timestamp)?;
        debug!("Changing leverage for {}", symbol);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()
            .await?;

        Self::check_response(response, "Failed to set leverage").await
    }

    #[instrument(skip(self))]
    async fn execute_trade(&self, order: &OrderRequest) -> Result<Value> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut params = vec![
            ("symbol".to_string(), order.symbol.clone()),
            ("side".to_string(), order.side.to_string()),
            ("type".to_string(), order.order_type.to_string()),
            ("quantity".to_string(), order.quantity.to_string()),
            ("reduceOnly".to_string(), order.reduce_only.to_string()),
        ];
        if order.order_type == OrderType::Limit {
            if let Some(price) = order.price {
                params.push(("price".to_string(), price.to_string()));
                params.push(("timeInForce".to_string(), "GTC".to_string()));
            }
        }

        let url = self.signed_url("/fapi/v1/order", &params, timestamp)?;
        debug!("Submitting {} {} order for {}", order.side, order.order_type, order.symbol);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()
            .await?;

        Self::check_response(response, "Order execution failed").await
    }

    #[instrument(skip(self))]
    async fn get_account_info(&self) -> Result<Value> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let url = self.signed_url("/fapi/v2/account", &[], timestamp)?;

        let response = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()
            .await?;

        Self::check_response(response, "Failed to get account info").await
    }

    #[instrument(skip(self))]
    async fn get_positions<'a>(&self, symbol: Option<&'a str>) -> Result<Value> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let params: Vec<(String, String)> = symbol
            .map(|s| vec![("symbol".to_string(), s.to_string())])
            .unwrap_or_default();

        let url = self.signed_url("/fapi/v2/positionRisk", &params, timestamp)?;

        let response = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()
            .await?;

        Self::check_response(response, "Failed to get positions").await
    }

    fn exchange(&self) -> Exchange {
        Exchange::Binance
    }
}
