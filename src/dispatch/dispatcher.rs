//! End-to-end orchestration of a single trade instruction

use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, instrument};

use super::action::map_action;
use crate::binance::{self, BinanceClient};
use crate::bybit::{self, BybitClient};
use crate::common::errors::{RelayError, Result};
use crate::common::traits::ExchangeClient;
use crate::common::types::{
    Exchange, OrderRequest, OrderType, ResponseEnvelope, TradeInstruction,
};
use crate::config::types::RelayConfig;
use crate::mexc::{self, MexcClient};

/// Orchestrates one trade instruction end to end: validation, credential
/// resolution, adapter selection, optional connectivity probe, leverage,
/// action mapping, and order submission.
///
/// Holds only read-only configuration; concurrent dispatches share nothing
/// else. Instructions for the same account/symbol are NOT serialized here -
/// callers that need the leverage+order pair to be atomic per account must
/// serialize on their side.
pub struct TradeDispatcher {
    config: RelayConfig,
}

impl TradeDispatcher {
    /// Create a dispatcher over the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Run one instruction and package the outcome into the uniform
    /// response envelope, echoing the caller's correlation id.
    #[instrument(skip(self, instruction), fields(exchange = %instruction.exchange, action = %instruction.action))]
    pub async fn dispatch(&self, instruction: &TradeInstruction, request_id: &str) -> ResponseEnvelope {
        match self.run(instruction).await {
            Ok(result) => {
                info!(request_id, "trade executed");
                ResponseEnvelope::success(request_id, result)
            }
            Err(err) => {
                error!(request_id, error = %err, "trade dispatch failed");
                ResponseEnvelope::failure(request_id, &err)
            }
        }
    }

    async fn run(&self, instruction: &TradeInstruction) -> Result<Value> {
        validate(instruction)?;
        let client = self.client_for(instruction.exchange)?;
        self.execute_with_client(client.as_ref(), instruction).await
    }

    /// The exchange-facing half of the dispatch sequence, generic over the
    /// adapter so call ordering can be exercised against a stub.
    ///
    /// Each side-effecting step runs exactly once; failures short-circuit
    /// and are never retried here.
    pub async fn execute_with_client(
        &self,
        client: &dyn ExchangeClient,
        instruction: &TradeInstruction,
    ) -> Result<Value> {
        if self.config.settings.preflight_check {
            client.get_account_info().await.map_err(|e| {
                RelayError::Connectivity(format!("connectivity probe failed: {}", e))
            })?;
        }

        let leverage = instruction
            .leverage
            .unwrap_or(self.config.settings.default_leverage);
        client.set_leverage(&instruction.symbol, leverage).await?;

        let intent = map_action(instruction.action);
        let order = OrderRequest {
            symbol: instruction.symbol.clone(),
            side: intent.side,
            order_type: instruction.order_type,
            quantity: instruction.quantity,
            price: instruction.price,
            reduce_only: intent.reduce_only,
        };

        client.execute_trade(&order).await
    }

    /// Build the adapter for an exchange from its configured credentials.
    pub fn client_for(&self, exchange: Exchange) -> Result<Box<dyn ExchangeClient>> {
        let settings = self.config.exchange(exchange).ok_or_else(|| {
            RelayError::Configuration(format!("no credentials configured for {}", exchange))
        })?;
        let credentials = settings.credentials().ok_or_else(|| {
            RelayError::Configuration(format!("incomplete credentials for {}", exchange))
        })?;
        let timeout = Duration::from_secs(self.config.settings.request_timeout_seconds);

        let client: Box<dyn ExchangeClient> = match exchange {
            Exchange::Mexc => {
                let base_url = settings
                    .base_url
                    .as_deref()
                    .unwrap_or(mexc::rest::DEFAULT_BASE_URL);
                Box::new(MexcClient::with_timeout(base_url, credentials, timeout)?)
            }
            Exchange::Binance => {
                let base_url = settings
                    .base_url
                    .as_deref()
                    .unwrap_or(binance::rest::DEFAULT_BASE_URL);
                Box::new(BinanceClient::with_timeout(base_url, credentials, timeout)?)
            }
            Exchange::Bybit => {
                let base_url = settings
                    .base_url
                    .as_deref()
                    .unwrap_or(bybit::rest::DEFAULT_BASE_URL);
                Box::new(BybitClient::with_timeout(base_url, credentials, timeout)?)
            }
        };
        Ok(client)
    }
}

/// Reject malformed instructions before anything leaves the process.
fn validate(instruction: &TradeInstruction) -> Result<()> {
    if instruction.symbol.trim().is_empty() {
        return Err(RelayError::Validation("symbol must not be empty".into()));
    }
    if instruction.quantity <= Decimal::ZERO {
        return Err(RelayError::Validation(format!(
            "quantity must be positive, got {}",
            instruction.quantity
        )));
    }
    if let Some(leverage) = instruction.leverage {
        if leverage == 0 {
            return Err(RelayError::Validation("leverage must be positive".into()));
        }
    }
    match instruction.order_type {
        OrderType::Limit => match instruction.price {
            Some(price) if price > Decimal::ZERO => Ok(()),
            Some(price) => Err(RelayError::Validation(format!(
                "price must be positive, got {}",
                price
            ))),
            None => Err(RelayError::Validation(
                "price is required for LIMIT orders".into(),
            )),
        },
        OrderType::Market => Ok(()),
    }
}
