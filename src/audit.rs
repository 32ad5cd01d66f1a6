//! Best-effort audit trail for inbound instructions and their outcomes
//!
//! The relay records each instruction and its outcome with an internal
//! collector. Recording is strictly best-effort: every failure is caught,
//! logged at `warn`, and never affects the trade itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::warn;

use crate::config::types::AuditConfig;

/// Metadata describing one inbound instruction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    /// Caller-supplied correlation id
    pub request_id: String,
    /// Where the instruction entered the relay (e.g. "cli")
    pub source: String,
    pub received_at: DateTime<Utc>,
}

/// Sink for request/response audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record an inbound instruction. Returns the collector's row id when
    /// the record was accepted, to correlate the outcome record.
    async fn log_request(&self, metadata: &RequestMetadata, body: &Value) -> Option<i64>;

    /// Record the outcome for a previously logged instruction.
    /// Fire-and-forget.
    async fn log_response(
        &self,
        row_id: Option<i64>,
        outcome: &Value,
        error: Option<&str>,
        elapsed_ms: i64,
    );
}

/// Sink used when no collector is configured.
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn log_request(&self, _metadata: &RequestMetadata, _body: &Value) -> Option<i64> {
        None
    }

    async fn log_response(
        &self,
        _row_id: Option<i64>,
        _outcome: &Value,
        _error: Option<&str>,
        _elapsed_ms: i64,
    ) {
    }
}

/// Sink that POSTs records to the internal collector.
pub struct HttpAuditSink {
    client: Client,
    url: String,
    service_key: String,
}

impl HttpAuditSink {
    pub fn new(config: &AuditConfig) -> Option<Self> {
        let client = match Client::builder().timeout(Duration::from_secs(5)).build() {
            Ok(client) => client,
            Err(err) => {
                warn!(error = %err, "failed to build audit HTTP client");
                return None;
            }
        };

        Some(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    /// Sink for an optional audit block: HTTP when configured, no-op
    /// otherwise.
    pub fn from_config(config: Option<&AuditConfig>) -> Box<dyn AuditSink> {
        match config.and_then(Self::new) {
            Some(sink) => Box::new(sink),
            None => Box::new(NoopAuditSink),
        }
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn log_request(&self, metadata: &RequestMetadata, body: &Value) -> Option<i64> {
        let record = json!({
            "metadata": metadata,
            "body": body,
        });

        let sent = self
            .client
            .post(format!("{}/requests", self.url))
            .bearer_auth(&self.service_key)
            .json(&record)
            .send()
            .await;

        match sent {
            Ok(response) if response.status().is_success() => response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("rowId").and_then(Value::as_i64)),
            Ok(response) => {
                warn!(status = %response.status(), "audit collector rejected request record");
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to record request with audit collector");
                None
            }
        }
    }

    async fn log_response(
        &self,
        row_id: Option<i64>,
        outcome: &Value,
        error: Option<&str>,
        elapsed_ms: i64,
    ) {
        let Some(row_id) = row_id else {
            return;
        };

        let record = json!({
            "requestRowId": row_id,
            "outcome": outcome,
            "error": error,
            "executionTimeMs": elapsed_ms,
        });

        let sent = self
            .client
            .post(format!("{}/responses", self.url))
            .bearer_auth(&self.service_key)
            .json(&record)
            .send()
            .await;

        match sent {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), "audit collector rejected response record");
            }
            Err(err) => {
                warn!(error = %err, "failed to record response with audit collector");
            }
            _ => {}
        }
    }
}
