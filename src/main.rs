//! trade-relay - Main Entry Point
//!
//! Thin process shell around the dispatch library: loads configuration,
//! reads one trade instruction, dispatches it, and prints the response
//! envelope as JSON. Inbound authentication is the calling gate's job;
//! this binary trusts its caller and echoes the supplied correlation id.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use trade_relay::audit::{AuditSink, HttpAuditSink, RequestMetadata};
use trade_relay::common::errors::RelayError;
use trade_relay::common::types::{ResponseEnvelope, TradeInstruction};
use trade_relay::config::loader;
use trade_relay::dispatch::TradeDispatcher;

/// CLI arguments for the relay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Correlation id echoed back in the response envelope
    #[arg(long)]
    request_id: Option<String>,

    /// Trade instruction as an inline JSON string
    #[arg(long, conflicts_with = "instruction_file")]
    instruction: Option<String>,

    /// Path to a JSON file holding the trade instruction
    #[arg(long)]
    instruction_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = loader::load_config(Some(&args.config))?;

    let raw = match (&args.instruction, &args.instruction_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading instruction file {}", path))?,
        (None, None) => bail!("provide --instruction or --instruction-file"),
    };

    let request_id = args
        .request_id
        .unwrap_or_else(|| format!("cli-{}", chrono::Utc::now().timestamp_millis()));

    let sink = HttpAuditSink::from_config(config.audit.as_ref());
    let metadata = RequestMetadata {
        request_id: request_id.clone(),
        source: "cli".to_string(),
        received_at: chrono::Utc::now(),
    };
    let body = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw.clone()));

    let started = std::time::Instant::now();
    let row_id = sink.log_request(&metadata, &body).await;

    let envelope = match serde_json::from_str::<TradeInstruction>(&raw) {
        Ok(instruction) => {
            info!(request_id = %request_id, exchange = %instruction.exchange, action = %instruction.action, "dispatching trade instruction");
            let dispatcher = TradeDispatcher::new(config);
            dispatcher.dispatch(&instruction, &request_id).await
        }
        Err(err) => ResponseEnvelope::failure(&request_id, &RelayError::Validation(err.to_string())),
    };

    sink.log_response(
        row_id,
        &serde_json::to_value(&envelope)?,
        envelope.error.as_deref(),
        started.elapsed().as_millis() as i64,
    )
    .await;

    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if !envelope.success {
        std::process::exit(1);
    }
    Ok(())
}
