//! Logging initialization for target-zendesk.
//!
//! Thin wrapper over the observability crate. Output always goes to stderr;
//! the format and an optional JSONL copy are chosen from the environment:
//!
//! - `TARGET_ZENDESK_LOG_FORMAT=json` switches stderr to JSON lines
//! - `TARGET_ZENDESK_LOG_FILE=<path>` appends JSON lines to a file as well

use crate::CoreResult;
use observability::{LogConfig, LogFormat};
use std::path::PathBuf;

const SERVICE_NAME: &str = "target-zendesk";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: &str) -> CoreResult<()> {
    let format = std::env::var("TARGET_ZENDESK_LOG_FORMAT")
        .ok()
        .map(|raw| LogFormat::from_name(&raw))
        .unwrap_or_default();

    let log_path = std::env::var("TARGET_ZENDESK_LOG_FILE")
        .ok()
        .and_then(non_empty_env)
        .map(PathBuf::from);

    observability::init_with_config(LogConfig {
        service_name: SERVICE_NAME.into(),
        default_level: parse_level(level).to_string().to_lowercase(),
        format,
        log_path,
    })?;

    Ok(())
}

fn non_empty_env(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
