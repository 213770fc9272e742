//! # Observability
//!
//! Tracing setup shared by every target-zendesk crate.
//!
//! Library crates only use `tracing` macros and never install a subscriber.
//! The binary calls [`init_with_config`] once at startup. Logs are always
//! written to stderr because stdout carries the Singer protocol (STATE
//! messages) and must stay machine-readable. A JSONL copy can additionally
//! be appended to a file for later inspection:
//!
//! - `tail -f target-zendesk.jsonl | jq` for pretty JSON
//! - `lnav target-zendesk.jsonl` for interactive exploration
//!
//! ## Usage
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "target-zendesk".into(),
//!     default_level: "debug".into(),
//!     format: observability::LogFormat::Json,
//!     ..Default::default()
//! })?;
//! tracing::info!("ready");
//! ```

mod file;
mod json_layer;

use std::io;
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use file::LogFileWriter;
pub use json_layer::{JsonLayer, LogEntry};

/// Line format used for stderr output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line human readable output.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything other than `json` means compact.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, included in every JSON log line.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// Format of the stderr output.
    pub format: LogFormat,

    /// Optional JSONL file that receives a copy of every log line.
    pub log_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            format: LogFormat::Compact,
            log_path: None,
        }
    }
}

/// Initialize logging with custom configuration.
///
/// Fails if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init_with_config(config: LogConfig) -> io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    let compact_layer = (config.format == LogFormat::Compact).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(io::stderr)
            .with_ansi(false)
    });

    let json_stderr_layer = (config.format == LogFormat::Json)
        .then(|| JsonLayer::new(config.service_name.clone(), io::stderr));

    let file_layer = match &config.log_path {
        Some(path) => Some(JsonLayer::new(
            config.service_name.clone(),
            LogFileWriter::new(path)?,
        )),
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(compact_layer)
        .with(json_stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    if let Some(path) = &config.log_path {
        tracing::debug!(log_path = %path.display(), "log file attached");
    }

    Ok(())
}
