//! Configuration, credentials and logging setup for target-zendesk.

mod config;
mod error;
mod logging;

pub use config::{
    AuthMethod, TargetConfig, WriteMode, DEFAULT_ACTION, DEFAULT_LOG_LEVEL,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_URL_BASE, SUPPORTED_DEFAULT_ACTIONS,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
