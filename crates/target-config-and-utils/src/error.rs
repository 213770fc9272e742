//! Core error types for configuration and setup.

use thiserror::Error;

/// Error type for configuration loading and process setup.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
