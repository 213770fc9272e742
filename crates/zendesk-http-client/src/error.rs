//! Error types for Zendesk API calls.

use thiserror::Error;

/// Error type for all Zendesk HTTP operations.
#[derive(Debug, Error)]
pub enum ZendeskApiError {
    /// Network or transport-level HTTP error from reqwest.
    ///
    /// Includes connection failures, timeouts, and TLS errors.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Zendesk answered with a non-success HTTP status.
    #[error("Zendesk API error: {status} - {message}")]
    Api {
        /// The HTTP status code returned by Zendesk.
        status: u16,
        /// The response body, typically containing error details.
        message: String,
    },

    /// A response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid credentials or header values.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ZendeskApiResult<T> = Result<T, ZendeskApiError>;
