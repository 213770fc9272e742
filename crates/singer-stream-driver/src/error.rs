//! Driver error types.

use custom_object_batch_sync::{BatchSyncError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("stream '{0}' is not supported, only custom_object_records is")]
    UnsupportedStream(String),

    #[error("line {line}: RECORD for stream '{stream}' arrived before its SCHEMA")]
    UnknownStream { line: usize, stream: String },

    #[error("line {line}: malformed message: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },

    /// The record does not deserialize into a custom object record.
    #[error("line {line}: invalid record: {source}")]
    InvalidRecord {
        line: usize,
        source: serde_json::Error,
    },

    #[error("line {line}: {source}")]
    Validation {
        line: usize,
        source: ValidationError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sync(#[from] BatchSyncError),

    #[error("run cancelled")]
    Cancelled,
}

pub type DriverResult<T> = Result<T, DriverError>;
