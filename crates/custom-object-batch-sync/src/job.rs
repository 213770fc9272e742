//! Submitted bulk jobs and their status.

use crate::batch::BatchKey;
use crate::operation::Operation;
use serde::Deserialize;
use std::fmt;

/// Status reported by `job_statuses`.
///
/// Only `queued` and `working` are pending; every other value, known or
/// not, is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    Queued,
    Working,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued | Self::Working)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Working => "working",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => Self::Queued,
            "working" => Self::Working,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted group, owned by the poller until it is terminal.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub message: Option<String>,
    pub key: BatchKey,
    /// The submitted items, kept for error correlation.
    pub operations: Vec<Operation>,
}

/// A job that reached `completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job_id: String,
    pub key: BatchKey,
    pub item_count: usize,
    /// Status fetches after submission; each one followed a wait.
    pub polls: u64,
}
