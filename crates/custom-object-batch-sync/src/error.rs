//! Error types for record resolution and bulk job processing.

use crate::operation::OperationKind;
use std::time::Duration;
use thiserror::Error;
use zendesk_http_client::ZendeskApiError;

/// A record that cannot be turned into an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unrecognized action '{0}', must be one of: upsert, delete")]
    UnsupportedAction(String),

    #[error("delete action requires custom_object_record_id or external_id in record")]
    DeleteRequiresIdentifier,

    #[error("upsert action requires custom_object_fields in record")]
    MissingFields,

    #[error("custom_object_fields must be an object, got {0}")]
    FieldsNotObject(&'static str),

    #[error("record is missing required property '{0}'")]
    MissingProperty(&'static str),

    /// The synchronous PATCH path only updates records it can locate.
    #[error(
        "direct writes require custom_object_record_id, external_id, or name with an upsert; \
         '{0}' needs write_mode bulk_job"
    )]
    DirectWriteUnsupported(OperationKind),
}

/// Error type for the batch sync pipeline.
///
/// Every variant aborts the enclosing flush. Only `Cancelled` is expected
/// to be recoverable by the caller.
#[derive(Debug, Error)]
pub enum BatchSyncError {
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),

    /// Creating the bulk job failed at the transport or HTTP level.
    #[error("failed to submit {operation} job for custom object '{entity_key}': {source}")]
    Submission {
        entity_key: String,
        operation: OperationKind,
        source: ZendeskApiError,
    },

    /// The job reached a terminal status other than `completed`.
    #[error("{operation} job {job_id} for custom object '{entity_key}' ended with status '{status}'")]
    JobFailed {
        entity_key: String,
        operation: OperationKind,
        job_id: String,
        status: String,
        message: Option<String>,
    },

    /// Fetching the job status failed; the job's real outcome is unknown.
    #[error("failed to poll {operation} job {job_id} for custom object '{entity_key}': {source}")]
    PollTransport {
        entity_key: String,
        operation: OperationKind,
        job_id: String,
        source: ZendeskApiError,
    },

    #[error("polling of job {job_id} was cancelled")]
    Cancelled { job_id: String },

    #[error("job {job_id} did not reach a terminal status within {waited:?}")]
    PollTimeout { job_id: String, waited: Duration },

    #[error("direct write to custom object '{entity_key}' failed: {source}")]
    DirectWrite {
        entity_key: String,
        source: ZendeskApiError,
    },

    /// A programming error, e.g. a group above the size ceiling.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl BatchSyncError {
    /// Whether the run may be retried later without operator action.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

pub type BatchSyncResult<T> = Result<T, BatchSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_failed_display_names_everything() {
        let err = BatchSyncError::JobFailed {
            entity_key: "apt".to_string(),
            operation: OperationKind::UpsertByExternalId,
            job_id: "V3-abc".to_string(),
            status: "failed".to_string(),
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "create_or_update_by_external_id job V3-abc for custom object 'apt' ended with status 'failed'"
        );
    }

    #[test]
    fn validation_converts_into_batch_error() {
        let err: BatchSyncError = ValidationError::DeleteRequiresIdentifier.into();
        assert!(matches!(
            err,
            BatchSyncError::Validation(ValidationError::DeleteRequiresIdentifier)
        ));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn only_cancellation_is_recoverable() {
        let cancelled = BatchSyncError::Cancelled {
            job_id: "j".to_string(),
        };
        assert!(cancelled.is_recoverable());
        assert!(!BatchSyncError::InternalInvariant("x".to_string()).is_recoverable());
    }
}
