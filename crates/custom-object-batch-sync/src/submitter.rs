//! Bulk job creation for one accumulated group.

use crate::api::{BulkJobApi, JobRequest};
use crate::batch::{BatchKey, MAX_GROUP_SIZE};
use crate::error::{BatchSyncError, BatchSyncResult};
use crate::job::Job;
use crate::operation::Operation;
use tracing::{debug, error, info};

/// Issues one job creation request per group.
pub struct JobSubmitter<'a, A: ?Sized> {
    api: &'a A,
}

impl<'a, A: BulkJobApi + ?Sized> JobSubmitter<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Submit `operations` as a single job tagged with `key.kind`.
    ///
    /// Returns `Ok(None)` without any network call for an empty group.
    /// A group above [`MAX_GROUP_SIZE`], or holding operations of another
    /// kind, is a caller bug and fails with `InternalInvariant`.
    pub async fn submit(
        &self,
        key: BatchKey,
        operations: Vec<Operation>,
    ) -> BatchSyncResult<Option<Job>> {
        if operations.is_empty() {
            debug!(group = %key, "Skipping empty group");
            return Ok(None);
        }

        check_group(&key, &operations)?;

        let request = JobRequest::new(key.kind, &operations);
        let info = self
            .api
            .create_job(&key.entity_key, &request)
            .await
            .map_err(|source| {
                error!(group = %key, error = %source, "Job submission failed");
                BatchSyncError::Submission {
                    entity_key: key.entity_key.clone(),
                    operation: key.kind,
                    source,
                }
            })?;

        info!(
            group = %key,
            job_id = %info.id,
            status = %info.status,
            items = operations.len(),
            "Job submitted"
        );

        Ok(Some(Job {
            id: info.id,
            status: info.status,
            message: info.message,
            key,
            operations,
        }))
    }
}

fn check_group(key: &BatchKey, operations: &[Operation]) -> BatchSyncResult<()> {
    if operations.len() > MAX_GROUP_SIZE {
        error!(group = %key, len = operations.len(), "Group exceeds ceiling");
        return Err(BatchSyncError::InternalInvariant(format!(
            "group {} holds {} operations, ceiling is {}",
            key,
            operations.len(),
            MAX_GROUP_SIZE
        )));
    }
    if let Some(stray) = operations.iter().find(|op| op.kind() != key.kind) {
        return Err(BatchSyncError::InternalInvariant(format!(
            "group {} holds a {} operation",
            key,
            stray.kind()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::JobStatusInfo;
    use crate::job::JobStatus;
    use crate::operation::OperationKind;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;
    use zendesk_http_client::{ZendeskApiError, ZendeskApiResult};

    #[derive(Default)]
    struct RecordingApi {
        bodies: Mutex<Vec<(String, Value)>>,
        reject: bool,
    }

    #[async_trait]
    impl BulkJobApi for RecordingApi {
        async fn create_job(
            &self,
            entity_key: &str,
            request: &JobRequest<'_>,
        ) -> ZendeskApiResult<JobStatusInfo> {
            if self.reject {
                return Err(ZendeskApiError::Api {
                    status: 422,
                    message: "invalid".to_string(),
                });
            }
            self.bodies
                .lock()
                .unwrap()
                .push((entity_key.to_string(), serde_json::to_value(request)?));
            Ok(JobStatusInfo {
                id: "V3-1".to_string(),
                status: JobStatus::Queued,
                message: None,
                progress: None,
                total: None,
            })
        }

        async fn job_status(&self, _job_id: &str) -> ZendeskApiResult<JobStatusInfo> {
            unreachable!("submitter never polls")
        }
    }

    fn deletes(n: usize) -> Vec<Operation> {
        (0..n).map(|i| Operation::Delete(i.to_string())).collect()
    }

    #[tokio::test]
    async fn submits_group_as_one_job() {
        let api = RecordingApi::default();
        let job = JobSubmitter::new(&api)
            .submit(BatchKey::new("apt", OperationKind::Delete), deletes(2))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(job.id, "V3-1");
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.operations.len(), 2);

        let bodies = api.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].0, "apt");
        assert_eq!(
            bodies[0].1,
            serde_json::json!({"job": {"action": "delete", "items": ["0", "1"]}})
        );
    }

    #[tokio::test]
    async fn empty_group_makes_no_call() {
        let api = RecordingApi::default();
        let job = JobSubmitter::new(&api)
            .submit(BatchKey::new("apt", OperationKind::Delete), Vec::new())
            .await
            .unwrap();
        assert!(job.is_none());
        assert!(api.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_group_is_an_invariant_violation() {
        let api = RecordingApi::default();
        let err = JobSubmitter::new(&api)
            .submit(
                BatchKey::new("apt", OperationKind::Delete),
                deletes(MAX_GROUP_SIZE + 1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BatchSyncError::InternalInvariant(_)));
        assert!(api.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mixed_kinds_are_an_invariant_violation() {
        let api = RecordingApi::default();
        let mut ops = deletes(1);
        ops.push(Operation::DeleteByExternalId("e1".to_string()));
        let err = JobSubmitter::new(&api)
            .submit(BatchKey::new("apt", OperationKind::Delete), ops)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchSyncError::InternalInvariant(_)));
    }

    #[tokio::test]
    async fn transport_failure_names_group() {
        let api = RecordingApi {
            reject: true,
            ..Default::default()
        };
        let err = JobSubmitter::new(&api)
            .submit(BatchKey::new("apt", OperationKind::Delete), deletes(1))
            .await
            .unwrap_err();

        match err {
            BatchSyncError::Submission {
                entity_key,
                operation,
                ..
            } => {
                assert_eq!(entity_key, "apt");
                assert_eq!(operation, OperationKind::Delete);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
