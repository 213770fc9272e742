//! Drives a submitted job to a terminal status.

use crate::api::BulkJobApi;
use crate::error::{BatchSyncError, BatchSyncResult};
use crate::job::{Job, JobOutcome, JobStatus};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Fixed-interval job status poller.
///
/// There is no retry limit: a job is polled until it leaves
/// `queued`/`working`, the status request fails, the cancellation token
/// fires, or the optional timeout elapses.
pub struct JobPoller<'a, A: ?Sized> {
    api: &'a A,
    interval: Duration,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl<'a, A: BulkJobApi + ?Sized> JobPoller<'a, A> {
    pub fn new(api: &'a A, interval: Duration, cancel: CancellationToken) -> Self {
        Self {
            api,
            interval,
            timeout: None,
            cancel,
        }
    }

    /// Give up on a job that is still pending after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn poll_to_terminal(&self, mut job: Job) -> BatchSyncResult<JobOutcome> {
        let started = Instant::now();
        let mut polls: u64 = 0;

        while job.status.is_pending() {
            // The last wait is cut short so the status is read once more at the deadline.
            let wait = match self.timeout {
                Some(timeout) => {
                    let elapsed = started.elapsed();
                    if elapsed >= timeout {
                        warn!(job_id = %job.id, group = %job.key, "Job polling timed out");
                        return Err(BatchSyncError::PollTimeout {
                            job_id: job.id,
                            waited: elapsed,
                        });
                    }
                    self.interval.min(timeout - elapsed)
                }
                None => self.interval,
            };

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    warn!(job_id = %job.id, group = %job.key, "Job polling cancelled");
                    return Err(BatchSyncError::Cancelled { job_id: job.id });
                }
                _ = tokio::time::sleep(wait) => {}
            }

            let info = self.api.job_status(&job.id).await.map_err(|source| {
                error!(job_id = %job.id, group = %job.key, error = %source, "Job status request failed");
                BatchSyncError::PollTransport {
                    entity_key: job.key.entity_key.clone(),
                    operation: job.key.kind,
                    job_id: job.id.clone(),
                    source,
                }
            })?;
            polls = polls.saturating_add(1);

            debug!(job_id = %job.id, status = %info.status, progress = ?info.progress, total = ?info.total, "Job status");
            job.status = info.status;
            job.message = info.message;
        }

        if job.status != JobStatus::Completed {
            error!(
                job_id = %job.id,
                group = %job.key,
                status = %job.status,
                message = ?job.message,
                items = job.operations.len(),
                "Job failed"
            );
            return Err(BatchSyncError::JobFailed {
                entity_key: job.key.entity_key,
                operation: job.key.kind,
                job_id: job.id,
                status: job.status.as_str().to_string(),
                message: job.message,
            });
        }

        info!(job_id = %job.id, group = %job.key, polls, "Job completed");
        Ok(JobOutcome {
            job_id: job.id,
            item_count: job.operations.len(),
            key: job.key,
            polls,
        })
    }
}
