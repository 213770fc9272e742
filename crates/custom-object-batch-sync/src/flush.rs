//! Flush entrypoint: drain a batch through submit and poll.

use crate::api::BulkJobApi;
use crate::batch::Batch;
use crate::error::BatchSyncResult;
use crate::job::JobOutcome;
use crate::poller::JobPoller;
use crate::submitter::JobSubmitter;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Completed jobs of one flush.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlushReport {
    pub jobs: Vec<JobOutcome>,
}

impl FlushReport {
    pub fn jobs_completed(&self) -> usize {
        self.jobs.len()
    }

    pub fn items_written(&self) -> usize {
        self.jobs.iter().map(|j| j.item_count).sum()
    }
}

/// Submits every non-empty group of a batch and polls each job to a
/// terminal status before the next group is submitted.
#[derive(Clone)]
pub struct BatchFlusher {
    api: Arc<dyn BulkJobApi>,
    poll_interval: Duration,
    poll_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl BatchFlusher {
    pub fn new(api: Arc<dyn BulkJobApi>, poll_interval: Duration, cancel: CancellationToken) -> Self {
        Self {
            api,
            poll_interval,
            poll_timeout: None,
            cancel,
        }
    }

    pub fn with_poll_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Drain `batch` and process its groups in key order.
    ///
    /// The batch is empty afterwards even on error. The first failing group
    /// aborts the flush: earlier groups stay applied, later ones are dropped.
    pub async fn flush(&self, batch: &mut Batch) -> BatchSyncResult<FlushReport> {
        let groups = batch.drain();
        let total = groups.len();
        let mut report = FlushReport::default();

        let submitter = JobSubmitter::new(self.api.as_ref());
        let poller = JobPoller::new(self.api.as_ref(), self.poll_interval, self.cancel.clone())
            .with_timeout(self.poll_timeout);

        for (index, (key, operations)) in groups.into_iter().enumerate() {
            let result = match submitter.submit(key, operations).await {
                Ok(Some(job)) => poller.poll_to_terminal(job).await,
                Ok(None) => continue,
                Err(e) => Err(e),
            };

            match result {
                Ok(outcome) => report.jobs.push(outcome),
                Err(e) => {
                    warn!(
                        completed_groups = report.jobs_completed(),
                        skipped_groups = total - index - 1,
                        "Flush aborted, completed groups are not rolled back"
                    );
                    return Err(e);
                }
            }
        }

        if report.jobs_completed() > 0 {
            info!(
                jobs = report.jobs_completed(),
                items = report.items_written(),
                "Batch flushed"
            );
        }
        Ok(report)
    }
}
