//! # custom-object-batch-sync
//!
//! Turns a stream of custom object change records into Zendesk bulk jobs.
//!
//! ## Architecture
//!
//! ```text
//! record ──▶ ActionResolver ──▶ Batch ──(flush)──▶ JobSubmitter ──▶ JobPoller
//!            (pure)             (per cycle)         POST .../jobs     GET job_statuses/{id}
//! ```
//!
//! - [`ActionResolver`] maps one record onto an [`Operation`] using a fixed
//!   precedence: `id`, then `external_id`, then `name`, then none.
//! - [`Batch`] groups operations by `(custom_object_key, kind)`. A group is
//!   full at [`MAX_GROUP_SIZE`] items; the caller decides when to flush.
//! - [`BatchFlusher`] drains a batch group by group: submit one job, poll
//!   it to a terminal status, then move on to the next group.
//! - [`DirectRecordWriter`] is the synchronous alternative that PATCHes a
//!   single record instead of batching.
//!
//! Groups are not transactional: when a group fails, groups flushed before
//! it stay applied and later groups are never submitted.

mod api;
mod batch;
mod direct;
mod error;
mod flush;
mod job;
mod operation;
mod poller;
mod record;
mod resolver;
mod submitter;

pub use api::{BulkJobApi, DirectRecordApi, JobRequest, JobSpec, JobStatusEnvelope, JobStatusInfo};
pub use batch::{Batch, BatchKey, MAX_GROUP_SIZE};
pub use direct::{direct_write_body, DirectRecordWriter};
pub use error::{BatchSyncError, BatchSyncResult, ValidationError};
pub use flush::{BatchFlusher, FlushReport};
pub use job::{Job, JobOutcome, JobStatus};
pub use operation::{Operation, OperationKind, RecordLocator, RecordPayload};
pub use poller::JobPoller;
pub use record::{Action, CustomObjectRecord};
pub use resolver::ActionResolver;
pub use submitter::JobSubmitter;
