//! Remote API seams for bulk jobs and direct record writes.
//!
//! The pipeline talks to Zendesk through these traits so tests can replay
//! scripted job status sequences. [`ZendeskClient`] implements both.

use crate::job::JobStatus;
use crate::operation::{Operation, OperationKind, RecordLocator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use zendesk_http_client::{ZendeskApiError, ZendeskApiResult, ZendeskClient};

/// Body of `POST /api/v2/custom_objects/{key}/jobs`.
#[derive(Debug, Serialize)]
pub struct JobRequest<'a> {
    pub job: JobSpec<'a>,
}

#[derive(Debug, Serialize)]
pub struct JobSpec<'a> {
    pub action: OperationKind,
    pub items: &'a [Operation],
}

impl<'a> JobRequest<'a> {
    pub fn new(action: OperationKind, items: &'a [Operation]) -> Self {
        Self {
            job: JobSpec { action, items },
        }
    }
}

/// Response shape shared by job creation and job status lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusEnvelope {
    pub job_status: JobStatusInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusInfo {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub progress: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Submission and status lookup of asynchronous bulk jobs.
#[async_trait]
pub trait BulkJobApi: Send + Sync {
    /// Create a job for one group and return its initial status.
    async fn create_job(
        &self,
        entity_key: &str,
        request: &JobRequest<'_>,
    ) -> ZendeskApiResult<JobStatusInfo>;

    /// Fetch the current status of a job.
    async fn job_status(&self, job_id: &str) -> ZendeskApiResult<JobStatusInfo>;
}

/// Synchronous single-record updates.
#[async_trait]
pub trait DirectRecordApi: Send + Sync {
    async fn patch_record(
        &self,
        entity_key: &str,
        locator: &RecordLocator,
        body: &Value,
    ) -> ZendeskApiResult<()>;
}

/// Percent-encode one path segment taken from record data.
///
/// Dot segments survive encoding and would be collapsed by URL
/// normalization, so they are refused along with empty values.
fn segment(value: &str) -> ZendeskApiResult<Cow<'_, str>> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(ZendeskApiError::Config(format!(
            "'{}' cannot be used as a URL path segment",
            value
        )));
    }
    Ok(urlencoding::encode(value))
}

fn jobs_path(entity_key: &str) -> ZendeskApiResult<String> {
    Ok(format!("/api/v2/custom_objects/{}/jobs", segment(entity_key)?))
}

fn job_status_path(job_id: &str) -> ZendeskApiResult<String> {
    Ok(format!("/api/v2/job_statuses/{}", segment(job_id)?))
}

fn records_path(entity_key: &str) -> ZendeskApiResult<String> {
    Ok(format!("/api/v2/custom_objects/{}/records", segment(entity_key)?))
}

#[async_trait]
impl BulkJobApi for ZendeskClient {
    async fn create_job(
        &self,
        entity_key: &str,
        request: &JobRequest<'_>,
    ) -> ZendeskApiResult<JobStatusInfo> {
        let response = self.post(&jobs_path(entity_key)?, request).await?;
        let envelope: JobStatusEnvelope = serde_json::from_value(response)?;
        Ok(envelope.job_status)
    }

    async fn job_status(&self, job_id: &str) -> ZendeskApiResult<JobStatusInfo> {
        let response = self.get(&job_status_path(job_id)?).await?;
        let envelope: JobStatusEnvelope = serde_json::from_value(response)?;
        Ok(envelope.job_status)
    }
}

#[async_trait]
impl DirectRecordApi for ZendeskClient {
    async fn patch_record(
        &self,
        entity_key: &str,
        locator: &RecordLocator,
        body: &Value,
    ) -> ZendeskApiResult<()> {
        let records = records_path(entity_key)?;
        match locator {
            RecordLocator::Id(id) => {
                let path = format!("{}/{}", records, segment(id)?);
                self.patch(&path, &[], body).await?;
            }
            RecordLocator::ExternalId(external_id) => {
                self.patch(&records, &[("external_id", external_id.as_str())], body)
                    .await?;
            }
            RecordLocator::Name(name) => {
                self.patch(&records, &[("name", name.as_str())], body).await?;
            }
        }
        Ok(())
    }
}
