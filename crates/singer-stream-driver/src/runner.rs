//! The message loop.

use crate::error::{DriverError, DriverResult};
use crate::message::{SingerMessage, SUPPORTED_STREAM};
use custom_object_batch_sync::{
    ActionResolver, Batch, BatchFlusher, BulkJobApi, CustomObjectRecord, DirectRecordApi,
    DirectRecordWriter, Operation,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use target_config_and_utils::{TargetConfig, WriteMode};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Settings the driver takes from [`TargetConfig`].
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub default_action: String,
    pub validate_records: bool,
    pub write_mode: WriteMode,
    pub poll_interval: Duration,
    pub poll_timeout: Option<Duration>,
}

impl From<&TargetConfig> for DriverOptions {
    fn from(config: &TargetConfig) -> Self {
        Self {
            default_action: config.default_action.clone(),
            validate_records: config.validate_records,
            write_mode: config.write_mode,
            poll_interval: config.poll_interval(),
            poll_timeout: config.poll_timeout(),
        }
    }
}

/// Counters for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    pub jobs_completed: usize,
    pub items_written: usize,
    pub direct_writes: usize,
    pub states_emitted: usize,
}

pub struct StreamDriver {
    resolver: ActionResolver,
    batch: Batch,
    flusher: BatchFlusher,
    direct: Option<DirectRecordWriter>,
    validate_records: bool,
    cancel: CancellationToken,
    streams: HashSet<String>,
    summary: RunSummary,
}

impl StreamDriver {
    /// `api` serves both the bulk job path and, in direct mode, the PATCH path.
    pub fn new<C>(options: DriverOptions, api: Arc<C>, cancel: CancellationToken) -> Self
    where
        C: BulkJobApi + DirectRecordApi + 'static,
    {
        let bulk: Arc<dyn BulkJobApi> = api.clone();
        let flusher = BatchFlusher::new(bulk, options.poll_interval, cancel.clone())
            .with_poll_timeout(options.poll_timeout);

        let direct = match options.write_mode {
            WriteMode::Direct => {
                let patch: Arc<dyn DirectRecordApi> = api;
                Some(DirectRecordWriter::new(patch))
            }
            WriteMode::BulkJob => None,
        };

        Self {
            resolver: ActionResolver::new(options.default_action),
            batch: Batch::new(),
            flusher,
            direct,
            validate_records: options.validate_records,
            cancel,
            streams: HashSet::new(),
            summary: RunSummary::default(),
        }
    }

    /// Consume `input` to the end, writing STATE messages to `output`.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> DriverResult<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.batch.reset();
        self.summary = RunSummary::default();

        let mut lines = input.lines();
        let mut line_no = 0usize;

        loop {
            let line = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    warn!(line = line_no, pending = self.batch.size(), "Run cancelled");
                    return Err(DriverError::Cancelled);
                }
                line = lines.next_line() => line?,
            };
            let Some(line) = line else { break };
            line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let message = SingerMessage::parse(&line).map_err(|source| DriverError::Json {
                line: line_no,
                source,
            })?;
            self.handle(line_no, message, output).await?;
        }

        self.flush().await?;
        info!(
            records = self.summary.records,
            jobs = self.summary.jobs_completed,
            items = self.summary.items_written,
            direct_writes = self.summary.direct_writes,
            "Input exhausted"
        );
        Ok(self.summary.clone())
    }

    async fn handle<W: Write>(
        &mut self,
        line: usize,
        message: SingerMessage,
        output: &mut W,
    ) -> DriverResult<()> {
        match message {
            SingerMessage::Schema {
                stream,
                key_properties,
                ..
            } => {
                if stream != SUPPORTED_STREAM {
                    return Err(DriverError::UnsupportedStream(stream));
                }
                debug!(stream = %stream, ?key_properties, "Schema registered");
                self.streams.insert(stream);
            }
            SingerMessage::Record { stream, record } => {
                if !self.streams.contains(&stream) {
                    return Err(DriverError::UnknownStream { line, stream });
                }
                self.handle_record(line, record).await?;
            }
            SingerMessage::State { value } => {
                self.flush().await?;
                emit_state(output, value)?;
                self.summary.states_emitted += 1;
            }
            SingerMessage::ActivateVersion { stream } => {
                debug!(line, ?stream, "Ignoring ACTIVATE_VERSION");
            }
            SingerMessage::Unknown => {
                warn!(line, "Ignoring message of unknown type");
            }
        }
        Ok(())
    }

    async fn handle_record(&mut self, line: usize, raw: Value) -> DriverResult<()> {
        let record: CustomObjectRecord = serde_json::from_value(raw)
            .map_err(|source| DriverError::InvalidRecord { line, source })?;
        self.summary.records += 1;

        if self.validate_records {
            record
                .validate_schema()
                .map_err(|source| DriverError::Validation { line, source })?;
        }
        let operation = self
            .resolver
            .resolve(&record)
            .map_err(|source| DriverError::Validation { line, source })?;

        if let Some(writer) = &self.direct {
            writer.write(&record.custom_object_key, &operation).await?;
            self.summary.direct_writes += 1;
            return Ok(());
        }
        self.enqueue(&record.custom_object_key, operation).await
    }

    async fn enqueue(&mut self, entity_key: &str, operation: Operation) -> DriverResult<()> {
        self.batch.enqueue(entity_key, operation);
        if self.batch.is_full() {
            debug!(size = self.batch.size(), "Group full, flushing");
            self.flush().await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> DriverResult<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        let report = self.flusher.flush(&mut self.batch).await?;
        self.summary.jobs_completed += report.jobs_completed();
        self.summary.items_written += report.items_written();
        Ok(())
    }
}

fn emit_state<W: Write>(output: &mut W, value: Value) -> DriverResult<()> {
    serde_json::to_writer(&mut *output, &json!({"type": "STATE", "value": value}))
        .map_err(std::io::Error::from)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
