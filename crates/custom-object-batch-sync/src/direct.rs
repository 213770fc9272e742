//! Synchronous single-record writes via PATCH.

use crate::api::DirectRecordApi;
use crate::error::{BatchSyncError, BatchSyncResult, ValidationError};
use crate::operation::{Operation, RecordLocator, RecordPayload};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, error};

/// Body for `PATCH .../records`.
///
/// The external id or name used to locate the record is echoed inside
/// `custom_object_record`; an id only appears in the path.
pub fn direct_write_body(payload: &RecordPayload) -> Value {
    let mut record = Map::new();
    record.insert(
        "custom_object_fields".to_string(),
        Value::Object(payload.custom_object_fields.clone()),
    );
    if let Some(external_id) = &payload.external_id {
        record.insert("external_id".to_string(), json!(external_id));
    }
    if let Some(name) = &payload.name {
        record.insert("name".to_string(), json!(name));
    }
    json!({ "custom_object_record": record })
}

/// Applies identified upserts one record at a time.
#[derive(Clone)]
pub struct DirectRecordWriter {
    api: Arc<dyn DirectRecordApi>,
}

impl DirectRecordWriter {
    pub fn new(api: Arc<dyn DirectRecordApi>) -> Self {
        Self { api }
    }

    /// Creates and deletes have no PATCH form and are rejected.
    pub async fn write(&self, entity_key: &str, operation: &Operation) -> BatchSyncResult<()> {
        let (payload, locator) = match operation {
            Operation::Update(p) | Operation::UpsertByExternalId(p) | Operation::UpsertByName(p) => {
                match p.locator() {
                    Some(locator) => (p, locator),
                    None => return Err(unsupported(operation)),
                }
            }
            _ => return Err(unsupported(operation)),
        };

        debug!(entity_key, kind = %operation.kind(), "Direct record write");

        self.api
            .patch_record(entity_key, &locator, &direct_write_body(payload))
            .await
            .map_err(|source| {
                error!(entity_key, locator = %describe(&locator), error = %source, "Direct write failed");
                BatchSyncError::DirectWrite {
                    entity_key: entity_key.to_string(),
                    source,
                }
            })
    }
}

fn unsupported(operation: &Operation) -> BatchSyncError {
    ValidationError::DirectWriteUnsupported(operation.kind()).into()
}

fn describe(locator: &RecordLocator) -> String {
    match locator {
        RecordLocator::Id(v) => format!("id={}", v),
        RecordLocator::ExternalId(v) => format!("external_id={}", v),
        RecordLocator::Name(v) => format!("name={}", v),
    }
}
