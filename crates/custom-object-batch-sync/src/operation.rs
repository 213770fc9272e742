//! Resolved operations and their bulk job tags.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// The kind of a resolved operation.
///
/// Serializes to the `action` tag of the bulk jobs endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OperationKind {
    #[serde(rename = "create")]
    Create,
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "create_or_update_by_external_id")]
    UpsertByExternalId,
    #[serde(rename = "create_or_update_by_name")]
    UpsertByName,
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "delete_by_external_id")]
    DeleteByExternalId,
}

impl OperationKind {
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::UpsertByExternalId => "create_or_update_by_external_id",
            Self::UpsertByName => "create_or_update_by_name",
            Self::Delete => "delete",
            Self::DeleteByExternalId => "delete_by_external_id",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// The identifying field a record was routed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLocator {
    Id(String),
    ExternalId(String),
    Name(String),
}

/// Item body for create and update jobs.
///
/// Holds the record's fields verbatim plus at most one identifying field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPayload {
    pub custom_object_fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RecordPayload {
    pub fn new(custom_object_fields: Map<String, Value>, locator: Option<&RecordLocator>) -> Self {
        let mut payload = Self {
            custom_object_fields,
            id: None,
            external_id: None,
            name: None,
        };
        match locator {
            Some(RecordLocator::Id(id)) => payload.id = Some(id.clone()),
            Some(RecordLocator::ExternalId(ext)) => payload.external_id = Some(ext.clone()),
            Some(RecordLocator::Name(name)) => payload.name = Some(name.clone()),
            None => {}
        }
        payload
    }

    /// The identifying field carried by this payload, if any.
    pub fn locator(&self) -> Option<RecordLocator> {
        if let Some(id) = &self.id {
            Some(RecordLocator::Id(id.clone()))
        } else if let Some(ext) = &self.external_id {
            Some(RecordLocator::ExternalId(ext.clone()))
        } else {
            self.name.clone().map(RecordLocator::Name)
        }
    }
}

/// One unit of work derived from a single record.
///
/// Serializes to a bulk job item: an object for creates and updates, the
/// bare identifier string for deletes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operation {
    Create(RecordPayload),
    Update(RecordPayload),
    UpsertByExternalId(RecordPayload),
    UpsertByName(RecordPayload),
    Delete(String),
    DeleteByExternalId(String),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Create(_) => OperationKind::Create,
            Self::Update(_) => OperationKind::Update,
            Self::UpsertByExternalId(_) => OperationKind::UpsertByExternalId,
            Self::UpsertByName(_) => OperationKind::UpsertByName,
            Self::Delete(_) => OperationKind::Delete,
            Self::DeleteByExternalId(_) => OperationKind::DeleteByExternalId,
        }
    }

    pub fn payload(&self) -> Option<&RecordPayload> {
        match self {
            Self::Create(p) | Self::Update(p) | Self::UpsertByExternalId(p) | Self::UpsertByName(p) => {
                Some(p)
            }
            Self::Delete(_) | Self::DeleteByExternalId(_) => None,
        }
    }
}
