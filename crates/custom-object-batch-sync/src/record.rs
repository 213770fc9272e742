//! Incoming custom object records.

use crate::error::ValidationError;
use crate::operation::RecordLocator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A change record for the `custom_object_records` stream.
///
/// `null` and absent are the same for every optional field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomObjectRecord {
    pub custom_object_key: String,
    #[serde(default)]
    pub custom_object_fields: Option<Value>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, alias = "custom_object_record_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CustomObjectRecord {
    /// The first identifying field present, in precedence order.
    pub fn locator(&self) -> Option<RecordLocator> {
        if let Some(id) = &self.id {
            Some(RecordLocator::Id(id.clone()))
        } else if let Some(ext) = &self.external_id {
            Some(RecordLocator::ExternalId(ext.clone()))
        } else {
            self.name.clone().map(RecordLocator::Name)
        }
    }

    /// Schema check mirroring the stream's declared required properties.
    pub fn validate_schema(&self) -> Result<(), ValidationError> {
        if self.custom_object_key.is_empty() {
            return Err(ValidationError::MissingProperty("custom_object_key"));
        }
        match &self.custom_object_fields {
            None => Err(ValidationError::MissingProperty("custom_object_fields")),
            Some(Value::Object(_)) => Ok(()),
            Some(other) => Err(ValidationError::FieldsNotObject(json_type_name(other))),
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Record-level action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Upsert,
    Delete,
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upsert" => Ok(Self::Upsert),
            "delete" => Ok(Self::Delete),
            other => Err(ValidationError::UnsupportedAction(other.to_string())),
        }
    }
}
