//! Singer wire messages.

use serde::Deserialize;
use serde_json::Value;

/// The only stream this target accepts.
pub const SUPPORTED_STREAM: &str = "custom_object_records";

/// One line of Singer input, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SingerMessage {
    Schema {
        stream: String,
        #[serde(default)]
        schema: Value,
        #[serde(default)]
        key_properties: Vec<String>,
    },
    Record {
        stream: String,
        record: Value,
    },
    State {
        #[serde(default)]
        value: Value,
    },
    ActivateVersion {
        #[serde(default)]
        stream: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl SingerMessage {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}
