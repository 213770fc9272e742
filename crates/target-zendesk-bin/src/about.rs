//! `--about` output.

use serde_json::{json, Value};
use singer_stream_driver::SUPPORTED_STREAM;
use target_config_and_utils::{
    DEFAULT_ACTION, DEFAULT_POLL_INTERVAL_MS, DEFAULT_URL_BASE, SUPPORTED_DEFAULT_ACTIONS,
};

pub fn describe() -> Value {
    json!({
        "name": "target-zendesk",
        "version": env!("CARGO_PKG_VERSION"),
        "streams": [SUPPORTED_STREAM],
        "capabilities": ["about"],
        "settings": [
            {"name": "url_base", "type": "string", "default": DEFAULT_URL_BASE},
            {"name": "api_username", "type": "string"},
            {"name": "api_token", "type": "string", "secret": true},
            {"name": "oauth_token", "type": "string", "secret": true},
            {"name": "default_action", "type": "string", "default": DEFAULT_ACTION,
             "allowed_values": SUPPORTED_DEFAULT_ACTIONS},
            {"name": "validate_records", "type": "boolean", "default": true},
            {"name": "write_mode", "type": "string", "default": "bulk_job",
             "allowed_values": ["bulk_job", "direct"]},
            {"name": "poll_interval_ms", "type": "integer", "default": DEFAULT_POLL_INTERVAL_MS},
            {"name": "poll_timeout_secs", "type": "integer"},
            {"name": "log_level", "type": "string", "default": "info"},
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_stream_and_secret_settings() {
        let about = describe();
        assert_eq!(about["streams"], json!(["custom_object_records"]));
        let secrets: Vec<&str> = about["settings"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|s| s["secret"] == json!(true))
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(secrets, vec!["api_token", "oauth_token"]);
    }
}
