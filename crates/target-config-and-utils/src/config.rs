//! Target configuration loaded from the `--config` JSON file.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default Zendesk API host.
pub const DEFAULT_URL_BASE: &str = "https://zendesk.com";

/// Default action applied to records without an `action` field.
pub const DEFAULT_ACTION: &str = "upsert";

/// Values accepted for `default_action`.
pub const SUPPORTED_DEFAULT_ACTIONS: [&str; 3] = ["insert", "upsert", "delete"];

/// Default job status polling interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// How resolved records are written to Zendesk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Accumulate records and submit them as bulk jobs.
    #[default]
    BulkJob,
    /// Apply each upsert immediately with a synchronous PATCH.
    Direct,
}

/// Credentials used to build the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Basic auth with `{username}/token:{token}`.
    ApiToken { username: String, token: String },
    /// Bearer token from a completed OAuth flow.
    OAuth { token: String },
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiToken { username, .. } => f
                .debug_struct("ApiToken")
                .field("username", username)
                .field("token", &"<redacted>")
                .finish(),
            Self::OAuth { .. } => f
                .debug_struct("OAuth")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Target configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Hostname for the Zendesk API.
    #[serde(default = "default_url_base")]
    pub url_base: String,
    /// Username/email for basic API token authentication.
    #[serde(default)]
    pub api_username: Option<String>,
    /// Token for basic API token authentication.
    #[serde(default)]
    pub api_token: Option<String>,
    /// OAuth token from a completed login flow.
    #[serde(default)]
    pub oauth_token: Option<String>,
    /// Action used for records that carry none (insert, upsert, delete).
    #[serde(default = "default_action")]
    pub default_action: String,
    /// Enforce the record schema before resolving actions.
    #[serde(default = "default_true")]
    pub validate_records: bool,
    #[serde(default)]
    pub write_mode: WriteMode,
    /// Wait between job status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Upper bound on polling a single job. Unset means poll until terminal.
    #[serde(default)]
    pub poll_timeout_secs: Option<u64>,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_url_base() -> String {
    DEFAULT_URL_BASE.to_string()
}

fn default_action() -> String {
    DEFAULT_ACTION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url_base: default_url_base(),
            api_username: None,
            api_token: None,
            oauth_token: None,
            default_action: default_action(),
            validate_records: true,
            write_mode: WriteMode::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_timeout_secs: None,
            log_level: default_log_level(),
        }
    }
}

impl TargetConfig {
    /// Load, env-override and validate the configuration file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let mut config = Self::load_from_file(path)?;
        config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file without validating it.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TargetConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Only the log level can be overridden from the environment.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("TARGET_ZENDESK_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    /// Check settings that serde cannot express.
    pub fn validate(&self) -> CoreResult<()> {
        if !SUPPORTED_DEFAULT_ACTIONS.contains(&self.default_action.as_str()) {
            return Err(CoreError::Config(format!(
                "default_action must be one of: {}; got '{}'",
                SUPPORTED_DEFAULT_ACTIONS.join(", "),
                self.default_action
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(CoreError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        self.url_base()?;
        self.auth_method()?;
        Ok(())
    }

    /// The API base URL without a trailing slash.
    pub fn url_base(&self) -> CoreResult<String> {
        let parsed = Url::parse(&self.url_base)?;
        if !parsed.has_host() {
            return Err(CoreError::Config(format!(
                "url_base must include a host: '{}'",
                self.url_base
            )));
        }
        Ok(self.url_base.trim_end_matches('/').to_string())
    }

    /// Credentials to authenticate with. API token auth wins over OAuth.
    pub fn auth_method(&self) -> CoreResult<AuthMethod> {
        match (&self.api_username, &self.api_token, &self.oauth_token) {
            (Some(username), Some(token), _) => Ok(AuthMethod::ApiToken {
                username: username.clone(),
                token: token.clone(),
            }),
            (_, _, Some(token)) => Ok(AuthMethod::OAuth {
                token: token.clone(),
            }),
            _ => Err(CoreError::Config(
                "Either api_username and api_token or oauth_token must be set for authentication"
                    .to_string(),
            )),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_secs.map(Duration::from_secs)
    }
}
