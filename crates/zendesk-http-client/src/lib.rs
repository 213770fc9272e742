//! Authenticated HTTP client for the Zendesk REST API.
//!
//! Authentication headers are fixed when the client is built; callers only
//! pass API paths relative to the configured `url_base`.

mod client;
mod error;

pub use client::{authorization_header, ZendeskClient};
pub use error::{ZendeskApiError, ZendeskApiResult};
pub use target_config_and_utils::AuthMethod;
