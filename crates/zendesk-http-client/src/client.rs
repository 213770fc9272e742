//! Zendesk REST API client.

use crate::error::{ZendeskApiError, ZendeskApiResult};
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use target_config_and_utils::AuthMethod;
use tracing::{debug, warn};

/// Longest slice of an error body kept in `ZendeskApiError::Api`.
const MAX_ERROR_BODY_CHARS: usize = 2048;

/// Render the `Authorization` header value for the given credentials.
pub fn authorization_header(auth: &AuthMethod) -> String {
    match auth {
        AuthMethod::ApiToken { username, token } => {
            let credentials = format!("{}/token:{}", username, token);
            let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
            format!("Basic {}", encoded)
        }
        AuthMethod::OAuth { token } => format!("Bearer {}", token),
    }
}

/// Zendesk API client with pre-configured authentication.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct ZendeskClient {
    http_client: reqwest::Client,
    url_base: String,
}

impl ZendeskClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `url_base` - Zendesk host, e.g. `https://acme.zendesk.com`
    /// * `auth` - Credentials sent with every request
    pub fn new(url_base: impl Into<String>, auth: &AuthMethod) -> ZendeskApiResult<Self> {
        let mut authorization = HeaderValue::from_str(&authorization_header(auth))
            .map_err(|e| ZendeskApiError::Config(format!("invalid credentials: {}", e)))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            url_base: url_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_base(&self) -> &str {
        &self.url_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.url_base, path)
    }

    /// POST a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ZendeskApiResult<Value> {
        debug!(path, "POST");
        let response = self.http_client.post(self.url(path)).json(body).send().await?;
        Self::read_json(response).await
    }

    /// GET a resource.
    pub async fn get(&self, path: &str) -> ZendeskApiResult<Value> {
        debug!(path, "GET");
        let response = self.http_client.get(self.url(path)).send().await?;
        Self::read_json(response).await
    }

    /// PATCH a JSON body, optionally with query parameters.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> ZendeskApiResult<Value> {
        debug!(path, params = params.len(), "PATCH");
        let mut request = self.http_client.patch(self.url(path));
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.json(body).send().await?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> ZendeskApiResult<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body_len = body.len(), "Zendesk API error");
            return Err(ZendeskApiError::Api {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oauth() -> AuthMethod {
        AuthMethod::OAuth {
            token: "oauth-abc".to_string(),
        }
    }

    #[test]
    fn basic_auth_header_uses_token_suffix() {
        let header = authorization_header(&AuthMethod::ApiToken {
            username: "ops@acme.test".to_string(),
            token: "secret".to_string(),
        });
        let expected = base64::engine::general_purpose::STANDARD.encode("ops@acme.test/token:secret");
        assert_eq!(header, format!("Basic {}", expected));
    }

    #[test]
    fn bearer_auth_header() {
        assert_eq!(authorization_header(&oauth()), "Bearer oauth-abc");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ZendeskClient::new("https://acme.zendesk.com/", &oauth()).unwrap();
        assert_eq!(client.url_base(), "https://acme.zendesk.com");
        assert_eq!(
            client.url("/api/v2/job_statuses/1"),
            "https://acme.zendesk.com/api/v2/job_statuses/1"
        );
    }

    #[tokio::test]
    async fn post_sends_auth_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/custom_objects/apt/jobs"))
            .and(header("authorization", "Bearer oauth-abc"))
            .and(body_json(json!({"job": {"action": "delete", "items": ["1"]}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"job_status": {"id": "j1", "status": "queued"}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = ZendeskClient::new(server.uri(), &oauth()).unwrap();
        let response = client
            .post(
                "/api/v2/custom_objects/apt/jobs",
                &json!({"job": {"action": "delete", "items": ["1"]}}),
            )
            .await
            .unwrap();

        assert_eq!(response["job_status"]["id"], "j1");
    }

    #[tokio::test]
    async fn patch_sends_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v2/custom_objects/apt/records"))
            .and(query_param("external_id", "e1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"custom_object_record": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ZendeskClient::new(server.uri(), &oauth()).unwrap();
        client
            .patch(
                "/api/v2/custom_objects/apt/records",
                &[("external_id", "e1")],
                &json!({}),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/job_statuses/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("RecordNotFound"))
            .mount(&server)
            .await;

        let client = ZendeskClient::new(server.uri(), &oauth()).unwrap();
        let err = client.get("/api/v2/job_statuses/missing").await.unwrap_err();

        match err {
            ZendeskApiError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "RecordNotFound");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ZendeskClient::new(server.uri(), &oauth()).unwrap();
        let value = client.patch("/anything", &[], &json!({})).await.unwrap();
        assert!(value.is_null());
    }
}
