use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::common::ApiErrorResponse;
use super::error::ApiError;

/// Header selecting the tenant environment for every request
pub const ENVIRONMENT_HEADER: &str = "Devgraph-Environment";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Devgraph API client
///
/// Cheap to clone. Configured once at provider startup and never mutated.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
    environment: Option<String>,
}

impl Client {
    /// Create a new API client
    ///
    /// `host` must be an absolute http(s) URL. An empty environment is
    /// treated as unset.
    pub fn new(host: &str, access_token: &str, environment: Option<&str>) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(host)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", host, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}'",
                host,
                parsed.scheme()
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: host.trim_end_matches('/').to_string(),
                auth_header: format!("Bearer {}", access_token),
                environment: environment
                    .filter(|env| !env.is_empty())
                    .map(str::to_string),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn environment(&self) -> Option<&str> {
        self.inner.environment.as_deref()
    }

    /// Execute a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        self.parse_success_response(response).await
    }

    /// Execute a POST request with a JSON body
    pub async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        self.parse_success_response(response).await
    }

    /// Execute a PATCH request with a JSON body
    pub async fn patch<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::PATCH, path).json(body))
            .await?;
        self.parse_success_response(response).await
    }

    /// Execute a DELETE request. Any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// MCP API operations
    pub fn mcp(&self) -> crate::api::mcp::McpApi<'_> {
        crate::api::mcp::McpApi::new(self)
    }

    /// Model and model provider operations
    pub fn models(&self) -> crate::api::models::ModelsApi<'_> {
        crate::api::models::ModelsApi::new(self)
    }

    /// Environment operations
    pub fn environments(&self) -> crate::api::environments::EnvironmentsApi<'_> {
        crate::api::environments::EnvironmentsApi::new(self)
    }

    /// OAuth operations
    pub fn oauth(&self) -> crate::api::oauth::OAuthApi<'_> {
        crate::api::oauth::OAuthApi::new(self)
    }

    /// Discovery operations
    pub fn discovery(&self) -> crate::api::discovery::DiscoveryApi<'_> {
        crate::api::discovery::DiscoveryApi::new(self)
    }

    /// Chat operations
    pub fn chat(&self) -> crate::api::chat::ChatApi<'_> {
        crate::api::chat::ChatApi::new(self)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);

        tracing::debug!("{} request to: {}", method, url);

        let builder = self
            .inner
            .http_client
            .request(method, &url)
            .header(AUTHORIZATION, &self.inner.auth_header);

        match &self.inner.environment {
            Some(env) => builder.header(ENVIRONMENT_HEADER, env),
            None => builder,
        }
    }

    /// Send a request and map non-2xx statuses to errors
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(response.url().path().to_string())),
            StatusCode::UNAUTHORIZED => Err(ApiError::AuthError),
            _ => Err(self.handle_error_response(response).await),
        }
    }

    /// Parse successful response
    async fn parse_success_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;

        serde_json::from_str::<T>(&text).map_err(|e| {
            // Bodies may echo secrets, so only the error is logged
            tracing::error!("Failed to deserialize response: {}", e);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })
    }

    /// Handle error response
    async fn handle_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let details = serde_json::from_str::<ApiErrorResponse>(&text)
            .ok()
            .map(|body| Box::new(body.into_details()));

        let message = details
            .as_ref()
            .map(|d| d.detail.clone())
            .unwrap_or(text);

        ApiError::ApiError {
            status,
            message,
            details,
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[tokio::test]
    async fn test_client_sends_bearer_and_environment_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/items/1")
            .match_header("authorization", "Bearer secret-token")
            .match_header("devgraph-environment", "env-123")
            .with_body(r#"{"id":"1"}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "secret-token", Some("env-123")).unwrap();
        let item: Item = client.get("/api/v1/items/1").await.unwrap();

        assert_eq!(item, Item { id: "1".to_string() });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_omits_empty_environment_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/items/1")
            .match_header("devgraph-environment", Matcher::Missing)
            .with_body(r#"{"id":"1"}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", Some("")).unwrap();
        assert!(client.environment().is_none());
        let _: Item = client.get("/api/v1/items/1").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_maps_not_found_and_auth_errors() {
        let mut server = Server::new_async().await;
        let _missing = server
            .mock("GET", "/api/v1/items/missing")
            .with_status(404)
            .with_body(r#"{"detail":"Not found"}"#)
            .create_async()
            .await;
        let _denied = server
            .mock("GET", "/api/v1/items/denied")
            .with_status(401)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", None).unwrap();

        let missing = client.get::<Item>("/api/v1/items/missing").await;
        assert!(missing.as_ref().is_err_and(ApiError::is_not_found));

        let denied = client.get::<Item>("/api/v1/items/denied").await;
        assert!(matches!(denied, Err(ApiError::AuthError)));
    }

    #[tokio::test]
    async fn test_client_parses_error_detail() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/items")
            .with_status(422)
            .with_body(r#"{"detail":[{"loc":["body","name"],"msg":"field required"}]}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", None).unwrap();
        let result = client
            .post::<Item, _>("/api/v1/items", &serde_json::json!({}))
            .await;

        match result {
            Err(ApiError::ApiError {
                status,
                message,
                details,
            }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "field required");
                assert!(details.is_some());
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_keeps_raw_body_when_error_is_not_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/v1/items/1")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", None).unwrap();
        let err = client.delete("/api/v1/items/1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API returned error (HTTP 500): upstream exploded"
        );
    }

    #[tokio::test]
    async fn test_client_reports_shape_mismatch_as_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PATCH", "/api/v1/items/1")
            .match_body(Matcher::Json(serde_json::json!({"name": null})))
            .with_body(r#"{"unexpected":true}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", None).unwrap();
        let result = client
            .patch::<Item, _>("/api/v1/items/1", &serde_json::json!({"name": null}))
            .await;
        assert!(matches!(result, Err(ApiError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_client_strips_trailing_slash_from_host() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/v1/items/1")
            .with_status(204)
            .create_async()
            .await;

        let client = Client::new(&format!("{}/", server.url()), "token", None).unwrap();
        client.delete("/api/v1/items/1").await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_client_rejects_invalid_hosts() {
        assert!(matches!(
            Client::new("not a url", "token", None),
            Err(ApiError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            Client::new("ftp://files.example.com", "token", None),
            Err(ApiError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_client_handles_network_errors() {
        let client = Client::new("http://127.0.0.1:9", "token", None).unwrap();
        let result = client.get::<Item>("/api/v1/items/1").await;
        assert!(matches!(result, Err(ApiError::RequestError(_))));
    }
}
