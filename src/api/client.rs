//! HTTP Request Wrapper
//!
//! The one place requests are built and responses normalized. Domain
//! clients bind endpoints on top of [`HttpClient`]; none of them touch
//! `reqwest` directly.

use super::error::{ApiError, ApiResult};
use crate::session::SessionStore;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Per-request settings
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// JSON body, sent verbatim
    pub body: Option<Value>,
    /// Header overrides, applied after the defaults
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    /// Options for the given method with no body and no overrides
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// GET with no body
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// POST with no body
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add a header override
    pub fn header(mut self, name: &str, value: &str) -> ApiResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("header {}: {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

/// Shared request wrapper bound to one base address
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl HttpClient {
    /// Create a wrapper for `base_url`
    ///
    /// `timeout` of `None` leaves the transport's own behaviour in place.
    pub fn new(
        base_url: impl Into<String>,
        session: SessionStore,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            "comics-timeline/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, base_url, session))
    }

    /// Wrap an existing `reqwest` client
    pub fn with_client(client: Client, base_url: impl Into<String>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            session,
        }
    }

    /// Base address every endpoint is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session whose credential is presented
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Defaults first, then the credential, then caller overrides
    fn merged_headers(&self, overrides: &HeaderMap) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ApiError::InvalidRequest("stored credential is not a valid header value".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in overrides {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }

    /// Perform a request and return the parsed JSON body as-is
    ///
    /// An empty 2xx body is returned as `null`. A 401 clears the session
    /// before the error is returned.
    pub async fn request_json(&self, endpoint: &str, options: RequestOptions) -> ApiResult<Value> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.merged_headers(&options.headers)?;

        let mut builder = self
            .client
            .request(options.method.clone(), &url)
            .headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(%request_id, method = %options.method, endpoint, error = %e, "Transport failure");
            ApiError::Transport(e)
        })?;

        let status = response.status();

        tracing::debug!(
            %request_id,
            method = %options.method,
            endpoint,
            status = status.as_u16(),
            "Request completed"
        );

        // The status line alone is enough to invalidate; the body may never arrive
        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(%request_id, endpoint, "Credential rejected, clearing session");
            self.session.clear();
        }

        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &bytes));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Perform a request and deserialize the body into `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let value = self.request_json(endpoint, options).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, AUTH_TOKEN_KEY};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(base_url: &str) -> (HttpClient, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::restore(storage.clone());
        let client = HttpClient::new(base_url, session, None).unwrap();
        (client, storage)
    }

    #[tokio::test]
    async fn test_injects_bearer_when_token_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer abc123"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _storage) = create_test_client(&server.uri());
        client.session().set_token("abc123").unwrap();

        let body = client.request_json("/auth/me", RequestOptions::get()).await.unwrap();
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeline/eras"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (client, _storage) = create_test_client(&server.uri());
        client.request_json("/timeline/eras", RequestOptions::get()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
        assert_eq!(
            requests[0].headers.get("content-type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_caller_headers_override_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("content-type", "text/plain"))
            .and(header("authorization", "Bearer override"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _storage) = create_test_client(&server.uri());
        client.session().set_token("abc123").unwrap();

        let options = RequestOptions::post()
            .header("Content-Type", "text/plain")
            .unwrap()
            .header("Authorization", "Bearer override")
            .unwrap();
        client.request_json("/echo", options).await.unwrap();
    }

    #[tokio::test]
    async fn test_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"username": "u", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _storage) = create_test_client(&server.uri());
        let options = RequestOptions::post()
            .json(&json!({"username": "u", "password": "pw"}))
            .unwrap();
        client.request_json("/auth/login", options).await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})),
            )
            .mount(&server)
            .await;

        let (client, storage) = create_test_client(&server.uri());
        client.session().set_token("stale").unwrap();

        let err = client
            .request_json("/auth/me", RequestOptions::get())
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.detail(), Some("Token expired"));
        assert!(client.session().token().is_none());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_failures_keep_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeline/eras"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                json!({"detail": "No eras found matching the criteria"}),
            ))
            .mount(&server)
            .await;

        let (client, storage) = create_test_client(&server.uri());
        client.session().set_token("abc123").unwrap();

        let err = client
            .request_json("/timeline/eras", RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.detail(), Some("No eras found matching the criteria"));
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let (client, _storage) = create_test_client(&server.uri());
        let err = client
            .request_json("/boom", RequestOptions::get())
            .await
            .unwrap_err();

        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, json!({"detail": "Request failed"}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let (client, _storage) = create_test_client(&server.uri());
        let body = client
            .request_json("/auth/logout", RequestOptions::post())
            .await
            .unwrap();
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_typed_request_reports_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        struct Status {
            #[allow(dead_code)]
            valid: bool,
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/verify-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let (client, _storage) = create_test_client(&server.uri());
        let err = client
            .request::<Status>("/auth/verify-token", RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_with_truncated_body_still_clears() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();

            // Announce 100 bytes, send 10, hang up
            socket
                .write_all(
                    b"HTTP/1.1 401 Unauthorized\r\n\
                      Content-Type: application/json\r\n\
                      Content-Length: 100\r\n\r\n\
                      {\"detail\":",
                )
                .await
                .unwrap();
            socket.flush().await.unwrap();
        });

        let (client, storage) = create_test_client(&format!("http://{}", addr));
        client.session().set_token("stale").unwrap();

        let err = client
            .request_json("/auth/me", RequestOptions::get())
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(err.is_transport());
        assert!(client.session().token().is_none());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_http_error() {
        // Nothing listens on port 1
        let (client, _storage) = create_test_client("http://127.0.0.1:1");
        let err = client
            .request_json("/auth/me", RequestOptions::get())
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let (client, _storage) = create_test_client("http://localhost:8001/");
        assert_eq!(client.base_url(), "http://localhost:8001");
    }

    #[test]
    fn test_rejects_invalid_header_override() {
        assert!(RequestOptions::get().header("bad header", "x").is_err());
        assert!(RequestOptions::get().header("X-Ok", "line\nbreak").is_err());
    }
}
