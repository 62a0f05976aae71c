//! Main management-plane API client implementation.

use crate::api::*;
use crate::config::{Credentials, DEFAULT_NODE_SCHEME, DEFAULT_TIMEOUT};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use trustctl_core::{HttpMethod, RawResponse, Result, TrustError};
use url::Url;

/// Client for the manager's REST API
#[derive(Clone, Debug)]
pub struct TrustClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: HttpClient,
    credentials: Credentials,
    base_url: String,
    node_scheme: String,
    timeout: Duration,
}

impl TrustClient {
    /// Create a client for `base_url` using default settings
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        TrustClientBuilder::new(base_url, credentials).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(base_url: impl Into<String>, credentials: Credentials) -> TrustClientBuilder {
        TrustClientBuilder::new(base_url, credentials)
    }

    /// Access trust-store endpoints
    #[must_use]
    pub fn certificates(&self) -> TrustManagementApi<'_> {
        TrustManagementApi::new(self)
    }

    /// Access cluster endpoints (VIP certificate, node topology)
    #[must_use]
    pub fn cluster(&self) -> ClusterApi<'_> {
        ClusterApi::new(self)
    }

    /// Access per-node service endpoints
    #[must_use]
    pub fn node_services(&self) -> NodeServiceApi<'_> {
        NodeServiceApi::new(self)
    }

    /// Access global configuration endpoints
    #[must_use]
    pub fn global_configs(&self) -> GlobalConfigApi<'_> {
        GlobalConfigApi::new(self)
    }

    /// The manager's base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Base URL of a node's own API endpoint
    #[must_use]
    pub fn node_base_url(&self, address: &str) -> String {
        format!("{}://{}", self.inner.node_scheme, address)
    }

    /// Send an arbitrary request to the manager and return whatever came back
    pub async fn raw(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        self.send(method, &self.inner.base_url, path, &[], body).await
    }

    /// Perform a GET request and decode the JSON body
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    /// Perform a GET request with query parameters and decode the JSON body
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let raw = self
            .send(HttpMethod::Get, &self.inner.base_url, path, params, None)
            .await?;
        decode(raw)
    }

    /// GET one item of `collection` by id and return the body undecoded.
    ///
    /// `id` is sent as a single percent-encoded path segment.
    pub(crate) async fn get_item_raw(
        &self,
        collection: &str,
        id: &str,
        params: &[(&str, &str)],
    ) -> Result<RawResponse> {
        let url = item_url(&self.inner.base_url, collection, id, params)?;
        self.send_url(HttpMethod::Get, url, None).await
    }

    /// POST an action with an empty JSON object body
    pub(crate) async fn post_action(
        &self,
        base_url: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<RawResponse> {
        let empty = Value::Object(serde_json::Map::new());
        self.send(HttpMethod::Post, base_url, path, params, Some(&empty))
            .await
    }

    /// PUT a JSON body and decode the response
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let raw = self
            .send(HttpMethod::Put, &self.inner.base_url, path, &[], Some(&body))
            .await?;
        decode(raw)
    }

    async fn send(
        &self,
        method: HttpMethod,
        base_url: &str,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let url = build_url(base_url, path, params)?;
        self.send_url(method, url, body).await
    }

    async fn send_url(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        debug!(method = %method, url = %url, "request");

        let request = match method {
            HttpMethod::Get => self.inner.http.get(url),
            HttpMethod::Post => self.inner.http.post(url),
            HttpMethod::Put => self.inner.http.put(url),
            HttpMethod::Delete => self.inner.http.delete(url),
        };
        let request = request.basic_auth(
            &self.inner.credentials.username,
            Some(self.inner.credentials.password()),
        );
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        self.handle_response(response).await
    }

    /// Turn a response into a body, or a typed error for status >= 400
    async fn handle_response(&self, response: reqwest::Response) -> Result<RawResponse> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(&e))?;

        if status.is_success() {
            Ok(RawResponse::from_body(body))
        } else {
            Err(status_error(status.as_u16(), body))
        }
    }

    fn transport_error(&self, err: &reqwest::Error) -> TrustError {
        if err.is_timeout() {
            TrustError::Timeout(self.inner.timeout.as_secs())
        } else {
            TrustError::Transport(err.to_string())
        }
    }
}

/// Join `base_url` and `path` and append query parameters
fn build_url(base_url: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).map_err(|e| TrustError::InvalidUrl(format!("{joined}: {e}")))?;

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url)
}

/// URL of `collection/id` with `id` encoded as one path segment
fn item_url(base_url: &str, collection: &str, id: &str, params: &[(&str, &str)]) -> Result<Url> {
    let mut url = build_url(base_url, collection, params)?;
    url.path_segments_mut()
        .map_err(|()| TrustError::InvalidUrl(format!("{base_url}: cannot hold a path")))?
        .pop_if_empty()
        .push(id);
    Ok(url)
}

/// Convert an error response into a `TrustError`
fn status_error(status: u16, body: String) -> TrustError {
    // Try to parse the manager's error_message from JSON
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error_message")
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or(body);

    warn!(status, message = %message, "API error");

    match status {
        401 | 403 => TrustError::Unauthorized(message),
        409 | 412 => TrustError::StaleRevision {
            code: status,
            message,
        },
        code => TrustError::Api { code, message },
    }
}

/// Decode a JSON body into `T`
fn decode<T: DeserializeOwned>(raw: RawResponse) -> Result<T> {
    match raw {
        RawResponse::Json(value) => {
            serde_json::from_value(value).map_err(|e| TrustError::MalformedResponse(e.to_string()))
        }
        RawResponse::Text(text) => Err(TrustError::MalformedResponse(format!(
            "expected JSON, got: {}",
            text.chars().take(200).collect::<String>()
        ))),
        RawResponse::Empty => Err(TrustError::MalformedResponse(
            "expected JSON, got an empty body".to_string(),
        )),
    }
}

/// Builder for configuring a [`TrustClient`]
pub struct TrustClientBuilder {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
    user_agent: String,
    accept_invalid_certs: bool,
    node_scheme: String,
}

impl TrustClientBuilder {
    /// Create a new builder for the manager at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("trustctl/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
            node_scheme: DEFAULT_NODE_SCHEME.to_string(),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Skip TLS peer verification.
    ///
    /// Only for managers on a trusted private network that present
    /// self-signed certificates. Off by default.
    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set the scheme used for per-node calls (useful for testing)
    #[must_use]
    pub fn node_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.node_scheme = scheme.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TrustClient> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| TrustError::InvalidUrl(format!("{base_url}: {e}")))?;

        if self.accept_invalid_certs {
            warn!(base_url = %base_url, "TLS certificate verification is disabled");
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .gzip(true)
            .build()
            .map_err(|e| TrustError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(TrustClient {
            inner: Arc::new(ClientInner {
                http,
                credentials: self.credentials,
                base_url,
                node_scheme: self.node_scheme,
                timeout: self.timeout,
            }),
        })
    }
}
