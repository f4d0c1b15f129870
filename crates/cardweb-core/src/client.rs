//! Bank cards API client
//!
//! [`ApiClient`] knows the endpoints and the error contract. The wire itself
//! sits behind the [`Transport`] trait; [`ReqwestTransport`] is the real one.

use crate::error::{ClientError, ClientResult, DEFAULT_ERROR_MESSAGE};
use crate::models::{ExportFormat, Page, Record};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use serde::de::DeserializeOwned;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// Ambient credentials of the browser session, forwarded as-is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookie: Option<String>,
}

impl Session {
    /// Session from the browser's `Cookie` header
    pub fn from_cookie_header(cookie: Option<&str>) -> Self {
        Self {
            cookie: cookie.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Stable key for per-session bookkeeping that does not keep the cookie itself
    pub fn key(&self) -> String {
        match &self.cookie {
            Some(cookie) => {
                let mut hasher = DefaultHasher::new();
                cookie.hash(&mut hasher);
                format!("{:016x}", hasher.finish())
            }
            None => "anonymous".to_string(),
        }
    }

    /// Key of one interactive control within this session
    pub fn control_key(&self, control: &str) -> String {
        format!("{}::{}", self.key(), control)
    }
}

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// One call to the API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub cookie: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            cookie: None,
        }
    }

    pub fn with_query(mut self, query: &[(String, String)]) -> Self {
        self.query.extend(query.iter().cloned());
        self
    }

    pub fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    pub fn with_session(mut self, session: &Session) -> Self {
        self.cookie = session.cookie().map(str::to_string);
        self
    }

    /// Value of a query parameter, if present
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Raw answer from the API, any status
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// JSON response helper
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            content_type: Some("application/json".to_string()),
            ..Self::new(status, value.to_string())
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body. A body that does not decode counts as a transport failure.
    pub fn decode<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::transport(format!("invalid response body: {}", e)))
    }
}

/// Sends requests to the API.
///
/// Implementations only fail for transport problems; non-success statuses are
/// returned as responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

/// HTTP transport over reqwest
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport for `base_url`. Without `timeout` the client default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::transport)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        log::debug!("{} {} {:?}", request.method, url, request.query);

        let mut builder = self.http.request(request.method.as_reqwest(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(cookie) = &request.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ClientError::transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(ClientError::transport)?;

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

/// A downloaded statement
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub content_type: String,
    pub body: Bytes,
}

/// Typed access to the bank cards API
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a request and turn non-success statuses into
    /// [`ClientError::RequestFailed`] with the server's message or `fallback`.
    pub async fn execute(&self, request: ApiRequest, fallback: &str) -> ClientResult<ApiResponse> {
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ClientError::from_response(response.status, &response.body, fallback))
        }
    }

    /// GET one page of a paginated listing
    pub async fn fetch_page(
        &self,
        session: &Session,
        endpoint: &str,
        filters: &[(String, String)],
        page: u32,
        size: u32,
    ) -> ClientResult<Page<Record>> {
        let request = ApiRequest::new(Method::Get, endpoint)
            .with_query(filters)
            .with_param("page", page)
            .with_param("size", size)
            .with_session(session);
        self.execute(request, DEFAULT_ERROR_MESSAGE).await?.decode()
    }

    /// Every record of a paginated listing, approximated by one large first page
    pub async fn fetch_all(&self, session: &Session, endpoint: &str, size: u32) -> ClientResult<Vec<Record>> {
        Ok(self.fetch_page(session, endpoint, &[], 0, size).await?.items)
    }

    /// All users. The API answers a bare POST with the full list.
    pub async fn fetch_users(&self, session: &Session) -> ClientResult<Vec<Record>> {
        let request = ApiRequest::new(Method::Post, "/api/admin/users").with_session(session);
        self.execute(request, DEFAULT_ERROR_MESSAGE).await?.decode()
    }

    /// Download a statement page in the given format
    pub async fn export_statement(
        &self,
        session: &Session,
        format: ExportFormat,
        page: u32,
        size: u32,
    ) -> ClientResult<Download> {
        let request = ApiRequest::new(Method::Get, format.endpoint())
            .with_param("page", page)
            .with_param("size", size)
            .with_session(session);
        let response = self.execute(request, DEFAULT_ERROR_MESSAGE).await?;
        Ok(Download {
            content_type: response
                .content_type
                .unwrap_or_else(|| format.content_type().to_string()),
            body: response.body,
        })
    }
}
