//! HTTP plumbing shared by the RPC path and the REST pass-throughs
//!
//! Every `reqwest` call site funnels its failures through
//! [`map_transport_error`], so the rest of the crate only ever sees
//! `cosmos_rpc_core::Error`.

use cosmos_rpc_core::{Error, Result, TransportKind};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

/// Path of the JSON-RPC endpoint, relative to the base URL
pub const RPC_PATH: &str = "/openc3-api/api";

/// Content type the API server dispatches JSON-RPC on
pub const JSON_RPC_CONTENT_TYPE: &str = "application/json-rpc";

/// Query parameter carrying the scope on REST calls
pub const SCOPE_PARAM: &str = "scope";

/// Map a `reqwest` failure onto the transport variant of [`Error`]
pub fn map_transport_error(error: reqwest::Error) -> Error {
    let kind = if error.is_timeout() {
        TransportKind::Timeout
    } else if error.is_connect() {
        TransportKind::Connect
    } else {
        TransportKind::Request
    };
    Error::Connection {
        kind,
        message: error.to_string(),
    }
}

/// Fail with `Error::HttpStatus` unless the response is 2xx
///
/// The body is read for the error message; a body that cannot be read is
/// reported as empty rather than masking the status.
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(Error::HttpStatus {
        status: status.as_u16(),
        url,
        body,
    })
}

/// HTTP verbs available on the REST pass-through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

/// Options for a REST pass-through call
///
/// ```rust
/// use cosmos_rpc_client::RequestOptions;
/// use serde_json::json;
///
/// let options = RequestOptions::new()
///     .query("target", "INST")
///     .json(json!({"name": "collect"}))
///     .header("X-Request-Source", "script");
/// assert!(!options.has_query("scope"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query string pairs, in order
    pub query: Vec<(String, String)>,
    /// JSON body, sent with `Content-Type: application/json`
    pub json: Option<Value>,
    /// Raw text body, used when `json` is not set
    pub body: Option<String>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn has_query(&self, name: &str) -> bool {
        self.query.iter().any(|(key, _)| key == name)
    }

    /// Add `scope` to the query unless the caller already set one
    pub fn with_default_scope(mut self, scope: &str) -> Self {
        if !self.has_query(SCOPE_PARAM) {
            self.query.push((SCOPE_PARAM.to_string(), scope.to_string()));
        }
        self
    }

    /// Apply query, headers and body to a request
    pub fn apply(self, mut request: RequestBuilder) -> RequestBuilder {
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        match (self.json, self.body) {
            (Some(json), _) => request.json(&json),
            (None, Some(body)) => request.body(body),
            (None, None) => request,
        }
    }
}
