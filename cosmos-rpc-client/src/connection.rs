//! HTTP JSON-RPC connection to the API server
//!
//! A [`Connection`] owns one logical session: the configuration, a credential,
//! the HTTP client and the request ID counter.
//!
//! # Dispatch
//!
//! [`Connection::invoke`] holds the dispatch lock for the whole exchange:
//! allocate the next ID, encode, POST, read and decode. Calls on one
//! connection are therefore strictly serialized, and the IDs a server sees are
//! 1, 2, 3, ... in call order. Separate connections share nothing.
//!
//! # Shutdown
//!
//! [`Connection::shutdown`] flips a one-way flag and drops the HTTP client.
//! Calls that start afterwards fail with `Error::ConnectionClosed` without
//! touching the network. A call already past the check finishes normally;
//! shutdown is a stop signal, not a cancellation.
//!
//! # Cloning
//!
//! `Connection` is cheaply cloneable; all clones share the same session.
//! When the last clone is dropped the transport is released.

use crate::auth::Authorization;
use crate::metrics::ClientMetrics;
use crate::transport::{
    self, map_transport_error, RequestOptions, Verb, JSON_RPC_CONTENT_TYPE, RPC_PATH,
};
use crate::{ConnectionBuilder, ConnectionConfig};
use cosmos_rpc_core::{codec, Error, Id, Params, Result, RpcReply};
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Connection to a COSMOS-style JSON-RPC API
#[derive(Clone, Debug)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

#[derive(Debug)]
struct ConnectionInner {
    config: ConnectionConfig,
    base_url: String,
    auth: Arc<dyn Authorization>,
    /// Last request ID handed out; the guard doubles as the dispatch lock
    dispatch: tokio::sync::Mutex<u64>,
    /// `None` once released
    http: Mutex<Option<reqwest::Client>>,
    shutdown: AtomicBool,
    metrics: Option<Arc<ClientMetrics>>,
}

impl ConnectionInner {
    /// Drop the HTTP client, returning whether it was still held
    fn release_transport(&self) -> bool {
        self.http
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}

impl Drop for ConnectionInner {
    fn drop(&mut self) {
        if self.release_transport() {
            tracing::debug!(url = %self.base_url, "connection dropped without shutdown");
        }
    }
}

impl Connection {
    /// Connect with the credential resolved from `config`
    ///
    /// Shorthand for `ConnectionBuilder::new(config).build()`. No request is
    /// made until the first call.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        ConnectionBuilder::new(config).build()
    }

    pub(crate) fn from_parts(
        config: ConnectionConfig,
        auth: Arc<dyn Authorization>,
        metrics: Option<Arc<ClientMetrics>>,
    ) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url();
        tracing::debug!(url = %base_url, timeout_secs = config.timeout.as_secs_f64(), "connection created");

        Ok(Self {
            inner: Arc::new(ConnectionInner {
                config,
                base_url,
                auth,
                dispatch: tokio::sync::Mutex::new(0),
                http: Mutex::new(Some(http)),
                shutdown: AtomicBool::new(false),
                metrics,
            }),
        })
    }

    /// Run `f` with a fresh connection and shut it down afterwards
    ///
    /// The connection is shut down whether `f` succeeds or fails; if `f`
    /// panics, dropping the last clone still releases the transport.
    pub async fn scoped<F, Fut, T>(config: ConnectionConfig, f: F) -> Result<T>
    where
        F: FnOnce(Connection) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let connection = Connection::new(config)?;
        let outcome = f(connection.clone()).await;
        connection.shutdown();
        outcome
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.inner.config
    }

    /// `{scheme}://{host}:{port}`
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.shutdown.load(Ordering::SeqCst)
    }

    /// ID of the most recent call, 0 if none was made
    ///
    /// Waits for any call in progress to finish.
    pub async fn last_request_id(&self) -> u64 {
        *self.inner.dispatch.lock().await
    }

    /// Permanently stop this connection
    ///
    /// Idempotent: the transport is released by the first call only.
    pub fn shutdown(&self) {
        if self.inner.shutdown.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.release_transport();
        tracing::info!(url = %self.inner.base_url, "connection shut down");
    }

    /// Invoke a remote method and return its raw result
    ///
    /// # Errors
    ///
    /// - `ConnectionClosed` after [`shutdown`](Self::shutdown)
    /// - `Connection` if the HTTP exchange failed
    /// - `RemoteProtocol` if the server answered with an error envelope
    /// - `MalformedResponse` if the body was not JSON
    /// - `UnexpectedResponse` for a body without `result`, in strict mode only;
    ///   otherwise such a body is returned as-is
    #[tracing::instrument(skip_all, fields(method = %method, id = tracing::field::Empty))]
    pub async fn invoke(&self, method: &str, params: Params) -> Result<Value> {
        if self.is_shutdown() {
            tracing::debug!("call rejected, connection is shut down");
            return Err(Error::ConnectionClosed);
        }

        let start = Instant::now();
        let outcome = self.dispatch(method, params).await;
        let duration = start.elapsed().as_secs_f64();

        if let Some(ref m) = self.inner.metrics {
            match &outcome {
                Ok(_) => m.record_request(method, "success", duration),
                Err(e) => {
                    m.record_request(method, "error", duration);
                    m.record_error(e.kind_label());
                }
            }
        }

        match &outcome {
            Ok(_) => tracing::debug!(duration_secs = duration, "call completed"),
            Err(Error::RemoteProtocol(e)) => {
                tracing::error!(code = e.code, message = %e.message, "server returned error")
            }
            Err(e) => tracing::warn!(error = %e, "call failed"),
        }

        outcome
    }

    /// Invoke a remote method and deserialize its result into `R`
    pub async fn request<R>(&self, method: &str, params: Params) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let value = self.invoke(method, params).await?;
        serde_json::from_value(value).map_err(|e| Error::Serialization(e.to_string()))
    }

    async fn dispatch(&self, method: &str, params: Params) -> Result<Value> {
        let mut last_id = self.inner.dispatch.lock().await;
        *last_id += 1;
        let id = *last_id;
        tracing::Span::current().record("id", id);

        let request = codec::build_request(id, method, params);
        let body = codec::encode_request(&request)?;
        let reply = self.post_rpc(body).await?;

        if let Some(echoed) = reply.id().and_then(Id::as_u64) {
            if echoed != id {
                tracing::warn!(expected = id, echoed, "response id does not match request");
            }
        }

        if let RpcReply::Unrecognized(ref value) = reply {
            tracing::warn!(body = %value, "response has no result, passing body through");
            if let Some(ref m) = self.inner.metrics {
                m.record_lenient(method);
            }
        }

        codec::into_result(reply, self.inner.config.strict_responses)
    }

    /// POST one encoded request and decode whatever comes back
    ///
    /// The status code is not checked: the server reports failures as error
    /// envelopes with 4xx/5xx statuses, and those must reach the decoder.
    async fn post_rpc(&self, body: String) -> Result<RpcReply> {
        let client = self.transport()?;
        let url = format!("{}{}", self.inner.base_url, RPC_PATH);
        tracing::debug!(url = %url, body = %body, "sending request");

        let request = client
            .post(&url)
            .header(CONTENT_TYPE, JSON_RPC_CONTENT_TYPE)
            .body(body);
        let sent = Instant::now();
        let response = self
            .inner
            .auth
            .authorize(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        tracing::debug!(
            status = status.as_u16(),
            elapsed_secs = sent.elapsed().as_secs_f64(),
            body = %String::from_utf8_lossy(&bytes),
            "response received"
        );

        codec::parse_response(&bytes)
    }

    /// GET `{base_url}{endpoint}`
    pub async fn get(&self, endpoint: &str, options: RequestOptions) -> Result<Response> {
        self.rest(Verb::Get, endpoint, options).await
    }

    /// POST `{base_url}{endpoint}`
    pub async fn post(&self, endpoint: &str, options: RequestOptions) -> Result<Response> {
        self.rest(Verb::Post, endpoint, options).await
    }

    /// PUT `{base_url}{endpoint}`
    pub async fn put(&self, endpoint: &str, options: RequestOptions) -> Result<Response> {
        self.rest(Verb::Put, endpoint, options).await
    }

    /// DELETE `{base_url}{endpoint}`
    pub async fn delete(&self, endpoint: &str, options: RequestOptions) -> Result<Response> {
        self.rest(Verb::Delete, endpoint, options).await
    }

    /// Plain REST call outside the JSON-RPC envelope
    ///
    /// Injects the credential and the configured scope (unless `options`
    /// already has one), and fails with `Error::HttpStatus` on any non-2xx
    /// status. Does not take the dispatch lock or consume a request ID.
    #[tracing::instrument(skip_all, fields(verb = verb.as_str(), endpoint = %endpoint))]
    pub async fn rest(&self, verb: Verb, endpoint: &str, options: RequestOptions) -> Result<Response> {
        if self.is_shutdown() {
            return Err(Error::ConnectionClosed);
        }
        let client = self.transport()?;
        let url = format!("{}{}", self.inner.base_url, endpoint);
        let options = options.with_default_scope(&self.inner.config.scope);
        tracing::debug!(url = %url, query = ?options.query, "sending REST request");

        let request = options.apply(client.request(verb.method(), &url));
        let sent = Instant::now();
        let result = self.inner.auth.authorize(request).send().await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let error = map_transport_error(e);
                if let Some(ref m) = self.inner.metrics {
                    m.record_error(error.kind_label());
                }
                return Err(error);
            }
        };

        tracing::debug!(
            status = response.status().as_u16(),
            elapsed_secs = sent.elapsed().as_secs_f64(),
            "REST response received"
        );
        if let Some(ref m) = self.inner.metrics {
            m.record_rest(verb.as_str(), response.status().as_u16());
        }

        transport::ensure_success(response).await.inspect_err(|e| {
            if let Some(ref m) = self.inner.metrics {
                m.record_error(e.kind_label());
            }
        })
    }

    /// Clone of the HTTP client, or `ConnectionClosed` once released
    fn transport(&self) -> Result<reqwest::Client> {
        self.inner
            .http
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::ConnectionClosed)
    }
}
