//! Common test utilities for cosmos-rpc-client integration tests
//!
//! A mock API server built on warp. It accepts any method on any path,
//! records what it received, and answers with whatever the test's handler
//! returns, so tests can check both sides of the exchange.

#![allow(dead_code)]

use cosmos_rpc_client::{Connection, ConnectionConfig};
use cosmos_rpc_core::{codec, Id, JsonRpcErrorData, JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use warp::http::{HeaderMap, Method, Response};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::Filter;

pub const TEST_PASSWORD: &str = "password";

/// One request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Raw query string, empty if none
    pub query: String,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body parsed as JSON, `Null` if it isn't
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    /// Body decoded as a JSON-RPC request, `None` for anything else
    pub fn rpc_request(&self) -> Option<JsonRpcRequest> {
        codec::decode_as(self.body.as_bytes()).ok()
    }

    /// `id` of a JSON-RPC request body, `Null` if there is none
    pub fn rpc_id(&self) -> Value {
        self.rpc_request()
            .and_then(|request| serde_json::to_value(request.id).ok())
            .unwrap_or(Value::Null)
    }

    /// Method name of a JSON-RPC request body
    pub fn rpc_method(&self) -> Option<String> {
        self.rpc_request().map(|request| request.method)
    }
}

/// Mock HTTP API server for client testing
pub struct MockApiServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockApiServer {
    /// Answer every JSON-RPC request with `result`, echoing the request id
    pub async fn with_result(result: Value) -> Self {
        Self::with_handler(move |req| (200, mock_response(req.rpc_id(), result.clone()))).await
    }

    /// Start a mock server with a custom handler
    ///
    /// The handler gets the recorded request and returns the status code and
    /// body to send back. Bodies are served as `application/json`.
    pub async fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        init_tracing();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let recorded = requests.clone();
        let route = warp::method()
            .and(warp::path::full())
            .and(
                warp::query::raw()
                    .or(warp::any().map(String::new))
                    .unify(),
            )
            .and(warp::header::headers_cloned())
            .and(warp::body::bytes())
            .map(
                move |method: Method, path: FullPath, query: String, headers: HeaderMap, body: Bytes| {
                    let request = RecordedRequest {
                        method: method.to_string(),
                        path: path.as_str().to_string(),
                        query,
                        headers: headers
                            .iter()
                            .map(|(name, value)| {
                                (
                                    name.as_str().to_string(),
                                    value.to_str().unwrap_or_default().to_string(),
                                )
                            })
                            .collect(),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    };
                    recorded.lock().unwrap().push(request.clone());

                    let (status, body) = handler(&request);
                    Response::builder()
                        .status(status)
                        .header("content-type", "application/json")
                        .body(body)
                        .unwrap()
                },
            );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (addr, server) =
            warp::serve(route).bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async move {
                shutdown_rx.await.ok();
            });
        tokio::spawn(server);

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Configuration pointing at this server, with the test password
    pub fn config(&self) -> ConnectionConfig {
        ConnectionConfig::default()
            .with_hostname("127.0.0.1")
            .with_port(self.port())
            .with_password(TEST_PASSWORD)
            .with_timeout(Duration::from_secs(5))
    }

    pub fn connect(&self) -> Connection {
        Connection::new(self.config()).unwrap()
    }

    /// Everything received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Stop the mock server
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Helper to create a mock JSON-RPC response
pub fn mock_response(id: Value, result: Value) -> String {
    let response = JsonRpcResponse::success(result, to_id(id));
    codec::encode(&response).unwrap()
}

/// Helper to create a mock JSON-RPC error response
pub fn mock_error_response(id: Value, code: i32, message: &str) -> String {
    let response = JsonRpcResponse::error(JsonRpcErrorData::new(code, message), to_id(id));
    codec::encode(&response).unwrap()
}

fn to_id(id: Value) -> Id {
    serde_json::from_value(id).unwrap_or_default()
}

/// Route client logs to the test output, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Port that nothing listens on
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_response_format() {
        let response: JsonRpcResponse =
            codec::decode_as(mock_response(json!(1), json!({"value": 42})).as_bytes()).unwrap();
        assert!(response.is_success());
        assert_eq!(response.id, Id::Number(1));
        assert_eq!(response.result, Some(json!({"value": 42})));
    }

    #[test]
    fn test_mock_null_result_kept() {
        let body = mock_response(json!(3), Value::Null);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"jsonrpc": "2.0", "result": null, "id": 3})
        );
    }

    #[test]
    fn test_mock_error_response_format() {
        let response: JsonRpcResponse =
            codec::decode_as(mock_error_response(json!(1), -32601, "Method not found").as_bytes())
                .unwrap();
        assert!(response.is_error());
        assert!(!response.is_success());
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found");
    }

    #[test]
    fn test_recorded_request_decoding() {
        let request = RecordedRequest {
            method: "POST".to_string(),
            path: "/openc3-api/api".to_string(),
            query: String::new(),
            headers: HashMap::new(),
            body: r#"{"jsonrpc":"2.0","method":"tlm","params":[],"id":4}"#.to_string(),
        };
        assert_eq!(request.rpc_id(), json!(4));
        assert_eq!(request.rpc_method().as_deref(), Some("tlm"));

        let rest = RecordedRequest {
            body: "{}".to_string(),
            ..request
        };
        assert!(rest.rpc_request().is_none());
        assert_eq!(rest.rpc_id(), Value::Null);
    }
}
