//! JSON-RPC invocation integration tests
//!
//! Wire format, result decoding and the error taxonomy, against a mock
//! API server.

mod common;

use common::{mock_error_response, mock_response, MockApiServer, TEST_PASSWORD};
use cosmos_rpc_client::{ConnectionBuilder, TokenAuth};
use cosmos_rpc_core::{Error, ErrorCode, Params, TransportKind};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_invoke_returns_result() {
    let server = MockApiServer::with_result(json!({"v": 5})).await;
    let connection = server.connect();

    let result = connection
        .invoke("tlm", Params::new().arg("INST HEALTH_STATUS TEMP1"))
        .await
        .unwrap();
    assert_eq!(result, json!({"v": 5}));

    connection.shutdown();
    server.shutdown().await;
}

#[tokio::test]
async fn test_request_wire_format() {
    let server = MockApiServer::with_result(json!(null)).await;
    let connection = server.connect();

    connection
        .invoke("get_tlm_packet", Params::new().arg("INST").arg("ADCS").kwarg("type", "RAW"))
        .await
        .unwrap();
    connection
        .invoke("get_target_list", Params::new())
        .await
        .unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_eq!(first.method, "POST");
    assert_eq!(first.path, "/openc3-api/api");
    assert_eq!(first.header("content-type"), Some("application/json-rpc"));
    assert_eq!(first.header("authorization"), Some(TEST_PASSWORD));
    assert!(first.header("user-agent").unwrap().starts_with("cosmos-rpc/"));
    assert_eq!(
        first.json(),
        json!({
            "jsonrpc": "2.0",
            "method": "get_tlm_packet",
            "params": ["INST", "ADCS"],
            "keyword_params": {"type": "RAW"},
            "id": 1
        })
    );

    // No keyword arguments, no keyword_params member
    assert_eq!(
        requests[1].json(),
        json!({"jsonrpc": "2.0", "method": "get_target_list", "params": [], "id": 2})
    );
    // RPC calls carry no scope in the query
    assert!(requests[1].query.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_ids_are_sequential() {
    let server = MockApiServer::with_result(json!(true)).await;
    let connection = server.connect();

    for _ in 0..5 {
        connection.invoke("get_stale", Params::new()).await.unwrap();
    }

    let ids: Vec<_> = server.requests().iter().map(|r| r.rpc_id()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
    assert_eq!(connection.last_request_id().await, 5);

    server.shutdown().await;
}

#[tokio::test]
async fn test_custom_user_agent_and_token() {
    let server = MockApiServer::with_result(json!(1)).await;
    let config = server.config().with_user_agent("ground-script/2.0");
    let connection = ConnectionBuilder::new(config)
        .with_auth(Arc::new(TokenAuth::new("minted")))
        .build()
        .unwrap();

    connection.invoke("get_target_list", Params::new()).await.unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.header("user-agent"), Some("ground-script/2.0"));
    assert_eq!(request.header("authorization"), Some("Bearer minted"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_remote_error_is_typed() {
    let server = MockApiServer::with_handler(|req| {
        (500, mock_error_response(req.rpc_id(), -1, "bad method"))
    })
    .await;
    let connection = server.connect();

    let err = connection
        .invoke("no_such_method", Params::new())
        .await
        .unwrap_err();
    match err {
        Error::RemoteProtocol(data) => {
            assert_eq!(data.code, -1);
            assert_eq!(data.message, "bad method");
            assert_eq!(data.kind(), ErrorCode::Other);
        }
        other => panic!("expected RemoteProtocol, got {:?}", other),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_remote_error_class() {
    let server = MockApiServer::with_handler(|req| {
        let body = json!({
            "jsonrpc": "2.0",
            "error": {
                "code": -32100,
                "message": "INST CLEAR is Hazardous",
                "data": {"class": "HazardousError", "message": "INST CLEAR is Hazardous"}
            },
            "id": req.rpc_id()
        });
        (200, body.to_string())
    })
    .await;
    let connection = server.connect();

    let err = connection
        .invoke("cmd", Params::new().arg("INST CLEAR"))
        .await
        .unwrap_err();
    let Error::RemoteProtocol(data) = err else {
        panic!("expected RemoteProtocol");
    };
    assert_eq!(data.kind(), ErrorCode::Hazardous);
    assert_eq!(data.remote_class(), Some("HazardousError"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockApiServer::with_handler(|_| (502, "<html>Bad Gateway</html>".to_string())).await;
    let connection = server.connect();

    let err = connection.invoke("tlm", Params::new()).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
    assert!(!err.is_retryable());

    server.shutdown().await;
}

#[tokio::test]
async fn test_body_without_result_passes_through() {
    let server = MockApiServer::with_handler(|req| {
        (200, json!({"jsonrpc": "2.0", "id": req.rpc_id(), "note": "legacy"}).to_string())
    })
    .await;
    let connection = server.connect();

    let value = connection.invoke("legacy", Params::new()).await.unwrap();
    assert_eq!(value["note"], "legacy");
    assert_eq!(value["id"], 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_body_without_result_rejected_in_strict_mode() {
    let server = MockApiServer::with_handler(|req| {
        (200, json!({"jsonrpc": "2.0", "id": req.rpc_id()}).to_string())
    })
    .await;
    let connection = cosmos_rpc_client::Connection::new(server.config().with_strict_responses(true))
        .unwrap();

    let err = connection.invoke("legacy", Params::new()).await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse(_)));

    server.shutdown().await;
}

#[tokio::test]
async fn test_null_result_is_success() {
    let server = MockApiServer::with_handler(|req| (200, mock_response(req.rpc_id(), json!(null)))).await;
    let connection = server.connect();

    let value = connection
        .invoke("set_tlm", Params::new().arg("INST HEALTH_STATUS TEMP1 = 5"))
        .await
        .unwrap();
    assert!(value.is_null());

    server.shutdown().await;
}

#[derive(Debug, Deserialize, PartialEq)]
struct TargetInfo {
    name: String,
    packets: Vec<String>,
}

#[tokio::test]
async fn test_typed_request() {
    let server = MockApiServer::with_result(json!({"name": "INST", "packets": ["ADCS", "HEALTH_STATUS"]})).await;
    let connection = server.connect();

    let target: TargetInfo = connection
        .request("get_target", Params::new().arg("INST"))
        .await
        .unwrap();
    assert_eq!(target.name, "INST");
    assert_eq!(target.packets.len(), 2);

    let mismatch = connection
        .request::<Vec<u32>>("get_target", Params::new().arg("INST"))
        .await;
    assert!(matches!(mismatch, Err(Error::Serialization(_))));

    server.shutdown().await;
}

#[tokio::test]
async fn test_connection_refused() {
    let config = cosmos_rpc_client::ConnectionConfig::default()
        .with_port(common::unused_port())
        .with_password(TEST_PASSWORD);
    let connection = cosmos_rpc_client::Connection::new(config).unwrap();

    let err = connection.invoke("tlm", Params::new()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Connection {
            kind: TransportKind::Connect,
            ..
        }
    ));
    assert!(err.is_retryable());

    // A failed call still used up its id
    assert_eq!(connection.last_request_id().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timeout() {
    let server = MockApiServer::with_handler(|req| {
        std::thread::sleep(Duration::from_millis(500));
        (200, mock_response(req.rpc_id(), json!(1)))
    })
    .await;
    let connection =
        cosmos_rpc_client::Connection::new(server.config().with_timeout(Duration::from_millis(100)))
            .unwrap();

    let err = connection.invoke("tlm", Params::new()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Connection {
            kind: TransportKind::Timeout,
            ..
        }
    ));

    server.shutdown().await;
}

#[tokio::test]
async fn test_mismatched_response_id_still_returns_result() {
    let server = MockApiServer::with_handler(|_| (200, mock_response(json!(99), json!("INST")))).await;
    let connection = server.connect();

    let value = connection.invoke("get_target", Params::new()).await.unwrap();
    assert_eq!(value, json!("INST"));
    assert_eq!(connection.last_request_id().await, 1);

    server.shutdown().await;
}
