//! Core JSON-RPC types and codec for cosmos-rpc
//!
//! This crate holds everything about the conversation with a COSMOS-style
//! command and telemetry API server that does not depend on the transport:
//!
//! - **Types**: request/response envelopes, request IDs, call parameters
//! - **Codec**: request encoding and lenient response classification
//! - **Error handling**: the error taxonomy every call surfaces
//! - **Observability**: tracing subscriber and OpenTelemetry setup
//!
//! The HTTP connection that uses these lives in `cosmos-rpc-client`.
//!
//! # Example
//!
//! ```rust
//! use cosmos_rpc_core::{codec, Params, RpcReply};
//!
//! let request = codec::build_request(1, "tlm", Params::new().arg("INST HEALTH_STATUS TEMP1"));
//! let body = codec::encode_request(&request).unwrap();
//! assert!(body.starts_with(r#"{"jsonrpc":"2.0","method":"tlm""#));
//!
//! let reply = codec::parse_response(br#"{"id":1,"error":{"code":-1,"message":"bad method"}}"#).unwrap();
//! assert!(matches!(reply, RpcReply::Failure { .. }));
//! ```

pub mod codec;
pub mod error;
pub mod observability;
pub mod types;

pub use error::{Error, ErrorCode, JsonRpcErrorData, Result, TransportKind};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{Id, JsonRpcRequest, JsonRpcResponse, Params, RpcReply, JSONRPC_VERSION};
