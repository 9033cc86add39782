//! Request encoding and response decoding
//!
//! The connection never touches serde directly; it goes through these
//! functions so the wire envelope and the decoding rules live in one place.
//!
//! # Decoding Rules
//!
//! [`parse_response`] turns raw body bytes into an [`RpcReply`]:
//! - not JSON at all → `Error::MalformedResponse`
//! - object with a `result` member (even `null`) → `RpcReply::Success`
//! - object with a non-null `error` member → `RpcReply::Failure`
//! - `error` member that is not a valid error object → `Error::MalformedResponse`
//! - any other JSON → `RpcReply::Unrecognized`
//!
//! # Examples
//!
//! ```rust
//! use cosmos_rpc_core::{codec, Params, RpcReply};
//! use serde_json::json;
//!
//! let request = codec::build_request(1, "get_target_list", Params::new());
//! let body = codec::encode_request(&request).unwrap();
//! assert!(body.contains("\"method\":\"get_target_list\""));
//!
//! let reply = codec::parse_response(br#"{"jsonrpc":"2.0","id":1,"result":["INST"]}"#).unwrap();
//! assert!(matches!(reply, RpcReply::Success { ref result, .. } if result == &json!(["INST"])));
//! ```

use crate::error::{Error, JsonRpcErrorData, Result};
use crate::types::{Id, JsonRpcRequest, Params, RpcReply};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Build the request envelope for one call
pub fn build_request(id: u64, method: impl Into<String>, params: Params) -> JsonRpcRequest {
    JsonRpcRequest::new(method, params, Id::from(id))
}

/// Encode any serializable message to a JSON string
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a request envelope for the request body
pub fn encode_request(req: &JsonRpcRequest) -> Result<String> {
    encode(req)
}

/// Decode a JSON body to a specific type
pub fn decode_as<'de, T: Deserialize<'de>>(data: &'de [u8]) -> Result<T> {
    serde_json::from_slice(data).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a response body
///
/// See the module docs for how each shape is classified.
pub fn parse_response(body: &[u8]) -> Result<RpcReply> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;
    classify_response(value)
}

/// Classify an already-decoded response value
pub fn classify_response(value: Value) -> Result<RpcReply> {
    let mut object = match value {
        Value::Object(object) => object,
        other => return Ok(RpcReply::Unrecognized(other)),
    };

    let id = match object.get("id") {
        Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_default(),
        None => Id::Null,
    };

    if let Some(result) = object.remove("result") {
        return Ok(RpcReply::Success { id, result });
    }

    match object.remove("error") {
        // A null `error` carries nothing, so it is dropped from the pass-through body
        Some(Value::Null) | None => Ok(RpcReply::Unrecognized(Value::Object(object))),
        Some(raw) => {
            let error: JsonRpcErrorData = serde_json::from_value(raw)
                .map_err(|e| Error::MalformedResponse(format!("invalid error object: {}", e)))?;
            Ok(RpcReply::Failure { id, error })
        }
    }
}

/// Turn a reply into the value a caller sees
///
/// `Failure` becomes `Error::RemoteProtocol`. `Unrecognized` is passed through
/// as-is unless `strict` is set, in which case it is `Error::UnexpectedResponse`.
pub fn into_result(reply: RpcReply, strict: bool) -> Result<Value> {
    match reply {
        RpcReply::Success { result, .. } => Ok(result),
        RpcReply::Failure { error, .. } => Err(Error::RemoteProtocol(error)),
        RpcReply::Unrecognized(value) if strict => Err(Error::UnexpectedResponse(value)),
        RpcReply::Unrecognized(value) => Ok(value),
    }
}
