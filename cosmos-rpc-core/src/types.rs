//! JSON-RPC envelope types spoken by the COSMOS API server
//!
//! The server accepts JSON-RPC 2.0 shaped requests with one extension: keyword
//! arguments travel in a separate `keyword_params` object next to the
//! positional `params` array. These types fix that envelope so the field
//! names never drift from what the server dispatches on.
//!
//! # Request IDs
//!
//! The client only ever sends numeric IDs, but the server may echo `null`
//! (for example when it could not parse the request), so [`Id`] keeps the
//! full set of shapes allowed on the wire.

use crate::error::JsonRpcErrorData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Protocol version marker sent in every request
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request ID
///
/// Serialized untagged, so `Id::Number(7)` is simply `7` on the wire.
///
/// # Examples
///
/// ```rust
/// use cosmos_rpc_core::Id;
///
/// let id: Id = 42u64.into();
/// assert_eq!(id.to_string(), "42");
/// assert_eq!(id.as_u64(), Some(42));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric identifier, the only kind this client generates
    Number(i64),
    /// String identifier
    String(String),
    /// Null identifier, sent back by servers that could not read the request
    #[default]
    Null,
}

impl Id {
    /// Numeric value of the ID, if it is a non-negative number
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Id::Number(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<u64> for Id {
    /// Saturates at `i64::MAX`; a connection would need 2^63 calls to get there.
    fn from(n: u64) -> Self {
        Id::Number(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

/// Arguments for a remote method call
///
/// Mirrors a call site like `tlm("INST", "HEALTH_STATUS", "TEMP1", type="RAW")`:
/// positional arguments keep their order, keyword arguments are a map.
///
/// # Examples
///
/// ```rust
/// use cosmos_rpc_core::Params;
/// use serde_json::json;
///
/// let params = Params::new()
///     .arg("INST")
///     .arg("HEALTH_STATUS")
///     .kwarg("type", "RAW");
///
/// assert_eq!(params.args, vec![json!("INST"), json!("HEALTH_STATUS")]);
/// assert_eq!(params.kwargs["type"], json!("RAW"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    /// Positional arguments, in call order
    pub args: Vec<Value>,
    /// Keyword arguments
    pub kwargs: Map<String, Value>,
}

impl Params {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional arguments only
    pub fn from_args(args: Vec<Value>) -> Self {
        Self {
            args,
            kwargs: Map::new(),
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Set a keyword argument, replacing any earlier value for the same name
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

/// Request envelope posted to the API endpoint
///
/// ```json
/// {"jsonrpc":"2.0","method":"tlm","params":["INST HEALTH_STATUS TEMP1"],"id":3,
///  "keyword_params":{"type":"RAW"}}
/// ```
///
/// `keyword_params` is omitted entirely when there are no keyword arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Always [`JSONRPC_VERSION`]
    pub jsonrpc: String,
    /// Name of the remote method
    pub method: String,
    /// Positional arguments, always present (possibly empty)
    #[serde(default)]
    pub params: Vec<Value>,
    /// Correlates the request with its response
    pub id: Id,
    /// Keyword arguments
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub keyword_params: Map<String, Value>,
}

impl JsonRpcRequest {
    /// Build a request envelope
    ///
    /// ```rust
    /// use cosmos_rpc_core::{Id, JsonRpcRequest, Params};
    ///
    /// let request = JsonRpcRequest::new("get_target_list", Params::new(), Id::Number(1));
    /// assert_eq!(request.jsonrpc, "2.0");
    /// assert!(request.params.is_empty());
    /// ```
    pub fn new(method: impl Into<String>, params: Params, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: params.args,
            id,
            keyword_params: params.kwargs,
        }
    }
}

/// Response envelope as returned by the server
///
/// Exactly one of `result` or `error` is expected. The decoder in
/// [`crate::codec`] handles bodies that carry neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorData>,
    #[serde(default)]
    pub id: Id,
}

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

impl JsonRpcResponse {
    pub fn success(result: Value, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: JsonRpcErrorData, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of decoding a response body
///
/// `Unrecognized` is the lenient path: the body was valid JSON but was not a
/// success or error envelope. The caller decides whether to pass it through
/// or reject it.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcReply {
    /// Envelope with a `result` member
    Success { id: Id, result: Value },
    /// Envelope with an `error` member
    Failure { id: Id, error: JsonRpcErrorData },
    /// Well-formed JSON of some other shape
    Unrecognized(Value),
}

impl RpcReply {
    /// ID echoed by the server, if the body was an envelope
    pub fn id(&self) -> Option<&Id> {
        match self {
            RpcReply::Success { id, .. } | RpcReply::Failure { id, .. } => Some(id),
            RpcReply::Unrecognized(_) => None,
        }
    }
}
