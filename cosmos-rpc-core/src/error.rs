//! Error types for cosmos-rpc
//!
//! Two layers:
//!
//! - **Error**: everything a caller of the connection can see fail
//! - **JsonRpcErrorData**: the `error` object of a response envelope, as sent
//!   by the server
//!
//! # Taxonomy
//!
//! | Variant | Raised when |
//! |---|---|
//! | `ConnectionClosed` | a call is made after `shutdown()` |
//! | `Connection` | the HTTP request never produced a response (refused, DNS, timeout) |
//! | `RemoteProtocol` | the server answered with an error envelope |
//! | `MalformedResponse` | the response body is not JSON |
//! | `UnexpectedResponse` | valid JSON without `result`/`error`, strict mode only |
//! | `HttpStatus` | a REST pass-through got a non-2xx status |
//!
//! Nothing here is retried by the client itself; [`Error::is_retryable`] is a
//! hint for callers that want their own retry policy.
//!
//! # Server Error Codes
//!
//! Besides the JSON-RPC 2.0 reserved codes the server uses a few of its own,
//! classified by [`ErrorCode`]:
//! - `-32500`: Authentication failed
//! - `-32501`: Forbidden
//! - `-32100`: Hazardous command
//! - `-32101`: Critical command
//! - `-1`: Any other server-side exception
//!
//! # Examples
//!
//! ```rust
//! use cosmos_rpc_core::{ErrorCode, JsonRpcErrorData};
//!
//! let error = JsonRpcErrorData::new(-32100, "Hazardous command INST COLLECT");
//! assert_eq!(error.kind(), ErrorCode::Hazardous);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for cosmos-rpc operations
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong below the protocol layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Could not reach the server (refused, DNS failure, TLS setup)
    Connect,
    /// The configured timeout expired
    Timeout,
    /// Failed while sending the request or reading the body
    Request,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransportKind::Connect => "connect",
            TransportKind::Timeout => "timeout",
            TransportKind::Request => "request",
        };
        f.write_str(name)
    }
}

/// Error type for cosmos-rpc operations
///
/// Clonable so a single failure can be handed to metrics, logs and the caller
/// without re-creating it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The connection was shut down before the call
    #[error("Connection closed: shutdown has been requested")]
    ConnectionClosed,

    /// Transport-level failure, no response was received
    #[error("Connection error ({kind}): {message}")]
    Connection {
        /// Which stage of the HTTP exchange failed
        kind: TransportKind,
        /// Description from the HTTP client
        message: String,
    },

    /// The server returned an error envelope
    #[error("Remote protocol error: {0}")]
    RemoteProtocol(#[from] JsonRpcErrorData),

    /// The response body could not be decoded as JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Valid JSON with neither `result` nor `error`, rejected in strict mode
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(serde_json::Value),

    /// A REST pass-through call got a non-2xx status
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// URL that was requested
        url: String,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// Encoding a request or decoding a typed result failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid connection configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable credential
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl Error {
    /// Whether repeating the same call could plausibly succeed
    ///
    /// Only transport failures qualify. Remote errors and decoding problems
    /// will repeat identically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Short label used for the error metric and logs
    pub fn kind_label(&self) -> &'static str {
        match self {
            Error::ConnectionClosed => "connection_closed",
            Error::Connection { .. } => "connection",
            Error::RemoteProtocol(_) => "remote_protocol",
            Error::MalformedResponse(_) => "malformed_response",
            Error::UnexpectedResponse(_) => "unexpected_response",
            Error::HttpStatus { .. } => "http_status",
            Error::Serialization(_) => "serialization",
            Error::Config(_) => "config",
            Error::Auth(_) => "auth",
        }
    }
}

/// Classification of the numeric code in an error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Credentials were rejected
    Authentication,
    /// Credentials were valid but lack the required permission
    Forbidden,
    /// Command is marked hazardous and must be sent with the hazardous variant
    Hazardous,
    /// Command is critical and needs approval
    CriticalCommand,
    /// Generic server-side exception
    Other,
    /// Anything not listed above
    Unknown(i32),
}

impl ErrorCode {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const AUTH_ERROR: i32 = -32500;
    pub const FORBIDDEN_ERROR: i32 = -32501;
    pub const HAZARDOUS_ERROR: i32 = -32100;
    pub const CRITICAL_CMD_ERROR: i32 = -32101;
    pub const OTHER_ERROR: i32 = -1;

    pub fn from_code(code: i32) -> Self {
        match code {
            Self::PARSE_ERROR => ErrorCode::ParseError,
            Self::INVALID_REQUEST => ErrorCode::InvalidRequest,
            Self::METHOD_NOT_FOUND => ErrorCode::MethodNotFound,
            Self::INVALID_PARAMS => ErrorCode::InvalidParams,
            Self::INTERNAL_ERROR => ErrorCode::InternalError,
            Self::AUTH_ERROR => ErrorCode::Authentication,
            Self::FORBIDDEN_ERROR => ErrorCode::Forbidden,
            Self::HAZARDOUS_ERROR => ErrorCode::Hazardous,
            Self::CRITICAL_CMD_ERROR => ErrorCode::CriticalCommand,
            Self::OTHER_ERROR => ErrorCode::Other,
            other => ErrorCode::Unknown(other),
        }
    }
}

/// Error object inside a response envelope
///
/// The server puts details of the exception it raised into `data`, typically
/// `{"class": "RuntimeError", "message": "...", "backtrace": [...]}`.
///
/// # Examples
///
/// ```rust
/// use cosmos_rpc_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// let error = JsonRpcErrorData::with_data(
///     -1,
///     "Unknown target: FOO",
///     json!({"class": "RuntimeError", "message": "Unknown target: FOO"}),
/// );
/// assert_eq!(error.remote_class(), Some("RuntimeError"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Numeric error code
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Optional additional error information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcErrorData {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Classify the numeric code
    pub fn kind(&self) -> ErrorCode {
        ErrorCode::from_code(self.code)
    }

    /// Exception class name reported by the server in `data.class`
    pub fn remote_class(&self) -> Option<&str> {
        self.data.as_ref()?.get("class")?.as_str()
    }
}

impl std::fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message", e.g. "[-32601] Method not found"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}
