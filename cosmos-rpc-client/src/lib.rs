//! JSON-RPC client for the COSMOS command and telemetry API
//!
//! This crate talks to the API server over HTTP: each call is one POST of a
//! JSON-RPC 2.0 envelope to `/openc3-api/api`, and the decoded result (or a
//! typed error) comes back.
//!
//! # Core Features
//!
//! - **Connection**: Serialized dispatch with sequential request IDs
//! - **Typed errors**: Transport, protocol and server errors kept apart
//! - **REST pass-through**: Authenticated GET/POST/PUT/DELETE with scope injection
//! - **Api**: Named wrappers for the telemetry and limits methods, with disconnect mode
//! - **Observability**: OpenTelemetry integration for traces and metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cosmos_rpc_client::{Connection, ConnectionConfig, RequestOptions};
//! use cosmos_rpc_core::Params;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::default().with_password("password");
//!     let connection = Connection::new(config)?;
//!
//!     // JSON-RPC call
//!     let targets: Vec<String> = connection.request("get_target_list", Params::new()).await?;
//!     println!("Targets: {:?}", targets);
//!
//!     // Plain REST call, scope added automatically
//!     let response = connection.get("/openc3-api/targets", RequestOptions::new()).await?;
//!     println!("Status: {}", response.status());
//!
//!     connection.shutdown();
//!     Ok(())
//! }
//! ```

mod api;
mod auth;
mod config;
mod connection;
mod connection_builder;
mod metrics;
mod transport;

pub use api::{method_kind, Api, ApiMethod, InjectOptions, MethodKind, ValueType, API_METHODS};
pub use auth::{generate_auth, Authorization, NoAuth, PasswordAuth, TokenAuth};
pub use config::{
    ConnectionConfig, DEFAULT_HOSTNAME, DEFAULT_PORT, DEFAULT_SCHEME, DEFAULT_SCOPE,
    DEFAULT_TIMEOUT,
};
pub use connection::Connection;
pub use connection_builder::ConnectionBuilder;
pub use metrics::ClientMetrics;
pub use transport::{
    ensure_success, map_transport_error, RequestOptions, Verb, JSON_RPC_CONTENT_TYPE, RPC_PATH,
    SCOPE_PARAM,
};
