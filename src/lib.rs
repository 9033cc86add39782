//! cosmos-rpc - JSON-RPC client for COSMOS-style command and telemetry APIs
//!
//! This is the main convenience crate that re-exports the cosmos-rpc
//! sub-crates. Use it if you want a single dependency.
//!
//! # Architecture
//!
//! - **cosmos-rpc-core**: Wire types, codec, error taxonomy, observability
//! - **cosmos-rpc-client**: HTTP connection, configuration, credentials, API wrappers
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cosmos_rpc::{Api, Connection, ConnectionConfig, Params, ValueType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connection = Connection::new(ConnectionConfig::from_env()?)?;
//!
//!     let result = connection
//!         .invoke("tlm", Params::new().arg("INST HEALTH_STATUS TEMP1"))
//!         .await?;
//!     println!("TEMP1 = {}", result);
//!
//!     let api = Api::new(connection.clone());
//!     let packet = api.get_tlm_packet("INST", "HEALTH_STATUS", ValueType::Formatted).await?;
//!     println!("{}", packet);
//!
//!     connection.shutdown();
//!     Ok(())
//! }
//! ```

pub use cosmos_rpc_client as client;
pub use cosmos_rpc_core as core;

// Convenience re-exports of the most commonly used types
pub use cosmos_rpc_client::{
    Api, Connection, ConnectionBuilder, ConnectionConfig, InjectOptions, RequestOptions,
    ValueType,
};
pub use cosmos_rpc_core::{Error, Params, Result};
