//! Builder for configuring a connection before it is created
//!
//! `ConnectionBuilder` lets you:
//! - Supply a credential other than the one derived from the configuration
//! - Configure observability (OpenTelemetry)
//! - Set the service name for telemetry
//!
//! # Examples
//!
//! ```rust,no_run
//! use cosmos_rpc_client::{ConnectionBuilder, ConnectionConfig, NoAuth};
//! use std::sync::Arc;
//!
//! # fn example() -> cosmos_rpc_core::Result<()> {
//! // Credential from OPENC3_API_PASSWORD / OPENC3_API_TOKEN
//! let connection = ConnectionBuilder::new(ConnectionConfig::from_env()?).build()?;
//!
//! // Unauthenticated server, with tracing and metrics
//! let local = ConnectionBuilder::new(ConnectionConfig::default())
//!     .with_auth(Arc::new(NoAuth))
//!     .with_default_observability()
//!     .service_name("limits-monitor")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::{generate_auth, Authorization};
use crate::{ClientMetrics, Connection, ConnectionConfig};
use cosmos_rpc_core::{Error, ObservabilityConfig, Result};
use std::sync::Arc;

/// Builder for configuring and creating a [`Connection`]
pub struct ConnectionBuilder {
    config: ConnectionConfig,
    auth: Option<Arc<dyn Authorization>>,
    observability_config: Option<ObservabilityConfig>,
    service_name: Option<String>,
}

impl ConnectionBuilder {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            auth: None,
            observability_config: None,
            service_name: None,
        }
    }

    /// Use this credential instead of the one derived from the configuration
    pub fn with_auth(mut self, auth: Arc<dyn Authorization>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Enable OpenTelemetry observability with custom configuration
    pub fn with_observability(mut self, config: ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Enable OpenTelemetry observability with default configuration
    pub fn with_default_observability(mut self) -> Self {
        self.observability_config = Some(ObservabilityConfig::default());
        self
    }

    /// Set service name for observability (used if observability is enabled)
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Create the connection
    ///
    /// Fails with `Error::Config` for an invalid configuration and
    /// `Error::Auth` when no credential is available. Nothing is sent to the
    /// server.
    pub fn build(self) -> Result<Connection> {
        let auth = match self.auth {
            Some(auth) => auth,
            None => generate_auth(&self.config)?,
        };

        let metrics = if let Some(mut config) = self.observability_config {
            if let Some(name) = self.service_name {
                config.service_name = name;
            }

            cosmos_rpc_core::init_observability(config.clone()).map_err(|e| {
                Error::Config(format!("failed to initialize observability: {}", e))
            })?;

            Some(Arc::new(ClientMetrics::new(config.service_name)))
        } else {
            None
        };

        let connection = Connection::from_parts(self.config, auth, metrics)?;
        tracing::info!(url = %connection.base_url(), "connection ready");
        Ok(connection)
    }
}
