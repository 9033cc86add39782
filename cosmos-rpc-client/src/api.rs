//! Script-level API over a [`Connection`]
//!
//! Every remote method is reachable through [`Api::call`]. The common
//! telemetry and limits methods also get a named wrapper, generated from one
//! table so the wrapper list and [`API_METHODS`] cannot drift apart.
//!
//! # Disconnect mode
//!
//! With `disconnect` set, methods that change limits state on the server are
//! not sent; they log at `info` and return `null`. Reads are always forwarded.
//!
//! ```rust,no_run
//! use cosmos_rpc_client::{Api, Connection, ConnectionConfig, ValueType};
//! use cosmos_rpc_core::Params;
//!
//! # async fn example() -> cosmos_rpc_core::Result<()> {
//! let api = Api::new(Connection::new(ConnectionConfig::from_env()?)?);
//!
//! let temp = api.tlm(Params::new().arg("INST HEALTH_STATUS TEMP1")).await?;
//! let packet = api.get_tlm_packet("INST", "HEALTH_STATUS", ValueType::Raw).await?;
//! # Ok(())
//! # }
//! ```

use crate::Connection;
use cosmos_rpc_core::{Params, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Whether a method only reads server state or changes limits state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Query,
    /// Skipped in disconnect mode
    LimitsChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiMethod {
    pub name: &'static str,
    pub kind: MethodKind,
}

/// Kind of a remote method, `Query` for names not in [`API_METHODS`]
pub fn method_kind(name: &str) -> MethodKind {
    API_METHODS
        .iter()
        .find(|m| m.name == name)
        .map(|m| m.kind)
        .unwrap_or(MethodKind::Query)
}

/// Client-side API bound to one connection
#[derive(Debug, Clone)]
pub struct Api {
    connection: Connection,
    disconnect: bool,
}

impl Api {
    /// Wrap `connection`, taking disconnect mode from its configuration
    pub fn new(connection: Connection) -> Self {
        let disconnect = connection.config().disconnect;
        Self {
            connection,
            disconnect,
        }
    }

    pub fn with_disconnect(mut self, disconnect: bool) -> Self {
        self.disconnect = disconnect;
        self
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnect
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Invoke any remote method by name
    pub async fn call(&self, method: &str, params: Params) -> Result<Value> {
        if self.disconnect && method_kind(method) == MethodKind::LimitsChange {
            tracing::info!(method = %method, "DISCONNECT: {} ignored", method);
            return Ok(Value::Null);
        }
        self.connection.invoke(method, params).await
    }

    /// All item values of one packet
    ///
    /// The value type travels as the `type` keyword argument.
    pub async fn get_tlm_packet(
        &self,
        target_name: &str,
        packet_name: &str,
        value_type: ValueType,
    ) -> Result<Value> {
        let params = Params::new()
            .arg(target_name)
            .arg(packet_name)
            .kwarg("type", value_type.as_str());
        self.call("get_tlm_packet", params).await
    }

    /// Current values of `[target, packet, item]` triples
    pub async fn get_tlm_values(&self, items: &[[&str; 3]]) -> Result<Value> {
        let items: Vec<Value> = items
            .iter()
            .map(|triple| Value::from(triple.to_vec()))
            .collect();
        self.call("get_tlm_values", Params::new().arg(items)).await
    }

    /// Inject a packet as if it had arrived from an interface
    ///
    /// `items` maps item names to values; `None` injects the packet with its
    /// current contents.
    pub async fn inject_tlm(
        &self,
        target_name: &str,
        packet_name: &str,
        items: Option<Map<String, Value>>,
        options: InjectOptions,
    ) -> Result<Value> {
        let params = Params::new()
            .arg(target_name)
            .arg(packet_name)
            .arg(items.map(Value::Object).unwrap_or(Value::Null))
            .arg(options.value_type.as_str())
            .arg(options.send_routers)
            .arg(options.send_packet_log_writers)
            .arg(options.create_new_logs);
        self.call("inject_tlm", params).await
    }
}

macro_rules! api_methods {
    ($( $(#[$doc:meta])* $name:ident => $kind:ident ),* $(,)?) => {
        /// Remote methods with a named wrapper on [`Api`]
        pub const API_METHODS: &[ApiMethod] = &[
            $( ApiMethod { name: stringify!($name), kind: MethodKind::$kind }, )*
        ];

        impl Api {
            $(
                $(#[$doc])*
                pub async fn $name(&self, params: Params) -> Result<Value> {
                    self.call(stringify!($name), params).await
                }
            )*
        }
    };
}

api_methods! {
    /// Converted value of a telemetry item
    tlm => Query,
    tlm_raw => Query,
    tlm_formatted => Query,
    tlm_with_units => Query,
    tlm_variable => Query,
    /// Set a telemetry value until the next packet overwrites it
    set_tlm => Query,
    set_tlm_raw => Query,
    /// Pin a telemetry value until [`Api::normalize_tlm`]
    override_tlm => Query,
    override_tlm_raw => Query,
    normalize_tlm => Query,
    get_tlm_buffer => Query,
    get_telemetry => Query,
    get_target => Query,
    get_target_list => Query,
    /// Returns an id for retrieving the subscribed packets
    subscribe_packets => Query,

    get_limits => Query,
    set_limits => LimitsChange,
    enable_limits => LimitsChange,
    disable_limits => LimitsChange,
    limits_enabled => Query,
    get_limits_groups => Query,
    enable_limits_group => LimitsChange,
    disable_limits_group => LimitsChange,
    get_limits_sets => Query,
    set_limits_set => LimitsChange,
    get_limits_set => Query,
    get_out_of_limits => Query,
    get_overall_limits_state => Query,
    get_limits_events => Query,
    get_stale => Query,
}

/// Representation requested for telemetry values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Raw,
    #[default]
    Converted,
    Formatted,
    WithUnits,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Raw => "RAW",
            ValueType::Converted => "CONVERTED",
            ValueType::Formatted => "FORMATTED",
            ValueType::WithUnits => "WITH_UNITS",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing flags for [`Api::inject_tlm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectOptions {
    /// How the injected item values are interpreted
    pub value_type: ValueType,
    pub send_routers: bool,
    pub send_packet_log_writers: bool,
    pub create_new_logs: bool,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            value_type: ValueType::Converted,
            send_routers: true,
            send_packet_log_writers: true,
            create_new_logs: false,
        }
    }
}
