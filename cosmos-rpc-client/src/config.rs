//! Connection configuration
//!
//! Everything a [`Connection`](crate::Connection) needs to know about where the
//! API lives and how to talk to it. The struct is passed in explicitly; the
//! only place that reads process environment is [`ConnectionConfig::from_env`],
//! and it does so once.
//!
//! # Environment Variables
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `OPENC3_API_SCHEMA` | `scheme` | `http` |
//! | `OPENC3_API_HOSTNAME` | `hostname` | `127.0.0.1` |
//! | `OPENC3_API_PORT` | `port` | `2900` |
//! | `OPENC3_API_TIMEOUT` | `timeout` (seconds, float) | `5.0` |
//! | `OPENC3_USER_AGENT` | `user_agent` | `cosmos-rpc/<version>` |
//! | `OPENC3_SCOPE` | `scope` | `DEFAULT` |
//! | `OPENC3_API_PASSWORD` | `api_password` | unset |
//! | `OPENC3_API_TOKEN` | `api_token` | unset |
//! | `OPENC3_DISCONNECT` | `disconnect` | `false` |
//!
//! # Examples
//!
//! ```rust
//! use cosmos_rpc_client::ConnectionConfig;
//! use std::time::Duration;
//!
//! let config = ConnectionConfig::default()
//!     .with_hostname("cosmos.local")
//!     .with_port(2900)
//!     .with_timeout(Duration::from_secs(10))
//!     .with_password("secret");
//!
//! assert_eq!(config.base_url(), "http://cosmos.local:2900");
//! ```

use cosmos_rpc_core::{Error, Result};
use std::time::Duration;

pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 2900;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_SCOPE: &str = "DEFAULT";

/// Settings for one connection to the API server
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// `http` or `https`
    pub scheme: String,
    pub hostname: String,
    pub port: u16,
    /// Bound on each HTTP exchange
    pub timeout: Duration,
    /// Sent as the `User-Agent` header on every request
    pub user_agent: String,
    /// Injected into REST pass-through calls that don't name one
    pub scope: String,
    /// Password credential, used when no token is configured
    pub api_password: Option<String>,
    /// Pre-minted bearer token, takes precedence over the password
    pub api_token: Option<String>,
    /// Skip methods that change limits state, see [`crate::Api`]
    pub disconnect: bool,
    /// Reject responses with neither `result` nor `error` instead of passing them through
    pub strict_responses: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            scope: DEFAULT_SCOPE.to_string(),
            api_password: None,
            api_token: None,
            disconnect: false,
            strict_responses: false,
        }
    }
}

fn default_user_agent() -> String {
    format!("cosmos-rpc/{}", env!("CARGO_PKG_VERSION"))
}

impl ConnectionConfig {
    /// Build a configuration from the process environment
    ///
    /// Unset variables fall back to the defaults; unparsable numbers are an
    /// `Error::Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("OPENC3_API_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("OPENC3_API_PORT={:?}: {}", raw, e)))?,
            None => defaults.port,
        };

        let timeout = match var("OPENC3_API_TIMEOUT") {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.timeout,
        };

        let disconnect = var("OPENC3_DISCONNECT")
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.disconnect);

        Ok(Self {
            scheme: var("OPENC3_API_SCHEMA").unwrap_or(defaults.scheme),
            hostname: var("OPENC3_API_HOSTNAME").unwrap_or(defaults.hostname),
            port,
            timeout,
            user_agent: var("OPENC3_USER_AGENT").unwrap_or(defaults.user_agent),
            scope: var("OPENC3_SCOPE").unwrap_or(defaults.scope),
            api_password: var("OPENC3_API_PASSWORD"),
            api_token: var("OPENC3_API_TOKEN"),
            disconnect,
            strict_responses: defaults.strict_responses,
        })
    }

    /// `{scheme}://{hostname}:{port}`, the prefix for every request URL
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.hostname, self.port)
    }

    /// Check the settings before a connection is built
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported scheme {:?}, expected http or https",
                self.scheme
            )));
        }
        if self.hostname.trim().is_empty() {
            return Err(Error::Config("hostname is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.api_password = Some(password.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_disconnect(mut self, disconnect: bool) -> Self {
        self.disconnect = disconnect;
        self
    }

    pub fn with_strict_responses(mut self, strict: bool) -> Self {
        self.strict_responses = strict;
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("OPENC3_API_TIMEOUT={:?}: {}", raw, e)))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| Error::Config(format!("OPENC3_API_TIMEOUT={:?}: {}", raw, e)))
}
