//! Credentials attached to outbound requests
//!
//! The connection treats its credential as opaque: it hands every request
//! builder to [`Authorization::authorize`] and sends whatever comes back.
//! Minting tokens (Keycloak or otherwise) happens outside this crate; a token
//! obtained elsewhere is supplied through [`TokenAuth`].

use crate::config::ConnectionConfig;
use cosmos_rpc_core::{Error, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use std::fmt;
use std::sync::Arc;

/// Something that can authenticate a request
pub trait Authorization: Send + Sync + fmt::Debug {
    /// Attach credentials to an outgoing request
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Sends the password verbatim in the `Authorization` header
///
/// This is what the open-source API server expects.
#[derive(Clone)]
pub struct PasswordAuth {
    password: String,
}

impl PasswordAuth {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl fmt::Debug for PasswordAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordAuth").field("password", &"***").finish()
    }
}

impl Authorization for PasswordAuth {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.password.as_str())
    }
}

/// Bearer token minted by an external identity provider
#[derive(Clone)]
pub struct TokenAuth {
    token: String,
}

impl TokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuth").field("token", &"***").finish()
    }
}

impl Authorization for TokenAuth {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }
}

/// Leaves requests untouched, for servers without authentication
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authorization for NoAuth {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

/// Pick a credential from the configuration
///
/// A token wins over a password. With neither, this fails with `Error::Auth`;
/// use [`NoAuth`] explicitly for an unauthenticated server.
pub fn generate_auth(config: &ConnectionConfig) -> Result<Arc<dyn Authorization>> {
    if let Some(token) = config.api_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(Arc::new(TokenAuth::new(token)));
    }
    if let Some(password) = config.api_password.as_deref().filter(|p| !p.is_empty()) {
        return Ok(Arc::new(PasswordAuth::new(password)));
    }
    Err(Error::Auth(
        "no credential configured: set OPENC3_API_PASSWORD or OPENC3_API_TOKEN".to_string(),
    ))
}
