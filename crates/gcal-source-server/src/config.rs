//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

use gcal_source_providers::google::GoogleConfig;
use url::Url;

use crate::error::{ServerError, ServerResult};

/// Default path of the callback endpoint.
pub const CALLBACK_PATH: &str = "/oAuthCallback";

/// Default listen port, matching the default redirect URI.
pub const DEFAULT_PORT: u16 = 8000;

/// Callback endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the endpoint listens on.
    pub bind_addr: SocketAddr,

    /// Route of the callback handler.
    pub callback_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            callback_path: CALLBACK_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a configuration listening on `bind_addr`.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }

    /// Derives the listen port and route from the OAuth redirect URI.
    ///
    /// Listens on loopback; the redirect URI host is expected to resolve
    /// there.
    pub fn from_google(google: &GoogleConfig) -> ServerResult<Self> {
        let url = Url::parse(&google.redirect_uri).map_err(|e| {
            ServerError::config(format!("invalid redirect URI {}: {}", google.redirect_uri, e))
        })?;
        let port = url.port_or_known_default().ok_or_else(|| {
            ServerError::config(format!("redirect URI {} has no port", google.redirect_uri))
        })?;

        Ok(Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
            callback_path: url.path().to_string(),
        })
    }

    /// Builder: set the listen address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Builder: set the callback route.
    pub fn with_callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = path.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ServerResult<()> {
        if !self.callback_path.starts_with('/') {
            return Err(ServerError::config(format!(
                "callback path must start with '/': {}",
                self.callback_path
            )));
        }
        Ok(())
    }
}
