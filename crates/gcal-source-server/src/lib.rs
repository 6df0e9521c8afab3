//! OAuth callback endpoint.
//!
//! Serves `GET /oAuthCallback`, the redirect target of the Google consent
//! screen. It runs separately from source runs with its own OAuth client.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gcal_source_providers::google::{EnvTokenStore, GoogleConfig, OAuthClient};
//! use gcal_source_server::{ServerConfig, serve, shutdown_signal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let google = GoogleConfig::new();
//!     let config = ServerConfig::from_google(&google)?;
//!     let oauth = OAuthClient::from_store(google, &EnvTokenStore)?;
//!     serve(&config, Arc::new(oauth), shutdown_signal()).await?;
//!     Ok(())
//! }
//! ```

mod callback;
mod config;
mod error;
mod signals;

use std::future::Future;
use std::sync::Arc;

use gcal_source_providers::google::TokenExchanger;
use tokio::net::TcpListener;
use tracing::info;

pub use callback::{
    CallbackParams, CallbackState, SUCCESS_BODY, callback_router, persist_instructions,
};
pub use config::{CALLBACK_PATH, DEFAULT_PORT, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use signals::shutdown_signal;

/// Serves the callback endpoint until `shutdown` completes.
pub async fn serve<F>(
    config: &ServerConfig,
    exchanger: Arc<dyn TokenExchanger>,
    shutdown: F,
) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;

    let app = callback_router(&config.callback_path, CallbackState::new(exchanger));
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| ServerError::bind(config.bind_addr, e))?;

    info!(
        addr = %config.bind_addr,
        path = %config.callback_path,
        "callback endpoint listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("callback endpoint stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use gcal_source_providers::google::{GoogleConfig, OAuthClient, OAuthCredentials};

    use super::*;

    fn exchanger() -> Arc<dyn TokenExchanger> {
        let credentials = OAuthCredentials::new("id", "secret");
        Arc::new(OAuthClient::new(credentials, GoogleConfig::new()).unwrap())
    }

    #[tokio::test]
    async fn occupied_port_is_a_bind_error() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr: SocketAddr = occupied.local_addr().unwrap();

        let config = ServerConfig::new(addr);
        let err = serve(&config, exchanger(), async {}).await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
    }

    #[tokio::test]
    async fn invalid_config_fails_before_binding() {
        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap()).with_callback_path("cb");
        let err = serve(&config, exchanger(), async {}).await.unwrap_err();
        assert!(matches!(err, ServerError::Config { .. }));
    }

    #[tokio::test]
    async fn stops_when_shutdown_completes() {
        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap());
        serve(&config, exchanger(), async {}).await.unwrap();
    }
}
