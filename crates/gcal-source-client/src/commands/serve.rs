//! The `serve` command.

use std::net::SocketAddr;
use std::sync::Arc;

use gcal_source_providers::google::{OAuthClient, TokenStore};
use gcal_source_server::{ServerConfig, serve, shutdown_signal};

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Resolves the callback endpoint configuration.
///
/// The route and port come from the redirect URI; `[server] bind` and then
/// `--bind` override the listen address.
pub fn server_config(
    config: &ClientConfig,
    bind: Option<SocketAddr>,
) -> ClientResult<ServerConfig> {
    let google = config.google.to_provider_config()?;
    let mut server = ServerConfig::from_google(&google)?;
    if let Some(addr) = bind.or(config.server.bind) {
        server = server.with_bind_addr(addr);
    }
    server.validate()?;
    Ok(server)
}

/// Runs the callback endpoint until Ctrl+C or SIGTERM.
pub async fn run(
    config: &ClientConfig,
    store: &dyn TokenStore,
    bind: Option<SocketAddr>,
) -> ClientResult<()> {
    let server = server_config(config, bind)?;
    let oauth = OAuthClient::from_store(config.google.to_provider_config()?, store)?;

    eprintln!(
        "Waiting for the OAuth redirect on http://{}{} (Ctrl+C to stop)",
        server.bind_addr, server.callback_path
    );
    serve(&server, Arc::new(oauth), shutdown_signal()).await?;
    Ok(())
}
