//! The `auth-url` command.

use gcal_source_providers::google::{OAuthClient, TokenStore};
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Prints the authorization URL, optionally opening it in a browser.
///
/// Only the client credentials are needed; a stored access token is ignored.
pub fn auth_url(
    config: &ClientConfig,
    store: &dyn TokenStore,
    open_browser: bool,
) -> ClientResult<String> {
    let google = config.google.to_provider_config()?;
    let redirect_uri = google.redirect_uri.clone();
    let oauth = OAuthClient::from_store(google, store)?;
    let url = oauth.authorization_url()?;

    println!("Authorize this app by visiting this url:");
    println!();
    println!("{}", url);
    println!();
    println!(
        "Run `gcal-source serve` first so {} can receive the code.",
        redirect_uri
    );

    if open_browser && let Err(e) = open::that(&url) {
        warn!(error = %e, "failed to open browser; copy the URL above");
    }

    Ok(url)
}
