//! OAuth 2.0 authorization code flow for Google APIs.
//!
//! The flow is split across two processes:
//!
//! 1. A source run calls [`OAuthClient::ensure_authorized`]. Without a stored
//!    access token it fails with an authorization URL.
//! 2. The operator opens the URL; Google redirects the browser to the callback
//!    endpoint, which calls [`TokenExchanger::exchange`] and prints the token
//!    pair.
//! 3. The operator stores the pair and runs the source again.
//!
//! Tokens are never persisted by this module.

use tracing::{debug, info};
use url::Url;

use crate::api::BoxFuture;
use crate::error::{ProviderError, ProviderResult};

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;
use super::tokens::{CLIENT_ID_KEY, CLIENT_SECRET_KEY, TokenPair, TokenStore};

/// Where operators create OAuth client credentials.
pub const CREDENTIALS_SETUP_URL: &str =
    "https://developers.google.com/workspace/guides/create-credentials#oauth-client-id";

/// OAuth client credentials.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads the client ID and secret from the store.
    ///
    /// Fails with a configuration error naming the setup steps when either is
    /// missing.
    pub fn from_store(store: &dyn TokenStore) -> ProviderResult<Self> {
        match (store.lookup(CLIENT_ID_KEY), store.lookup(CLIENT_SECRET_KEY)) {
            (Some(client_id), Some(client_secret)) => Ok(Self::new(client_id, client_secret)),
            _ => Err(ProviderError::configuration(missing_credentials_message())),
        }
    }
}

fn missing_credentials_message() -> String {
    format!(
        "No client configuration available.\n\
         Enable the Google Calendar API and create an OAuth client by visiting:\n\
         \n\
         {}\n\
         \n\
         Then store the client ID and client secret in your .env file as\n\
         {}=<client_id>\n\
         {}=<client_secret>",
        CREDENTIALS_SETUP_URL, CLIENT_ID_KEY, CLIENT_SECRET_KEY
    )
}

/// Exchanges authorization codes for tokens.
///
/// Implemented by [`OAuthClient`]; the callback server depends only on this
/// trait.
pub trait TokenExchanger: Send + Sync {
    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, ProviderResult<TokenPair>>;
}

/// OAuth client for Google APIs.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    config: GoogleConfig,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    pub fn new(credentials: OAuthCredentials, config: GoogleConfig) -> ProviderResult<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            credentials,
            config,
            http_client,
        })
    }

    /// Builds a client from the credentials in `store`.
    ///
    /// Fails before any network traffic if the client ID or secret is missing.
    pub fn from_store(config: GoogleConfig, store: &dyn TokenStore) -> ProviderResult<Self> {
        let credentials = OAuthCredentials::from_store(store)?;
        Self::new(credentials, config)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    /// Builds the consent URL for offline access to the configured scopes.
    pub fn authorization_url(&self) -> ProviderResult<String> {
        let scope = self.config.scopes.join(" ");
        let url = Url::parse_with_params(
            &self.config.auth_endpoint,
            &[
                ("access_type", "offline"),
                ("scope", scope.as_str()),
                ("response_type", "code"),
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ],
        )
        .map_err(|e| {
            ProviderError::configuration(format!("invalid authorization endpoint: {}", e))
        })?;
        Ok(url.into())
    }

    /// Attaches the stored token pair and returns an authorized API client.
    ///
    /// Without a stored access token, fails with an
    /// [`AuthorizationRequired`](crate::ProviderErrorCode::AuthorizationRequired)
    /// error embedding the authorization URL. The run cannot continue until
    /// the operator completes the flow and restarts it.
    pub fn ensure_authorized(
        &self,
        store: &dyn TokenStore,
    ) -> ProviderResult<GoogleCalendarClient> {
        match TokenPair::from_store(store) {
            Some(tokens) => {
                debug!(
                    has_refresh_token = tokens.refresh_token.is_some(),
                    "using stored access token"
                );
                GoogleCalendarClient::new(tokens, &self.config)
            }
            None => {
                let auth_url = self.authorization_url()?;
                Err(ProviderError::authorization_required(format!(
                    "Authorize this app by visiting this url:\n\
                     \n\
                     {}\n\
                     \n\
                     The callback endpoint at {} must be running to receive the authorization \
                     code.",
                    auth_url, self.config.redirect_uri
                )))
            }
        }
    }

    /// Exchanges an authorization code for a token pair.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<TokenPair> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("token exchange request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "token exchange failed ({}): {}",
                status, body
            )));
        }

        let tokens = parse_token_response(&body)?;
        info!(
            has_refresh_token = tokens.refresh_token.is_some(),
            "successfully obtained tokens"
        );
        Ok(tokens)
    }
}

impl TokenExchanger for OAuthClient {
    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, ProviderResult<TokenPair>> {
        Box::pin(self.exchange_code(code))
    }
}

/// Response from Google's token endpoint.
#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn parse_token_response(body: &str) -> ProviderResult<TokenPair> {
    let response: TokenResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::invalid_response(format!("invalid token response: {}", e)))?;
    Ok(TokenPair::new(response.access_token, response.refresh_token))
}
