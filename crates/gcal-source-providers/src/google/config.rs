//! Google Calendar source configuration.
//!
//! Only non-secret settings live here. Client credentials and tokens are read
//! from a [`TokenStore`](super::tokens::TokenStore) at run start.

use std::time::Duration;

use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// Google OAuth authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Settings for the OAuth client and the Calendar API client.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Redirect URI registered for the OAuth client.
    ///
    /// Must point at the callback endpoint. Defaults to
    /// `http://localhost:8000/oAuthCallback`.
    pub redirect_uri: String,

    /// OAuth scopes to request.
    ///
    /// Changing the scopes requires discarding the stored tokens and
    /// authorizing again.
    pub scopes: Vec<String>,

    /// Request timeout for every HTTP call.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,

    /// Calendar API base URL.
    pub api_base_url: String,

    /// OAuth authorization endpoint.
    pub auth_endpoint: String,

    /// OAuth token endpoint.
    pub token_endpoint: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default redirect URI, served by the callback endpoint.
    pub const DEFAULT_REDIRECT_URI: &'static str = "http://localhost:8000/oAuthCallback";

    /// Default OAuth scope for read-only calendar access.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar.readonly";

    pub fn new() -> Self {
        Self {
            redirect_uri: Self::DEFAULT_REDIRECT_URI.to_string(),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("gcal-source/{}", env!("CARGO_PKG_VERSION")),
            api_base_url: CALENDAR_API_BASE.to_string(),
            auth_endpoint: GOOGLE_AUTH_URL.to_string(),
            token_endpoint: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    /// Sets the redirect URI.
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the Calendar API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Returns the path component of the redirect URI, e.g. `/oAuthCallback`.
    pub fn callback_path(&self) -> ProviderResult<String> {
        let url = Url::parse(&self.redirect_uri).map_err(|e| {
            ProviderError::configuration(format!(
                "invalid redirect URI {}: {}",
                self.redirect_uri, e
            ))
        })?;
        Ok(url.path().to_string())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ProviderResult<()> {
        self.callback_path()?;

        if self.scopes.is_empty() {
            return Err(ProviderError::configuration(
                "at least one OAuth scope is required",
            ));
        }

        if self.timeout.is_zero() {
            return Err(ProviderError::configuration("timeout must be positive"));
        }

        for (name, value) in [
            ("api_base_url", &self.api_base_url),
            ("auth_endpoint", &self.auth_endpoint),
            ("token_endpoint", &self.token_endpoint),
        ] {
            Url::parse(value).map_err(|e| {
                ProviderError::configuration(format!("invalid {} {}: {}", name, value, e))
            })?;
        }

        Ok(())
    }
}
