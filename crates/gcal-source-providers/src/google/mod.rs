//! Google Calendar backend.
//!
//! # Authentication Flow
//!
//! 1. Operator creates an OAuth client and stores its ID/secret
//! 2. A source run without a stored access token fails with a consent URL
//! 3. Operator opens the URL and grants read-only calendar access
//! 4. Google redirects to the callback endpoint with an authorization code
//! 5. The callback endpoint exchanges the code and prints the token pair
//! 6. Operator stores the pair and runs the source again
//!
//! Tokens are never refreshed or persisted automatically.
//!
//! # Example
//!
//! ```ignore
//! use gcal_source_providers::google::{EnvTokenStore, GoogleConfig, OAuthClient};
//!
//! let store = EnvTokenStore;
//! let oauth = OAuthClient::from_store(GoogleConfig::new(), &store)?;
//! let api = oauth.ensure_authorized(&store)?;
//! let calendars = api.list_calendars().await?;
//! ```

mod client;
mod config;
mod oauth;
mod tokens;

pub use client::GoogleCalendarClient;
pub use config::{CALENDAR_API_BASE, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GoogleConfig};
pub use oauth::{CREDENTIALS_SETUP_URL, OAuthClient, OAuthCredentials, TokenExchanger};
pub use tokens::{
    ACCESS_TOKEN_KEY, CLIENT_ID_KEY, CLIENT_SECRET_KEY, EnvTokenStore, MemoryTokenStore,
    REFRESH_TOKEN_KEY, TokenPair, TokenStore,
};
