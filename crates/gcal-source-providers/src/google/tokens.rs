//! Credential and token storage.
//!
//! Credentials and tokens are looked up through the [`TokenStore`] trait so
//! the source run and the callback server share one explicit context instead
//! of reading ambient process state. [`EnvTokenStore`] is the production
//! backend; [`MemoryTokenStore`] backs tests and embedders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Store key of the OAuth client ID.
pub const CLIENT_ID_KEY: &str = "GOOGLE_CLIENT_ID";
/// Store key of the OAuth client secret.
pub const CLIENT_SECRET_KEY: &str = "GOOGLE_CLIENT_SECRET";
/// Store key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "GOOGLE_ACCESS_TOKEN";
/// Store key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "GOOGLE_REFRESH_TOKEN";

/// Read-only key-value lookup for credentials and tokens.
pub trait TokenStore: Send + Sync {
    /// Returns the raw value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns the value under `key`, treating blank values as absent.
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Reads values from process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvTokenStore;

impl TokenStore for EnvTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    values: HashMap<String, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// An OAuth access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// The access token for API requests.
    pub access_token: String,
    /// The refresh token, only returned for offline access grants.
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }

    /// Loads the stored pair. Returns `None` when no access token is stored.
    pub fn from_store(store: &dyn TokenStore) -> Option<Self> {
        let access_token = store.lookup(ACCESS_TOKEN_KEY)?;
        Some(Self {
            access_token,
            refresh_token: store.lookup(REFRESH_TOKEN_KEY),
        })
    }

    /// Renders the pair as `KEY=value` lines ready to paste into a `.env` file.
    pub fn env_lines(&self) -> String {
        format!(
            "{}={}\n{}={}",
            ACCESS_TOKEN_KEY,
            self.access_token,
            REFRESH_TOKEN_KEY,
            self.refresh_token.as_deref().unwrap_or_default()
        )
    }
}
