//! Client configuration.
//!
//! Non-secret settings live in a single `config.toml` file at
//! `~/.config/gcal-source/config.toml` by default. Client credentials and
//! tokens never go here; they come from the environment or `.env` files.
//!
//! ```toml
//! [source]
//! calendar_ids = ["primary", "team@example.com"]
//! node_namespace = "gcal-source"
//!
//! [source.options]
//! singleEvents = true
//! orderBy = "startTime"
//!
//! [google]
//! redirect_uri = "http://localhost:8000/oAuthCallback"
//!
//! [server]
//! bind = "127.0.0.1:8000"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use gcal_source_core::{DEFAULT_NODE_NAMESPACE, NodeIdFactory};
use gcal_source_providers::google::GoogleConfig;
use gcal_source_providers::{EventQuery, SourceOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{ClientError, ClientResult};

/// Event option set by `--from-now`.
pub const TIME_MIN_OPTION: &str = "timeMin";

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the gcal-source client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// What to source.
    pub source: SourceSettings,

    /// Google OAuth and API settings.
    pub google: GoogleSettings,

    /// Callback endpoint settings.
    pub server: ServerSettings,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it is absent.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gcal-source")
    }
}

// ---------------------------------------------------------------------------
// SourceSettings
// ---------------------------------------------------------------------------

/// What a source run fetches and how nodes are identified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// A single calendar to source.
    pub calendar_id: Option<String>,

    /// Calendars to source. Merged after `calendar_id`.
    pub calendar_ids: Vec<String>,

    /// Options forwarded verbatim to every events listing.
    pub options: Map<String, Value>,

    /// Namespace for node ID derivation.
    pub node_namespace: Option<String>,
}

impl SourceSettings {
    /// The configured calendars, single ID first, duplicates and blanks
    /// removed. `None` means every calendar of the user.
    pub fn calendar_ids(&self) -> Option<Vec<String>> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.calendar_id.iter().chain(self.calendar_ids.iter()) {
            let id = id.trim();
            if !id.is_empty() && !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
        (!ids.is_empty()).then_some(ids)
    }

    /// Node ID factory for the configured namespace.
    pub fn node_id_factory(&self) -> NodeIdFactory {
        NodeIdFactory::new(
            self.node_namespace
                .as_deref()
                .unwrap_or(DEFAULT_NODE_NAMESPACE),
        )
    }

    /// Builds the run options.
    ///
    /// With `now`, `timeMin` defaults to that instant unless already set.
    pub fn to_source_options(&self, now: Option<DateTime<Utc>>) -> SourceOptions {
        let mut query = EventQuery::from_options(self.options.clone());
        if let Some(now) = now {
            if query.get(TIME_MIN_OPTION).is_some() {
                warn!("--from-now ignored; options.timeMin is set");
            }
            query.set_default(
                TIME_MIN_OPTION,
                now.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }

        let mut options = SourceOptions::new().with_event_query(query);
        if let Some(ids) = self.calendar_ids() {
            options = options.with_calendar_ids(ids);
        }
        options
    }
}

// ---------------------------------------------------------------------------
// GoogleSettings
// ---------------------------------------------------------------------------

/// Overrides for the Google OAuth and API clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Redirect URI registered for the OAuth client.
    pub redirect_uri: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Calendar API base URL.
    pub api_base_url: Option<String>,
}

impl GoogleSettings {
    /// Converts to provider configuration.
    pub fn to_provider_config(&self) -> ClientResult<GoogleConfig> {
        let mut config = GoogleConfig::new();

        if let Some(ref uri) = self.redirect_uri {
            config = config.with_redirect_uri(uri);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(ref url) = self.api_base_url {
            config = config.with_api_base_url(url);
        }

        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// ServerSettings
// ---------------------------------------------------------------------------

/// Callback endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address. Defaults to loopback on the redirect URI port.
    pub bind: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;
    use gcal_source_providers::ProviderErrorCode;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.source.calendar_ids(), None);
        assert!(config.source.options.is_empty());
        assert!(config.server.bind.is_none());
        assert_eq!(
            config.google.to_provider_config().unwrap().redirect_uri,
            GoogleConfig::DEFAULT_REDIRECT_URI
        );
    }

    #[test]
    fn full_config_toml() {
        let toml_content = r#"
[source]
calendar_id = "primary"
calendar_ids = ["team@example.com", "primary"]
node_namespace = "my-site"

[source.options]
singleEvents = true
maxResults = 50
orderBy = "startTime"

[google]
redirect_uri = "http://localhost:9000/cb"
timeout_secs = 10

[server]
bind = "0.0.0.0:9000"
"#;
        let config: ClientConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(
            config.source.calendar_ids(),
            Some(vec!["primary".to_string(), "team@example.com".to_string()])
        );
        assert_eq!(config.source.options["singleEvents"], Value::Bool(true));
        assert_eq!(config.source.options["maxResults"], Value::from(50));
        assert_eq!(
            config.source.node_id_factory(),
            NodeIdFactory::new("my-site")
        );

        let google = config.google.to_provider_config().unwrap();
        assert_eq!(google.redirect_uri, "http://localhost:9000/cb");
        assert_eq!(google.timeout, Duration::from_secs(10));

        assert_eq!(config.server.bind, Some("0.0.0.0:9000".parse().unwrap()));
    }

    #[test]
    fn blank_calendar_ids_mean_all_calendars() {
        let settings = SourceSettings {
            calendar_id: Some("  ".into()),
            calendar_ids: vec![String::new()],
            ..Default::default()
        };
        assert_eq!(settings.calendar_ids(), None);
        assert_eq!(settings.to_source_options(None).calendar_ids, None);
    }

    #[test]
    fn from_now_sets_time_min() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let options = SourceSettings::default().to_source_options(Some(now));
        assert_eq!(
            options.event_query.get(TIME_MIN_OPTION),
            Some(&Value::from("2024-03-15T09:30:00Z"))
        );
    }

    #[test]
    fn explicit_time_min_wins_over_from_now() {
        let mut settings = SourceSettings::default();
        settings
            .options
            .insert(TIME_MIN_OPTION.into(), Value::from("2020-01-01T00:00:00Z"));

        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let options = settings.to_source_options(Some(now));
        assert_eq!(
            options.event_query.get(TIME_MIN_OPTION),
            Some(&Value::from("2020-01-01T00:00:00Z"))
        );
    }

    #[test]
    fn invalid_google_settings_are_rejected() {
        let settings = GoogleSettings {
            redirect_uri: Some("not a url".into()),
            ..Default::default()
        };
        match settings.to_provider_config().unwrap_err() {
            ClientError::Provider(e) => {
                assert_eq!(e.code(), ProviderErrorCode::ConfigurationError)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[source]\ncalendar_ids = [\"primary\"]").unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(
            config.source.calendar_ids(),
            Some(vec!["primary".to_string()])
        );
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[source\ncalendar_ids = 3").unwrap();

        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn default_path_ends_with_config_toml() {
        let path = ClientConfig::default_path();
        assert!(path.ends_with("gcal-source/config.toml"));
    }
}
