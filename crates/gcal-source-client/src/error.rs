//! Client error types.

use std::path::PathBuf;

use gcal_source_core::TracingError;
use gcal_source_providers::ProviderError;
use gcal_source_server::ServerError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A `.env` file exists but could not be loaded.
    #[error("failed to load {}: {message}", path.display())]
    EnvFile { path: PathBuf, message: String },

    /// Authorization, fetch or mapping failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Callback endpoint failure.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Logging could not be set up.
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// Nodes could not be serialized.
    #[error("failed to write nodes: {0}")]
    Output(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_messages_pass_through() {
        let err: ClientError = ProviderError::authorization_required("Authorize this app").into();
        assert_eq!(err.to_string(), "Authorize this app");

        let err: ClientError = ProviderError::not_found("calendar x not found").into();
        assert!(err.to_string().ends_with("calendar x not found"));
    }

    #[test]
    fn tracing_setup_failure_is_a_client_error() {
        let err = gcal_source_core::init_tracing(
            gcal_source_core::TracingConfig::default().with_env_filter("gcal_source=loud"),
        )
        .unwrap_err();

        let err: ClientError = err.into();
        assert!(matches!(err, ClientError::Tracing(TracingError::EnvFilter(_))));
        assert!(err.to_string().starts_with("failed to parse env filter"));
    }

    #[test]
    fn env_file_error_names_the_file() {
        let err = ClientError::EnvFile {
            path: PathBuf::from(".env.test"),
            message: "line 3".into(),
        };
        assert_eq!(err.to_string(), "failed to load .env.test: line 3");
    }
}
