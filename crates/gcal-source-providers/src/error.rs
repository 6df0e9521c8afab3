//! Error types for sourcing operations.
//!
//! Every fatal condition of a run is a [`ProviderError`]. The
//! [`ProviderErrorCode`] says which kind of failure it was; the message is
//! what the operator sees.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Missing or invalid configuration, e.g. no client ID/secret.
    ConfigurationError,
    /// No access token is stored; the operator must visit the authorization URL.
    AuthorizationRequired,
    /// Google rejected the access token or the authorization code.
    AuthenticationFailed,
    /// The requested calendar does not exist or is not visible.
    NotFound,
    /// Any other non-success response from Google.
    UpstreamError,
    /// Connection failure, timeout, DNS resolution, etc.
    NetworkError,
    /// The response body could not be parsed.
    InvalidResponse,
    /// The calendar listing came back empty.
    EmptyResult,
    /// Node mapping or emission failed.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns true for failures caused by the calendar API or its transport.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed
                | Self::NotFound
                | Self::UpstreamError
                | Self::NetworkError
                | Self::InvalidResponse
        )
    }

    /// Returns true if fixing the failure requires an operator action
    /// (editing configuration or completing the authorization flow).
    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError | Self::AuthorizationRequired | Self::AuthenticationFailed
        )
    }

    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration_error",
            Self::AuthorizationRequired => "authorization_required",
            Self::AuthenticationFailed => "authentication_failed",
            Self::NotFound => "not_found",
            Self::UpstreamError => "upstream_error",
            Self::NetworkError => "network_error",
            Self::InvalidResponse => "invalid_response",
            Self::EmptyResult => "empty_result",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fatal error raised while authorizing, fetching or mapping.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Creates an authorization-required error.
    pub fn authorization_required(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthorizationRequired, message)
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    /// Creates an upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::UpstreamError, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates an empty-result error.
    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::EmptyResult, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            // These carry operator instructions; print them untouched.
            ProviderErrorCode::ConfigurationError | ProviderErrorCode::AuthorizationRequired => {
                write!(f, "{}", self.message)
            }
            _ => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl From<gcal_source_core::NodeError> for ProviderError {
    fn from(err: gcal_source_core::NodeError) -> Self {
        Self::internal(err.to_string()).with_source(err)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_codes() {
        assert!(ProviderErrorCode::NetworkError.is_upstream());
        assert!(ProviderErrorCode::UpstreamError.is_upstream());
        assert!(ProviderErrorCode::NotFound.is_upstream());
        assert!(!ProviderErrorCode::EmptyResult.is_upstream());
        assert!(!ProviderErrorCode::ConfigurationError.is_upstream());
    }

    #[test]
    fn actionable_codes() {
        assert!(ProviderErrorCode::ConfigurationError.is_actionable());
        assert!(ProviderErrorCode::AuthorizationRequired.is_actionable());
        assert!(!ProviderErrorCode::NetworkError.is_actionable());
        assert!(!ProviderErrorCode::EmptyResult.is_actionable());
    }

    #[test]
    fn error_code_names() {
        assert_eq!(
            ProviderErrorCode::AuthorizationRequired.as_str(),
            "authorization_required"
        );
        assert_eq!(ProviderErrorCode::EmptyResult.to_string(), "empty_result");
    }

    #[test]
    fn instruction_errors_display_message_only() {
        let err = ProviderError::authorization_required("Authorize this app by visiting this url");
        assert_eq!(err.to_string(), "Authorize this app by visiting this url");
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationRequired);
    }

    #[test]
    fn other_errors_display_code_prefix() {
        let err = ProviderError::empty_result("no calendars found");
        assert_eq!(err.to_string(), "empty_result: no calendars found");
        assert_eq!(err.message(), "no calendars found");
    }

    #[test]
    fn node_errors_convert_to_internal() {
        use std::error::Error;
        let node_err = gcal_source_core::NodeError::NotAnObject {
            node_type: "Calendar".into(),
        };
        let err: ProviderError = node_err.into();
        assert_eq!(err.code(), ProviderErrorCode::InternalError);
        assert!(err.source().is_some());
    }
}
