//! Error types for olympia-client.

use thiserror::Error;

use crate::client::OlympiaBuilderError;

/// Result type alias for olympia-client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for the olympia-client library.
///
/// Transport failures are classified by their originating cause so callers
/// can pattern-match on the outcome of a call instead of inspecting
/// the underlying [`reqwest::Error`].
#[derive(Debug, Error)]
pub enum Error {
    /// The host could not be reached.
    #[error("Failed to connect: {0}")]
    ConnectionFailure(#[source] reqwest::Error),

    /// The request did not complete in time.
    #[error("Request timed out: {0}")]
    TimeoutFailure(#[source] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("HTTP error occurred: status {status}")]
    RequestRejected {
        /// HTTP status code returned by the API.
        status: u16,
        /// Response body, when it could be read.
        body: Option<String>,
    },

    /// Any other transport-layer failure.
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Local input validation failed before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid configuration at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An expected field is absent from a response payload.
    #[error("Missing field '{field}' in response")]
    MissingField {
        /// Name of the absent field.
        field: String,
    },
}

impl Error {
    /// Create a validation error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Classifies a transport error by its originating cause.
    ///
    /// Connection errors are checked first: a host that cannot be reached
    /// within the connect timeout is a connection failure, not a timeout.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::ConnectionFailure(err)
        } else if err.is_timeout() {
            Self::TimeoutFailure(err)
        } else {
            Self::Request(err)
        }
    }

    /// Returns true if the failure happened during the network exchange.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailure(_)
                | Self::TimeoutFailure(_)
                | Self::RequestRejected { .. }
                | Self::Request(_)
        )
    }

    /// Returns the HTTP status of a rejected request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<OlympiaBuilderError> for Error {
    fn from(err: OlympiaBuilderError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_status() {
        let error = Error::RequestRejected {
            status: 400,
            body: Some("{\"error\":\"bad\"}".to_string()),
        };

        assert_eq!(error.status(), Some(400));
        assert!(error.is_transport());
        assert_eq!(error.to_string(), "HTTP error occurred: status 400");
    }

    #[test]
    fn test_local_errors_are_not_transport() {
        assert!(!Error::invalid_input("empty").is_transport());
        assert!(!Error::invalid_config("no token").is_transport());
        assert!(!Error::missing_field("modèles").is_transport());
        assert_eq!(Error::invalid_input("empty").status(), None);
    }

    #[test]
    fn test_missing_field_display() {
        let error = Error::missing_field("modèles");
        assert_eq!(error.to_string(), "Missing field 'modèles' in response");
    }

    #[test]
    fn test_builder_error_is_configuration() {
        let error: Error = OlympiaBuilderError::ValidationError("bad".to_string()).into();
        assert!(matches!(error, Error::Configuration(message) if message.contains("bad")));
    }
}
