//! Application error types.
//!
//! Every fallible operation in the gate returns [`AppError`]. Errors are
//! reported once, at the top-level invocation boundary in `main`, as a
//! failure signal carrying the error's display message.

use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required environment value or action input is missing or malformed.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// The triggering event cannot be evaluated (e.g. no pull request data).
    #[error("Unsupported event: {message}")]
    UnsupportedEvent { message: String },

    /// GitHub API request failed.
    #[error("GitHub API error: {message}")]
    GitHubApi {
        message: String,
        status_code: Option<u16>,
        endpoint: Option<String>,
    },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Authentication failed or token invalid.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Lead reviewer configuration file is unreadable or lacks the reviewer list.
    #[error("Invalid reviewer config: {message}")]
    InvalidReviewerConfig {
        message: String,
        path: Option<String>,
    },

    /// Local file I/O failed (event payload, output files).
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
        }
    }

    /// Create a configuration error naming the offending field.
    pub fn configuration_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an unsupported event error.
    pub fn unsupported_event(message: impl Into<String>) -> Self {
        Self::UnsupportedEvent {
            message: message.into(),
        }
    }

    /// Create a GitHub API error.
    pub fn github_api(message: impl Into<String>) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: None,
            endpoint: None,
        }
    }

    /// Create a GitHub API error with status code and endpoint.
    pub fn github_api_full(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a reviewer config error.
    pub fn invalid_reviewer_config(message: impl Into<String>) -> Self {
        Self::InvalidReviewerConfig {
            message: message.into(),
            path: None,
        }
    }

    /// Create a reviewer config error for a specific repository path.
    pub fn invalid_reviewer_config_at(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::InvalidReviewerConfig {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an I/O error for a local file.
    pub fn io(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code, if this error came from an API response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::GitHubApi { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

// Conversions from common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network("Failed to connect to server")
        } else if err.is_status() {
            Self::github_api(format!("HTTP error: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::invalid_reviewer_config(format!("YAML error: {}", err))
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        Self::invalid_reviewer_config(format!("Failed to decode file content: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_api_error_full() {
        let err = AppError::github_api_full("Not Found", 404, "/repos/o/r/pulls/1/reviews");
        assert_eq!(err.status_code(), Some(404));
        match err {
            AppError::GitHubApi { endpoint, .. } => {
                assert_eq!(endpoint.as_deref(), Some("/repos/o/r/pulls/1/reviews"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_configuration_field() {
        let err = AppError::configuration_field("must be a positive integer", "required_approvals");
        match &err {
            AppError::Configuration { field, .. } => {
                assert_eq!(field.as_deref(), Some("required_approvals"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_yaml_error_maps_to_reviewer_config() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{ not: [a list").unwrap_err();
        let err: AppError = yaml_err.into();
        assert!(matches!(err, AppError::InvalidReviewerConfig { .. }));
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::authentication("invalid token");
        assert_eq!(format!("{}", err), "Authentication error: invalid token");

        let err = AppError::unsupported_event("no pull request in payload");
        assert_eq!(
            format!("{}", err),
            "Unsupported event: no pull request in payload"
        );
    }
}
