use thiserror::Error;

use crate::domain::error::ValidationError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures reported by the marketplace backend.
///
/// Transport failures, non-2xx responses and `success: false` envelopes all
/// end up here (or in [`Error::Http`]) and are treated as one recoverable
/// class by callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("{message}")]
    Rejected { message: String },

    #[error("not signed in")]
    Unauthorized,

    #[error("response carried no data")]
    MissingData,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("session storage error: {0}")]
    Session(String),
}

impl Error {
    /// Human-readable text suitable for inline display or a notification.
    ///
    /// Strips the transport prefixes so views show the backend's own message
    /// where one was available.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Error::Api(err) => err.to_string(),
            Error::Validation(err) => err.to_string(),
            Error::Http(err) if err.is_timeout() => "The request timed out".to_string(),
            Error::Http(err) if err.is_connect() => "Could not reach the server".to_string(),
            other => other.to_string(),
        }
    }

    /// True when the failure means the stored credentials are no longer valid.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Api(ApiError::Unauthorized) | Error::Api(ApiError::Status { status: 401, .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
