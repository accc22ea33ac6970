//! Error types for upstream API access.

use thiserror::Error;

/// Errors raised while talking to the upstream platform.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Token acquisition failed. Fatal for the whole run.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A listing or download request returned a non-success status.
    #[error("{resource} request failed with status {status}: {body}")]
    Status {
        /// Resource that was requested (e.g. "employees").
        resource: String,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// Network-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Client could not be configured.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Returns a user-friendly error message suitable for terminal output.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Auth(_) => "Could not obtain an access token. Check domain, client id and secret.",
            Self::Status { .. } => "The API rejected the request.",
            Self::Network(_) => "Could not reach the API. Check the domain and your connection.",
            Self::JsonParse(_) => "The API returned data in an unexpected format.",
            Self::Config(_) => "The API client could not be configured.",
        }
    }

    /// True when the failure means the run cannot continue at all.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Config(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = ApiError::Auth("401".to_string());
        assert!(err.user_message().contains("access token"));

        let err = ApiError::Network("dns".to_string());
        assert!(err.user_message().contains("connection"));
    }

    #[test]
    fn test_fatal() {
        assert!(ApiError::Auth("denied".to_string()).is_fatal());
        assert!(
            !ApiError::Status {
                resource: "lists".to_string(),
                status: 500,
                body: String::new(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            resource: "employees".to_string(),
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "employees request failed with status 403: forbidden"
        );
    }
}
