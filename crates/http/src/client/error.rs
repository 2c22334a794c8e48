//! Client error types

use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure or undecodable response body
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The proxy answered with a non-success status
    #[error("Server error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and the extracted message
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode, detail: Option<String>) -> Self {
        Self::Api {
            status: status.as_u16(),
            detail,
        }
    }

    /// Status code of an upstream rejection
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message carried by an upstream rejection
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Whether the proxy reported a missing or stale session
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Whether the request never produced a usable answer
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Serialization(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let err = ClientError::from_status(
            reqwest::StatusCode::UNAUTHORIZED,
            Some("Not authenticated".to_string()),
        );
        assert!(err.is_unauthorized());
        assert!(!err.is_network());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail(), Some("Not authenticated"));
        assert_eq!(err.to_string(), "Server error 401: Not authenticated");
    }

    #[test]
    fn test_configuration_error_has_no_status() {
        let err = ClientError::Configuration("base_url is required".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.detail(), None);
    }
}
