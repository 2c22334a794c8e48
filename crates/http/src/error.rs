//! HTTP error types and implementations

#[cfg(feature = "server")]
use crate::types::{DetailResponse, MessageResponse};
#[cfg(feature = "server")]
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Fixed body text for any proxy failure on our side of the upstream call
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Fixed body text for unsupported methods on proxy routes
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// HTTP-specific errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// The proxy route does not support the request method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The upstream call failed at the transport level or returned an
    /// unreadable body
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

#[cfg(feature = "server")]
impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(MessageResponse {
                    message: METHOD_NOT_ALLOWED.to_string(),
                }),
            )
                .into_response(),
            Self::Upstream(_) | Self::InternalServerError(_) => {
                error!(error = %self, "Proxy request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(DetailResponse {
                        detail: INTERNAL_SERVER_ERROR.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias using HttpError
pub type Result<T> = std::result::Result<T, HttpError>;
