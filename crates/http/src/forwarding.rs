//! Forwarding of proxy requests to the upstream backend

use crate::error::HttpError;
use axum::{
    Json,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use foodshare_core::detail::collapse_detail;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::Instrument;

/// Backend address used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://backend:8000";

/// Configuration for forwarding requests to the upstream backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL for the upstream API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

/// A decoded upstream response, ready to be relayed to the browser
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: JsonValue,
    /// Every `Set-Cookie` header upstream sent on success, in order
    pub set_cookies: Vec<HeaderValue>,
}

impl UpstreamReply {
    /// Build the reply relayed for an upstream response.
    ///
    /// Successful replies keep their cookies. Failed replies drop them and
    /// have a list-valued `detail` collapsed into a single message.
    #[must_use]
    pub fn relay(status: StatusCode, body: JsonValue, set_cookies: Vec<HeaderValue>) -> Self {
        if status.is_success() {
            return Self {
                status,
                body,
                set_cookies,
            };
        }

        let body = collapse_detail(&body).unwrap_or(body);
        Self {
            status,
            body,
            set_cookies: Vec::new(),
        }
    }
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        let headers = response.headers_mut();
        for cookie in self.set_cookies {
            headers.append(header::SET_COOKIE, cookie);
        }
        response
    }
}

/// Pooled HTTP client bound to one upstream base URL
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
}

impl UpstreamClient {
    /// Create a client for the configured upstream
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                HttpError::InternalServerError(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward a request to `path` on the upstream.
    ///
    /// The incoming `Cookie` header and body are passed through unmodified
    /// and the request is always labelled as JSON. An empty body is not sent.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Upstream`] when the upstream cannot be reached or
    /// its body is not JSON.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamReply, HttpError> {
        let url = format!("{}{}", self.base_url, path);
        let span = info_span!(
            "upstream_request",
            http.method = %method,
            url = %url,
            timeout_seconds = self.timeout_seconds,
            http.status_code = tracing::field::Empty,
        );

        async move {
            let mut request = self
                .client
                .request(method, &url)
                .header(header::CONTENT_TYPE, "application/json");

            for cookie in headers.get_all(header::COOKIE) {
                request = request.header(header::COOKIE, cookie.clone());
            }

            if !body.is_empty() {
                request = request.body(body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| HttpError::Upstream(format!("Failed to forward request: {e}")))?;

            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());

            let set_cookies: Vec<HeaderValue> = response
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .cloned()
                .collect();

            let bytes = response
                .bytes()
                .await
                .map_err(|e| HttpError::Upstream(format!("Failed to read response: {e}")))?;
            let body: JsonValue = serde_json::from_slice(&bytes)
                .map_err(|e| HttpError::Upstream(format!("Failed to parse response: {e}")))?;

            debug!(status = status.as_u16(), cookies = set_cookies.len(), "Upstream replied");

            Ok(UpstreamReply::relay(status, body, set_cookies))
        }
        .instrument(span)
        .await
    }
}
