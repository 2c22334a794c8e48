//! Request tracing middleware

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;

/// Middleware function for request tracing
///
/// Runs the request inside an `http_request` span and records the final
/// status code on it.
pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.path = %path,
        http.status_code = tracing::field::Empty,
    );

    async move {
        debug!("Processing request");
        let response = next.run(req).await;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());
        if status.is_server_error() {
            warn!(status = status.as_u16(), "Request failed");
        } else {
            debug!(status = status.as_u16(), "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}
