//! Session proxy routes

use super::rejecting_other_methods;
use crate::error::HttpError;
use crate::forwarding::UpstreamReply;
use crate::state::AppState;
use crate::types::{DetailResponse, LoginRequest, MessageResponse, RegisterRequest};
use axum::{
    extract::State,
    http::{HeaderMap, Method},
};
use bytes::Bytes;
use serde_json::Value as JsonValue;
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Exchange credentials for session cookies
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookies are set", body = JsonValue),
        (status = 401, description = "Invalid credentials", body = DetailResponse),
        (status = 405, description = "Method not allowed", body = MessageResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "auth"
)]
#[instrument(name = "proxy_login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(Method::POST, "/auth/login", &headers, body)
        .await
}

/// Create an account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = JsonValue),
        (status = 400, description = "Rejected by the backend", body = DetailResponse),
        (status = 405, description = "Method not allowed", body = MessageResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "auth"
)]
#[instrument(name = "proxy_register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(Method::POST, "/auth/register", &headers, body)
        .await
}

/// Rotate the access cookie using the refresh cookie
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = JsonValue,
    responses(
        (status = 200, description = "Session refreshed", body = JsonValue),
        (status = 401, description = "Refresh rejected", body = DetailResponse),
        (status = 405, description = "Method not allowed", body = MessageResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "auth"
)]
#[instrument(name = "proxy_refresh", skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(Method::POST, "/auth/refresh", &headers, body)
        .await
}

/// Current user for the session cookie
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Signed-in user", body = JsonValue),
        (status = 401, description = "Not signed in", body = DetailResponse),
        (status = 405, description = "Method not allowed", body = MessageResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "auth"
)]
#[instrument(name = "proxy_me", skip_all)]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(Method::GET, "/auth/me", &headers, Bytes::new())
        .await
}

/// Invalidate the session upstream
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = JsonValue,
    responses(
        (status = 200, description = "Signed out; session cookies are cleared", body = JsonValue),
        (status = 405, description = "Method not allowed", body = MessageResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "auth"
)]
#[instrument(name = "proxy_logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(Method::POST, "/auth/logout", &headers, body)
        .await
}

pub fn add_routes(router: OpenApiRouter<AppState>) -> OpenApiRouter<AppState> {
    router
        .routes(rejecting_other_methods(routes!(login)))
        .routes(rejecting_other_methods(routes!(register)))
        .routes(rejecting_other_methods(routes!(refresh)))
        .routes(rejecting_other_methods(routes!(me)))
        .routes(rejecting_other_methods(routes!(logout)))
}
