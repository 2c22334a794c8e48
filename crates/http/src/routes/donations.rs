//! Donation proxy routes

use super::rejecting_other_methods;
use crate::error::HttpError;
use crate::forwarding::UpstreamReply;
use crate::state::AppState;
use crate::types::{DetailResponse, MessageResponse};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method},
};
use bytes::Bytes;
use serde_json::Value as JsonValue;
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

/// List donations visible to the signed-in user
#[utoipa::path(
    get,
    path = "/api/donations",
    responses(
        (status = 200, description = "Donation list", body = JsonValue),
        (status = 401, description = "Not signed in", body = DetailResponse),
        (status = 405, description = "Method not allowed", body = MessageResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "donations"
)]
#[instrument(name = "proxy_list_donations", skip_all)]
pub async fn list_donations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(Method::GET, "/donations/", &headers, Bytes::new())
        .await
}

/// Post a new donation
#[utoipa::path(
    post,
    path = "/api/donations",
    request_body = JsonValue,
    responses(
        (status = 201, description = "Donation created", body = JsonValue),
        (status = 401, description = "Not signed in", body = DetailResponse),
        (status = 422, description = "Validation failed", body = DetailResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "donations"
)]
#[instrument(name = "proxy_create_donation", skip_all)]
pub async fn create_donation(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(Method::POST, "/donations/", &headers, body)
        .await
}

/// Fetch one donation
#[utoipa::path(
    get,
    path = "/api/donations/{id}",
    params(("id" = i64, Path, description = "Donation identifier")),
    responses(
        (status = 200, description = "Donation", body = JsonValue),
        (status = 404, description = "No such donation", body = DetailResponse),
        (status = 405, description = "Method not allowed", body = MessageResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "donations"
)]
#[instrument(name = "proxy_get_donation", skip(state, headers))]
pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(Method::GET, &format!("/donations/{id}"), &headers, Bytes::new())
        .await
}

/// Claim an available donation
#[utoipa::path(
    post,
    path = "/api/donations/{id}/claim",
    params(("id" = i64, Path, description = "Donation identifier")),
    request_body = JsonValue,
    responses(
        (status = 200, description = "Donation claimed", body = JsonValue),
        (status = 400, description = "Not claimable", body = DetailResponse),
        (status = 401, description = "Not signed in", body = DetailResponse),
        (status = 405, description = "Method not allowed", body = MessageResponse),
        (status = 500, description = "Upstream unreachable", body = DetailResponse)
    ),
    tag = "donations"
)]
#[instrument(name = "proxy_claim_donation", skip(state, headers, body))]
pub async fn claim_donation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<UpstreamReply, HttpError> {
    state
        .upstream
        .forward(
            Method::POST,
            &format!("/donations/{id}/claim"),
            &headers,
            body,
        )
        .await
}

pub fn add_routes(router: OpenApiRouter<AppState>) -> OpenApiRouter<AppState> {
    router
        .routes(rejecting_other_methods(routes!(
            list_donations,
            create_donation
        )))
        .routes(rejecting_other_methods(routes!(get_donation)))
        .routes(rejecting_other_methods(routes!(claim_donation)))
}
