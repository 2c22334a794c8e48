//! API route definitions
//!
//! Every proxy route answers unsupported methods with 405 and a fixed
//! message body instead of axum's empty default.

use crate::error::HttpError;
use crate::state::AppState;
use utoipa::OpenApi;
use utoipa_axum::router::{OpenApiRouter, UtoipaMethodRouter};

pub mod auth;
pub mod donations;
pub mod health;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foodshare gateway",
        description = "Browser-facing proxy for the Foodshare backend"
    ),
    components(schemas(
        crate::types::LoginRequest,
        crate::types::RegisterRequest,
        crate::types::MessageResponse,
        crate::types::DetailResponse,
    )),
    tags(
        (name = "auth", description = "Session endpoints proxied to the backend"),
        (name = "donations", description = "Donation listing endpoints proxied to the backend"),
        (name = "health", description = "Gateway liveness"),
    ),
)]
pub struct ApiDoc;

/// Handler for any method a proxy route does not support
pub async fn method_not_allowed() -> HttpError {
    HttpError::MethodNotAllowed
}

/// Attach the 405 fallback to a documented method router
pub(crate) fn rejecting_other_methods(
    routes: UtoipaMethodRouter<AppState>,
) -> UtoipaMethodRouter<AppState> {
    let (schemas, paths, method_router) = routes;
    (schemas, paths, method_router.fallback(method_not_allowed))
}

/// Build the documented router holding every gateway route
pub fn router() -> OpenApiRouter<AppState> {
    let router = OpenApiRouter::with_openapi(ApiDoc::openapi());
    let router = health::add_routes(router);
    let router = auth::add_routes(router);
    donations::add_routes(router)
}
