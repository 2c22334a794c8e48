//! Server setup and configuration module

use crate::config::Settings;
use crate::error::Result;
use axum::http::{HeaderValue, Method, header};
use foodshare_http::{
    AppState, RouteGuard, UpstreamClient,
    middleware::{guard_middleware, trace_middleware},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as _};

/// Assembles the gateway from its settings
pub struct ServerBuilder {
    settings: Settings,
}

impl ServerBuilder {
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the shared handler state
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be created.
    pub fn build_app_state(&self) -> Result<AppState> {
        info!(upstream = %self.settings.upstream.base_url, "Configuring upstream");
        let upstream = UpstreamClient::new(&self.settings.upstream)?;
        let guard = RouteGuard::new(self.settings.guard.clone());
        Ok(AppState::new(upstream, guard))
    }

    /// Build the documented proxy router
    #[must_use]
    pub fn build_router() -> OpenApiRouter<AppState> {
        foodshare_http::routes::router()
    }

    /// Build the complete axum router with documentation, pages and
    /// middleware
    pub fn build_axum_router(
        router: OpenApiRouter<AppState>,
        state: AppState,
        static_dir: Option<&str>,
        cors_origins: &[String],
    ) -> axum::Router {
        let (router, api) = router.split_for_parts();

        // Docs at /docs/
        let mut router = router.merge(Scalar::with_url("/docs/", api));

        if let Some(static_dir) = static_dir {
            let static_path = Path::new(static_dir);
            if static_path.is_dir() {
                info!("Serving pages from: {}", static_dir);
                let index_path = static_path.join("index.html");
                debug!("Index file exists: {}", index_path.exists());

                let serve_dir = ServeDir::new(static_path)
                    .append_index_html_on_directories(true)
                    .fallback(ServeFile::new(index_path));
                router = router.fallback_service(serve_dir);
            } else {
                warn!(
                    "Static directory '{}' does not exist, skipping page serving",
                    static_dir
                );
            }
        }

        let guard: Arc<RouteGuard> = state.guard.clone();

        router
            .with_state(state)
            // Pages are gated before anything is served
            .layer(axum::middleware::from_fn_with_state(guard, guard_middleware))
            .layer(axum::middleware::from_fn(trace_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors_origins))
    }

    /// Build the finished router for these settings
    ///
    /// # Errors
    ///
    /// Returns an error if the shared state cannot be built.
    pub fn build(&self) -> Result<axum::Router> {
        let state = self.build_app_state()?;
        Ok(Self::build_axum_router(
            Self::build_router(),
            state,
            self.settings.server.static_dir.as_deref(),
            &self.settings.server.cors_origins,
        ))
    }
}

/// Cross-origin access for the configured browser origins
///
/// Credentials are allowed so the session cookies travel with proxy calls.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds_without_panic() {
        let builder = ServerBuilder::new(Settings::default());
        let _router = builder.build().unwrap();
    }

    #[test]
    fn test_router_documents_every_proxy_route() {
        let (_, api) = ServerBuilder::build_router().split_for_parts();
        let paths: Vec<_> = api.paths.paths.keys().cloned().collect();
        for path in [
            "/api/auth/login",
            "/api/auth/register",
            "/api/auth/refresh",
            "/api/auth/me",
            "/api/auth/logout",
            "/api/donations",
            "/api/donations/{id}",
            "/api/donations/{id}/claim",
            "/health",
        ] {
            assert!(paths.iter().any(|p| p == path), "{path} missing");
        }
    }

    #[test]
    fn test_post_routes_document_their_body() {
        let (_, api) = ServerBuilder::build_router().split_for_parts();
        for path in [
            "/api/auth/login",
            "/api/auth/register",
            "/api/auth/refresh",
            "/api/auth/logout",
            "/api/donations",
            "/api/donations/{id}/claim",
        ] {
            let post = api.paths.paths[path].post.as_ref();
            assert!(
                post.is_some_and(|op| op.request_body.is_some()),
                "{path} has no documented body"
            );
        }
    }

    #[test]
    fn test_missing_static_dir_is_skipped() {
        let builder = ServerBuilder::new(Settings::default());
        let state = builder.build_app_state().unwrap();
        let _router = ServerBuilder::build_axum_router(
            ServerBuilder::build_router(),
            state,
            Some("/nonexistent/pages"),
            &["http://localhost:3000".to_string()],
        );
    }
}
