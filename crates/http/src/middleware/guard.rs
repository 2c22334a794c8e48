//! Page route guard
//!
//! Gates navigation to pages by the mere presence of the access-token
//! cookie. Token validity is never checked here; the upstream rejects stale
//! credentials and the session layer reacts to that.

use crate::cookies::has_access_token;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Path prefixes never inspected by the guard
const EXCLUDED_PREFIXES: &[&str] = &[
    "/api",
    "/_next/static",
    "/_next/image",
    "/static",
    "/favicon.ico",
    "/health",
    "/docs",
];

/// Image extensions never inspected by the guard
const EXCLUDED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg"];

/// Which pages require a session and which require its absence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Pages that need the access cookie
    pub protected_prefixes: Vec<String>,
    /// Pages only useful without a session, such as login
    pub auth_only_prefixes: Vec<String>,
    /// Where unauthenticated visitors are sent
    pub login_path: String,
    /// Where authenticated visitors of auth-only pages are sent
    pub dashboard_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec![
                "/dashboard".to_string(),
                "/donate".to_string(),
                "/browse".to_string(),
            ],
            auth_only_prefixes: vec!["/login".to_string(), "/register".to_string()],
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
        }
    }
}

/// Outcome of evaluating one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Asset or API path the guard does not look at
    Excluded,
    /// Serve the page
    Allow,
    /// Temporary redirect to the given location
    Redirect(String),
}

/// Pure decision function over path and cookie header
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    config: GuardConfig,
}

impl RouteGuard {
    #[must_use]
    pub const fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Whether the guard skips this path entirely
    #[must_use]
    pub fn is_excluded(path: &str) -> bool {
        EXCLUDED_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
            || EXCLUDED_EXTENSIONS
                .iter()
                .any(|extension| path.ends_with(extension))
    }

    fn matches_any(prefixes: &[String], path: &str) -> bool {
        prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn login_redirect(&self, path: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect", path)
            .finish();
        format!("{}?{query}", self.config.login_path)
    }

    /// Decide what to do with a page request
    #[must_use]
    pub fn evaluate(&self, path: &str, cookie_header: Option<&str>) -> GuardDecision {
        if Self::is_excluded(path) {
            return GuardDecision::Excluded;
        }

        let authenticated = has_access_token(cookie_header);

        if !authenticated && Self::matches_any(&self.config.protected_prefixes, path) {
            return GuardDecision::Redirect(self.login_redirect(path));
        }

        if authenticated && Self::matches_any(&self.config.auth_only_prefixes, path) {
            return GuardDecision::Redirect(self.config.dashboard_path.clone());
        }

        GuardDecision::Allow
    }
}

/// Middleware applying the [`RouteGuard`] before a page is served
pub async fn guard_middleware(
    State(guard): State<Arc<RouteGuard>>,
    req: Request,
    next: Next,
) -> Response {
    let cookie_header = req
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    let cookie_header = (!cookie_header.is_empty()).then_some(cookie_header.as_str());

    match guard.evaluate(req.uri().path(), cookie_header) {
        GuardDecision::Redirect(location) => {
            debug!(path = %req.uri().path(), %location, "Redirecting page request");
            Redirect::temporary(&location).into_response()
        }
        GuardDecision::Excluded | GuardDecision::Allow => next.run(req).await,
    }
}
