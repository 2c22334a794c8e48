//! Application state management

use crate::forwarding::UpstreamClient;
use crate::middleware::guard::RouteGuard;
use std::sync::Arc;

/// Shared application state
///
/// Handlers only read from it, so every request sees the same upstream
/// client and guard rules.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Pooled client for the upstream backend
    pub upstream: Arc<UpstreamClient>,
    /// Page access rules
    pub guard: Arc<RouteGuard>,
}

impl AppState {
    /// Create a new AppState with the given components
    pub fn new(upstream: UpstreamClient, guard: RouteGuard) -> Self {
        Self {
            upstream: Arc::new(upstream),
            guard: Arc::new(guard),
        }
    }
}
