//! Middleware components for HTTP request processing

pub mod guard;
pub mod trace;

pub use guard::{GuardConfig, GuardDecision, RouteGuard, guard_middleware};
pub use trace::trace_middleware;
