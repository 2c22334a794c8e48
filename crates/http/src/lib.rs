//! Foodshare HTTP layer
//!
//! With the `server` feature this crate provides the browser-facing proxy
//! routes, the page route guard and the request tracing middleware. With the
//! `client` feature it provides a typed client for that same proxy surface.

#[macro_use]
extern crate tracing;

pub mod cookies;
pub mod error;
pub mod types;

#[cfg(feature = "server")]
pub mod forwarding;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod state;

#[cfg(feature = "client")]
pub mod client;

pub use error::{HttpError, Result};

#[cfg(feature = "server")]
pub use forwarding::{UpstreamClient, UpstreamConfig};
#[cfg(feature = "server")]
pub use middleware::guard::{GuardConfig, GuardDecision, RouteGuard};
#[cfg(feature = "server")]
pub use state::AppState;

#[cfg(feature = "server")]
pub use utoipa::OpenApi;
