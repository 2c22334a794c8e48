//! Foodshare daemon
//!
//! Serves the built pages behind the route guard and mounts the proxy
//! routes that forward browser calls to the backend.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod server;

pub use config::{ServerConfig, Settings};
pub use error::{DaemonError, Result};
pub use server::ServerBuilder;
