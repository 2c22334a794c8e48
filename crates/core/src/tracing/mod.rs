//! Tracing setup shared by the Foodshare binaries

pub mod config;
pub mod init;

pub use config::{InstrumentationConfig, LogFormat};
pub use init::init_tracing;
