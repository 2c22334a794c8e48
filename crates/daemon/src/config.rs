//! Configuration management for the Foodshare daemon
//!
//! Layers, lowest precedence first: built-in defaults, an optional config
//! file, `FOODSHARE__SECTION__KEY` environment variables, and finally
//! `BACKEND_URL` for the upstream address.

use config::{Config, ConfigError, Environment, File};
use foodshare_http::{GuardConfig, UpstreamConfig};
use serde::{Deserialize, Serialize};

/// Environment variable naming the upstream backend
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Main daemon settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub guard: GuardConfig,
    /// Level filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built pages; nothing is served when unset
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Browser origins allowed to call the proxy with credentials
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            guard: GuardConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from the environment and an optional file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong
    /// type.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_with_backend(path, std::env::var(BACKEND_URL_ENV).ok())
    }

    /// Same as [`Settings::load`] with an explicit backend override
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong
    /// type.
    pub fn load_with_backend(
        path: Option<&str>,
        backend_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        builder = builder
            .add_source(
                Environment::with_prefix("FOODSHARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("guard.protected_prefixes")
                    .with_list_parse_key("guard.auth_only_prefixes"),
            )
            .set_override_option("upstream.base_url", backend_url)?;

        builder.build()?.try_deserialize()
    }
}
