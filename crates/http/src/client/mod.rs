//! Typed client for the Foodshare proxy surface
//!
//! Keeps a cookie jar so the session cookies set by `/api/auth/login` and
//! `/api/auth/refresh` ride along on every later request, the way a browser
//! would send them.

pub mod auth;
pub mod donations;
pub mod error;

use error::ClientError;
use foodshare_core::detail::error_message;
use reqwest::{Client, ClientBuilder};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Foodshare proxy client
#[derive(Clone, Debug)]
pub struct FoodshareClient {
    client: Client,
    base_url: String,
}

impl FoodshareClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    #[must_use]
    pub fn builder() -> FoodshareClientBuilder {
        FoodshareClientBuilder::default()
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder for a proxy path
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and decode a JSON success body
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] for a non-success status and
    /// [`ClientError::Request`] when the request or body decoding fails.
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body: JsonValue = response.json().await.unwrap_or(JsonValue::Null);
            let detail = error_message(&body);
            debug!(status = status.as_u16(), ?detail, "Proxy rejected request");
            Err(ClientError::from_status(status, detail))
        }
    }
}

/// Builder for FoodshareClient
#[derive(Default)]
pub struct FoodshareClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl FoodshareClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was given or the HTTP client cannot be
    /// built.
    pub fn build(self) -> Result<FoodshareClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new().cookie_store(true);

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| format!("foodshare-client/{}", env!("CARGO_PKG_VERSION"))),
        );

        let client = client_builder.build()?;

        Ok(FoodshareClient { client, base_url })
    }
}
