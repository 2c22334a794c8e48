//! Session API client methods

use super::{ClientError, FoodshareClient};
use crate::types::{LoginRequest, RegisterRequest};
use foodshare_core::User;
use serde_json::Value as JsonValue;
use tracing::instrument;

impl FoodshareClient {
    /// Sign in; the session cookies land in the client's jar
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<JsonValue, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/auth/login")
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });
        self.execute(req).await
    }

    /// Create an account
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    pub async fn register(&self, request: &RegisterRequest) -> Result<JsonValue, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/auth/register")
            .json(request);
        self.execute(req).await
    }

    /// Rotate the session cookies
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    pub async fn refresh(&self) -> Result<JsonValue, ClientError> {
        let req = self.request(reqwest::Method::POST, "/api/auth/refresh");
        self.execute(req).await
    }

    /// Fetch the signed-in user
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    pub async fn me(&self) -> Result<User, ClientError> {
        let req = self.request(reqwest::Method::GET, "/api/auth/me");
        self.execute(req).await
    }

    /// Invalidate the session upstream
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    pub async fn logout(&self) -> Result<JsonValue, ClientError> {
        let req = self.request(reqwest::Method::POST, "/api/auth/logout");
        self.execute(req).await
    }
}
