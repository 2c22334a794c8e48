//! Donation API client methods

use super::{ClientError, FoodshareClient};
use foodshare_core::{Donation, NewDonation};
use serde_json::Value as JsonValue;
use tracing::instrument;

impl FoodshareClient {
    /// List donations
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    pub async fn list_donations(&self) -> Result<Vec<Donation>, ClientError> {
        let req = self.request(reqwest::Method::GET, "/api/donations");
        self.execute(req).await
    }

    /// Post a new donation
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    #[instrument(skip_all, fields(food_item = %donation.food_item))]
    pub async fn create_donation(&self, donation: &NewDonation) -> Result<Donation, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/donations")
            .json(donation);
        self.execute(req).await
    }

    /// Fetch one donation
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    pub async fn get_donation(&self, id: i64) -> Result<Donation, ClientError> {
        let req = self.request(reqwest::Method::GET, &format!("/api/donations/{id}"));
        self.execute(req).await
    }

    /// Claim a donation
    ///
    /// Any JSON success body is accepted; the backend answers with a status
    /// message rather than the donation.
    ///
    /// # Errors
    ///
    /// Returns the proxy's rejection or a transport failure.
    #[instrument(skip(self))]
    pub async fn claim_donation(&self, id: i64) -> Result<JsonValue, ClientError> {
        let req = self.request(reqwest::Method::POST, &format!("/api/donations/{id}/claim"));
        self.execute(req).await
    }
}
