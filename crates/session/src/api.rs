//! Gateway operations the session layer depends on

use async_trait::async_trait;
use foodshare_core::{Donation, NewDonation, User};
use foodshare_http::client::{FoodshareClient, error::ClientError};

/// The slice of the proxy surface used by the session layer
#[async_trait]
pub trait FoodshareApi: Send + Sync {
    /// `GET /api/auth/me`
    async fn me(&self) -> Result<User, ClientError>;
    /// `POST /api/auth/refresh`
    async fn refresh(&self) -> Result<(), ClientError>;
    /// `POST /api/auth/login`
    async fn login(&self, email: &str, password: &str) -> Result<(), ClientError>;
    /// `POST /api/auth/logout`
    async fn logout(&self) -> Result<(), ClientError>;
    /// `GET /api/donations`
    async fn list_donations(&self) -> Result<Vec<Donation>, ClientError>;
    /// `POST /api/donations`
    async fn create_donation(&self, donation: &NewDonation) -> Result<Donation, ClientError>;
    /// `POST /api/donations/{id}/claim`
    async fn claim_donation(&self, id: i64) -> Result<(), ClientError>;
}

#[async_trait]
impl FoodshareApi for FoodshareClient {
    async fn me(&self) -> Result<User, ClientError> {
        Self::me(self).await
    }

    async fn refresh(&self) -> Result<(), ClientError> {
        Self::refresh(self).await.map(drop)
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        Self::login(self, email, password).await.map(drop)
    }

    async fn logout(&self) -> Result<(), ClientError> {
        Self::logout(self).await.map(drop)
    }

    async fn list_donations(&self) -> Result<Vec<Donation>, ClientError> {
        Self::list_donations(self).await
    }

    async fn create_donation(&self, donation: &NewDonation) -> Result<Donation, ClientError> {
        Self::create_donation(self, donation).await
    }

    async fn claim_donation(&self, id: i64) -> Result<(), ClientError> {
        Self::claim_donation(self, id).await.map(drop)
    }
}
