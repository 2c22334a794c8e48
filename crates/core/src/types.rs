use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity returned by the upstream `/auth/me` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: String,
}

/// Lifecycle of a donation listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Available,
    Claimed,
    PickedUp,
    /// Any status string this client does not know about
    #[serde(other)]
    Unknown,
}

impl DonationStatus {
    /// Wire representation of the status
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Claimed => "claimed",
            Self::PickedUp => "picked_up",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posted surplus-food listing as returned by the upstream service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub food_item: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: String,
    pub pickup_location_lat: f64,
    pub pickup_location_lon: f64,
    #[serde(default)]
    pub preferred_pickup_time: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub allergens: Option<Vec<String>>,
    #[serde(default)]
    pub is_perishable: bool,
    pub status: DonationStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimant_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for `POST /donations/`
///
/// Optional fields serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDonation {
    pub food_item: String,
    pub description: Option<String>,
    pub quantity: String,
    pub pickup_location_lat: f64,
    pub pickup_location_lon: f64,
    pub preferred_pickup_time: Option<String>,
    pub expiration_date: Option<String>,
    pub allergens: Option<Vec<String>>,
    pub is_perishable: bool,
}
