//! Donation submission form and its conversion into the upstream payload

use crate::error::{CoreError, CoreResult};
use crate::types::NewDonation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw state of the "share food" form as the user filled it in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonationForm {
    pub food_item: String,
    pub description: String,
    pub quantity: String,
    /// Latitude as typed into the form
    pub pickup_location_lat: String,
    pub pickup_location_lon: String,
    pub preferred_pickup_time: String,
    /// Local datetime as produced by a `datetime-local` input
    pub expiration_date: String,
    /// Comma-separated allergen names
    pub allergens: String,
    pub is_perishable: bool,
}

/// A geolocation fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Reasons a geolocation fix could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Unable to get your current location. Please enter manually.")]
    Unavailable,

    #[error("Geolocation is not supported by this browser.")]
    Unsupported,
}

/// Source of the device's current position
pub trait LocationProvider {
    /// Return the current position or the reason it is unknown
    fn current_position(&self) -> Result<Position, LocationError>;
}

/// Split a comma-separated allergen list into trimmed, non-empty names.
///
/// Returns `None` when no names remain.
#[must_use]
pub fn parse_allergens(input: &str) -> Option<Vec<String>> {
    let allergens: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if allergens.is_empty() {
        None
    } else {
        Some(allergens)
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn required(field: &str, value: &str) -> CoreResult<String> {
    if value.trim().is_empty() {
        Err(CoreError::missing_field(field))
    } else {
        Ok(value.to_string())
    }
}

fn coordinate(field: &str, value: &str) -> CoreResult<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::missing_field(field));
    }
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(CoreError::invalid_coordinate(field, value)),
    }
}

impl DonationForm {
    /// Overwrite the pickup coordinates with a geolocation fix
    pub fn apply_position(&mut self, position: Position) {
        self.pickup_location_lat = position.latitude.to_string();
        self.pickup_location_lon = position.longitude.to_string();
    }

    /// Fill the pickup coordinates from a location provider.
    ///
    /// The form is left untouched when no fix is available.
    ///
    /// # Errors
    ///
    /// Returns the provider's error, whose message is meant for the user.
    pub fn fill_location(&mut self, provider: &dyn LocationProvider) -> Result<(), LocationError> {
        let position = provider.current_position()?;
        self.apply_position(position);
        Ok(())
    }

    /// Build the upstream payload.
    ///
    /// Empty optional fields become absent and the allergen list is split
    /// into individual names.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field or coordinate is blank, or a
    /// coordinate does not read as a finite number.
    pub fn to_payload(&self) -> CoreResult<NewDonation> {
        Ok(NewDonation {
            food_item: required("food_item", &self.food_item)?,
            description: optional(&self.description),
            quantity: required("quantity", &self.quantity)?,
            pickup_location_lat: coordinate("pickup_location_lat", &self.pickup_location_lat)?,
            pickup_location_lon: coordinate("pickup_location_lon", &self.pickup_location_lon)?,
            preferred_pickup_time: optional(&self.preferred_pickup_time),
            expiration_date: optional(&self.expiration_date),
            allergens: parse_allergens(&self.allergens),
            is_perishable: self.is_perishable,
        })
    }
}
