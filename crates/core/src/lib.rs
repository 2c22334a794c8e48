//! Foodshare core types and utilities
//!
//! Domain types shared by the gateway, the typed client and the session
//! layer, together with the pure view logic the pages rely on: donation form
//! conversion, listing filters and formatting, and upstream error-detail
//! normalization.

pub mod detail;
pub mod error;
pub mod form;
pub mod listing;
pub mod navigation;
pub mod types;

#[cfg(feature = "tracing")]
pub mod tracing;

pub use error::{CoreError, CoreResult};
pub use form::{DonationForm, LocationError, LocationProvider, Position};
pub use listing::{ListingQuery, StatusFilter, UrgencyLevel};
pub use navigation::{Banner, Destination};
pub use types::{Donation, DonationStatus, NewDonation, User};
