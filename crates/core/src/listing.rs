//! Listing search, filtering and display helpers for donations

use crate::types::{Donation, DonationStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Status filter applied to the donation listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(DonationStatus),
}

impl StatusFilter {
    /// Check whether a status passes the filter
    #[must_use]
    pub fn accepts(&self, status: DonationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "available" => Ok(Self::Only(DonationStatus::Available)),
            "claimed" => Ok(Self::Only(DonationStatus::Claimed)),
            "picked_up" => Ok(Self::Only(DonationStatus::PickedUp)),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

/// Search term plus status filter for the browse page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: String,
    pub status: StatusFilter,
}

impl ListingQuery {
    /// Check whether a donation matches the query.
    ///
    /// The search term matches case-insensitively anywhere in the food item
    /// or the description.
    #[must_use]
    pub fn matches(&self, donation: &Donation) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = donation.food_item.to_lowercase().contains(&term)
            || donation
                .description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&term);

        matches_search && self.status.accepts(donation.status)
    }

    /// Whether the query narrows the listing at all
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.status != StatusFilter::All
    }

    /// Keep only the donations matching the query, preserving order
    #[must_use]
    pub fn apply<'a>(&self, donations: &'a [Donation]) -> Vec<&'a Donation> {
        donations.iter().filter(|d| self.matches(d)).collect()
    }
}

/// How soon a perishable donation needs picking up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(name)
    }
}

/// Parse the timestamps the upstream service emits.
///
/// Accepts RFC 3339 as well as naive ISO datetimes (interpreted as UTC) and
/// bare dates.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whole days from `now` until `then`, rounded up
#[must_use]
pub fn days_until(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (then - now).num_milliseconds();
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Render a timestamp relative to `now`: "Today", "Tomorrow", "3 days",
/// "2 days ago", or a calendar date beyond a week out.
#[must_use]
pub fn format_relative_date(value: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return "Not specified".to_string();
    };
    let Some(then) = parse_timestamp(value) else {
        return value.to_string();
    };

    match days_until(then, now) {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        days if days < 0 => format!("{} days ago", days.abs()),
        days if days <= 7 => format!("{days} days"),
        _ => then.format("%-m/%-d/%Y").to_string(),
    }
}

/// Urgency of a donation given its expiration and perishability
#[must_use]
pub fn urgency_level(
    expiration: Option<&str>,
    is_perishable: bool,
    now: DateTime<Utc>,
) -> UrgencyLevel {
    let Some(then) = expiration.and_then(parse_timestamp) else {
        return UrgencyLevel::Low;
    };

    let days = days_until(then, now);
    if is_perishable && days <= 1 {
        UrgencyLevel::Critical
    } else if is_perishable && days <= 3 {
        UrgencyLevel::High
    } else if days <= 7 {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    }
}

/// Human label for a donation status
#[must_use]
pub const fn status_label(status: DonationStatus) -> &'static str {
    match status {
        DonationStatus::Claimed => "Claimed",
        DonationStatus::PickedUp => "Complete",
        DonationStatus::Available | DonationStatus::Unknown => "Available",
    }
}

/// Pickup coordinates as shown on a listing card
#[must_use]
pub fn format_location(lat: f64, lon: f64) -> String {
    format!("{:.2}°, {:.2}°", lat.abs(), lon.abs())
}
