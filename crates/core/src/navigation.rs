//! Page destinations and the one-shot banners carried in query strings

use std::fmt;

/// Query value signalling that a donation was just created
pub const DONATION_CREATED: &str = "donation-created";

/// Pages the session layer can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Home,
    Login,
    Register,
    Dashboard,
    Donate,
    Browse,
}

impl Destination {
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Donate => "/donate",
            Self::Browse => "/browse",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Dashboard URL carrying a success marker for the banner
#[must_use]
pub fn dashboard_with_success(marker: &str) -> String {
    format!("{}?success={marker}", Destination::Dashboard.path())
}

/// Success banner shown at the top of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    DonationCreated,
}

impl Banner {
    /// Derive the banner from a raw query string such as `success=donation-created`.
    ///
    /// A leading `?` is tolerated. Unknown markers yield no banner.
    #[must_use]
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "success")
            .and_then(|(_, value)| match value {
                DONATION_CREATED => Some(Self::DonationCreated),
                _ => None,
            })
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::DonationCreated => "Food shared successfully!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_paths() {
        assert_eq!(Destination::Home.path(), "/");
        assert_eq!(Destination::Login.to_string(), "/login");
        assert_eq!(Destination::Dashboard.path(), "/dashboard");
    }

    #[test]
    fn test_dashboard_success_url_round_trips_into_banner() {
        let url = dashboard_with_success(DONATION_CREATED);
        assert_eq!(url, "/dashboard?success=donation-created");

        let (_, query) = url.split_once('?').unwrap();
        let banner = Banner::from_query(query).unwrap();
        assert_eq!(banner.message(), "Food shared successfully!");
    }

    #[test]
    fn test_banner_ignores_unknown_markers() {
        assert_eq!(Banner::from_query(""), None);
        assert_eq!(Banner::from_query("success=other"), None);
        assert_eq!(Banner::from_query("tab=mine"), None);
        assert_eq!(
            Banner::from_query("?tab=mine&success=donation-created"),
            Some(Banner::DonationCreated)
        );
    }
}
