//! Navigation seam between the session layer and whatever renders pages

use std::sync::{Mutex, PoisonError};

/// Moves the user to another page
pub trait Navigator: Send + Sync {
    /// Navigate to a path, optionally carrying a query string
    fn navigate(&self, to: &str);
}

/// Navigator that records every destination in order
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    visited: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every destination navigated to so far
    pub fn history(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent destination
    pub fn current(&self) -> Option<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, to: &str) {
        debug!(to, "Navigating");
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(to.to_string());
    }
}
