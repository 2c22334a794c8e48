//! Donation board: the listing page's view model

use crate::api::FoodshareApi;
use crate::navigator::Navigator;
use foodshare_core::{Destination, Donation, DonationStatus, ListingQuery};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::instrument;

pub const LOAD_FAILED: &str = "Failed to load donations";
pub const LOAD_NETWORK_ERROR: &str = "Network error";
pub const CLAIM_FAILED: &str = "Failed to claim donation";
pub const CLAIM_NETWORK_ERROR: &str = "Network error while claiming donation";

/// Snapshot of the board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub donations: Vec<Donation>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Donations with a claim in flight
    pub claiming: HashSet<i64>,
}

/// Loads the donation list and claims entries from it
pub struct DonationBoard {
    api: Arc<dyn FoodshareApi>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<BoardState>,
}

impl std::fmt::Debug for DonationBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DonationBoard")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl DonationBoard {
    pub fn new(api: Arc<dyn FoodshareApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            navigator,
            state: Mutex::new(BoardState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardState {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_claiming(&self, id: i64) -> bool {
        self.lock().claiming.contains(&id)
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    /// Donations passing the search box and status filter, in list order
    #[must_use]
    pub fn visible(&self, query: &ListingQuery) -> Vec<Donation> {
        query
            .apply(&self.lock().donations)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Fetch the full list, replacing whatever was shown
    #[instrument(skip(self))]
    pub async fn load(&self) {
        {
            let mut state = self.lock();
            state.is_loading = true;
            state.error = None;
        }

        let result = self.api.list_donations().await;

        let mut state = self.lock();
        state.is_loading = false;
        match result {
            Ok(donations) => {
                debug!(count = donations.len(), "Donations loaded");
                state.donations = donations;
            }
            Err(e) if e.is_unauthorized() => {
                drop(state);
                info!("Session missing, sending to login");
                self.navigator.navigate(Destination::Login.path());
            }
            Err(e) if e.status().is_some() => {
                warn!(error = %e, "Loading donations rejected");
                state.error = Some(LOAD_FAILED.to_string());
            }
            Err(e) => {
                warn!(error = %e, "Loading donations failed");
                state.error = Some(LOAD_NETWORK_ERROR.to_string());
            }
        }
    }

    /// Claim one donation and mark it claimed locally on success
    #[instrument(skip(self))]
    pub async fn claim(&self, id: i64) {
        {
            let mut state = self.lock();
            state.claiming.insert(id);
            state.error = None;
        }

        let result = self.api.claim_donation(id).await;

        let mut state = self.lock();
        state.claiming.remove(&id);
        match result {
            Ok(()) => {
                info!(donation_id = id, "Donation claimed");
                if let Some(donation) = state.donations.iter_mut().find(|d| d.id == id) {
                    donation.status = DonationStatus::Claimed;
                }
            }
            Err(e) if e.status().is_some() => {
                warn!(donation_id = id, error = %e, "Claim rejected");
                state.error = Some(CLAIM_FAILED.to_string());
            }
            Err(e) => {
                warn!(donation_id = id, error = %e, "Claim failed");
                state.error = Some(CLAIM_NETWORK_ERROR.to_string());
            }
        }
    }
}
