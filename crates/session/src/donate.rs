//! Donation submission flow

use crate::api::FoodshareApi;
use crate::navigator::Navigator;
use foodshare_core::{
    Destination, DonationForm,
    navigation::{DONATION_CREATED, dashboard_with_success},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::instrument;

pub const CREATE_FAILED: &str = "Failed to create donation";
pub const CREATE_NETWORK_ERROR: &str = "Network error. Please try again.";

/// Progress of the share-food form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitState {
    pub is_submitting: bool,
    pub error: Option<String>,
}

/// Validates and posts the share-food form
pub struct DonationSubmitter {
    api: Arc<dyn FoodshareApi>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<SubmitState>,
}

impl std::fmt::Debug for DonationSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DonationSubmitter")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl DonationSubmitter {
    pub fn new(api: Arc<dyn FoodshareApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            navigator,
            state: Mutex::new(SubmitState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubmitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> SubmitState {
        self.lock().clone()
    }

    fn finish(&self, error: Option<String>) {
        let mut state = self.lock();
        state.is_submitting = false;
        state.error = error;
    }

    /// Submit the form
    ///
    /// Returns whether the donation was created. On success the user is sent
    /// to the dashboard with the confirmation banner.
    #[instrument(skip_all, fields(food_item = %form.food_item))]
    pub async fn submit(&self, form: &DonationForm) -> bool {
        let payload = match form.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "Donation form is incomplete");
                self.finish(Some(e.to_string()));
                return false;
            }
        };

        {
            let mut state = self.lock();
            state.is_submitting = true;
            state.error = None;
        }

        match self.api.create_donation(&payload).await {
            Ok(donation) => {
                info!(donation_id = donation.id, "Donation created");
                self.finish(None);
                self.navigator
                    .navigate(&dashboard_with_success(DONATION_CREATED));
                true
            }
            Err(e) if e.is_unauthorized() => {
                info!("Session missing, sending to login");
                self.finish(None);
                self.navigator.navigate(Destination::Login.path());
                false
            }
            Err(e) if e.status().is_some() => {
                warn!(error = %e, "Donation rejected");
                let message = e.detail().unwrap_or(CREATE_FAILED).to_string();
                self.finish(Some(message));
                false
            }
            Err(e) => {
                warn!(error = %e, "Donation request failed");
                self.finish(Some(CREATE_NETWORK_ERROR.to_string()));
                false
            }
        }
    }
}
