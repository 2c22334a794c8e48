//! Authentication session
//!
//! Holds the cached identity of the signed-in user and keeps the session
//! alive with two background refreshes: a periodic one and a one-shot shortly
//! before the access cookie would expire. Both are armed when a user becomes
//! cached and cancelled when it is cleared. Every identity check that caches
//! a user pushes the one-shot back by its full delay.
//!
//! Logins and logouts start a new generation. An identity check that began in
//! an earlier generation has its result discarded.
//!
//! Every failure degrades into state. Nothing here returns an error.

use crate::api::FoodshareApi;
use crate::navigator::Navigator;
use crate::scheduler::ScheduledTask;
use foodshare_core::{User, navigation::Destination};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::instrument;

/// Shown when a login is rejected without a usable message
pub const LOGIN_FAILED: &str = "Login failed";

/// Shown when a login never reached the gateway
pub const LOGIN_NETWORK_ERROR: &str = "Network error occurred";

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    /// True until the first identity check completes
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

/// Delays of the two background refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    /// Period of the recurring refresh
    pub refresh_interval: Duration,
    /// Delay of the one-shot refresh after a user becomes cached
    pub refresh_before_expiry: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(10 * 60),
            refresh_before_expiry: Duration::from_secs(13 * 60),
        }
    }
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl LoginOutcome {
    const fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

struct RefreshTimers {
    _periodic: ScheduledTask,
    before_expiry: ScheduledTask,
}

struct Inner {
    api: Arc<dyn FoodshareApi>,
    navigator: Arc<dyn Navigator>,
    timings: SessionTimings,
    state: watch::Sender<SessionState>,
    timers: Mutex<Option<RefreshTimers>>,
    generation: AtomicU64,
}

/// Shared handle to the authentication session
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("state", &*self.inner.state.borrow())
            .field("timings", &self.inner.timings)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Create a session with the default refresh timings
    pub fn new(api: Arc<dyn FoodshareApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_timings(api, navigator, SessionTimings::default())
    }

    pub fn with_timings(
        api: Arc<dyn FoodshareApi>,
        navigator: Arc<dyn Navigator>,
        timings: SessionTimings,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                navigator,
                timings,
                state,
                timers: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Watch the session state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().user.is_some()
    }

    /// Whether the background refreshes are armed
    #[must_use]
    pub fn has_refresh_timers(&self) -> bool {
        self.lock_timers().is_some()
    }

    /// Run the first identity check
    pub async fn init(&self) {
        info!("Initializing session");
        self.check_auth().await;
    }

    /// Cancel both background refreshes
    pub fn dispose(&self) {
        debug!("Disposing session");
        self.lock_timers().take();
    }

    /// Query the current identity, falling back to one silent refresh when
    /// the gateway rejects the session
    #[instrument(skip(self))]
    pub async fn check_auth(&self) {
        let started = self.generation();
        match self.inner.api.me().await {
            Ok(user) => {
                debug!(user_id = user.id, "Session is valid");
                self.settle(started, Some(user));
            }
            Err(e) if e.status().is_some() => {
                debug!(error = %e, "Identity check rejected, trying refresh");
                if self.settle(started, None) {
                    self.attempt_refresh().await;
                }
            }
            Err(e) => {
                warn!(error = %e, "Identity check failed");
                self.settle(started, None);
            }
        }
        self.set_loading(false);
    }

    /// Refresh the session cookies and re-query the identity
    ///
    /// Returns whether a user is cached afterwards.
    #[instrument(skip(self))]
    pub async fn attempt_refresh(&self) -> bool {
        let started = self.generation();
        if let Err(e) = self.inner.api.refresh().await {
            debug!(error = %e, "Refresh failed");
            self.settle(started, None);
            return self.is_authenticated();
        }

        match self.inner.api.me().await {
            Ok(user) => {
                debug!(user_id = user.id, "Session refreshed");
                self.settle(started, Some(user));
            }
            Err(e) => {
                debug!(error = %e, "Identity check after refresh failed");
                self.settle(started, None);
            }
        }
        self.is_authenticated()
    }

    /// Sign in and load the identity
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        match self.inner.api.login(email, password).await {
            Ok(()) => {
                info!("Login accepted");
                self.begin_generation();
                self.check_auth().await;
                LoginOutcome::succeeded()
            }
            Err(e) if e.status().is_some() => {
                debug!(error = %e, "Login rejected");
                LoginOutcome::failed(e.detail().unwrap_or(LOGIN_FAILED))
            }
            Err(e) => {
                warn!(error = %e, "Login request failed");
                LoginOutcome::failed(LOGIN_NETWORK_ERROR)
            }
        }
    }

    /// Invalidate the session upstream, then clear it locally and go home
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let started = self.begin_generation();
        if let Err(e) = self.inner.api.logout().await {
            warn!(error = %e, "Logout request failed");
        }
        self.settle(started, None);
        self.inner.navigator.navigate(Destination::Home.path());
        info!("Signed out");
    }

    /// Re-run the identity check on demand
    pub async fn refresh_auth(&self) {
        self.check_auth().await;
    }

    fn lock_timers(&self) -> std::sync::MutexGuard<'_, Option<RefreshTimers>> {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_loading(&self, is_loading: bool) {
        self.inner.state.send_if_modified(|state| {
            let changed = state.is_loading != is_loading;
            state.is_loading = is_loading;
            changed
        });
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    fn begin_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store the outcome of an identity check begun in generation `started`
    ///
    /// Returns false, leaving the state untouched, when a login or logout has
    /// happened since.
    fn settle(&self, started: u64, user: Option<User>) -> bool {
        let signed_in = user.is_some();
        let mut current = true;
        // The generation is compared under the state lock so a concurrent
        // logout either lands after this write or makes it stale.
        let changed = self.inner.state.send_if_modified(|state| {
            if self.generation() != started {
                current = false;
                false
            } else if state.user == user {
                false
            } else {
                state.user = user;
                true
            }
        });

        if !current {
            debug!(started, "Discarding identity from a superseded check");
            return false;
        }

        if changed {
            self.rearm_timers(signed_in);
        } else if signed_in {
            self.push_back_expiry_refresh();
        }
        true
    }

    fn rearm_timers(&self, signed_in: bool) {
        let mut timers = self.lock_timers();
        // Dropping the previous pair cancels it.
        timers.take();

        if signed_in {
            let weak = Arc::downgrade(&self.inner);
            *timers = Some(RefreshTimers {
                _periodic: Self::schedule_periodic(weak.clone(), self.inner.timings.refresh_interval),
                before_expiry: Self::schedule_before_expiry(
                    weak,
                    self.inner.timings.refresh_before_expiry,
                ),
            });
            debug!("Refresh timers armed");
        } else {
            debug!("Refresh timers cleared");
        }
    }

    /// Restart the one-shot refresh from now
    fn push_back_expiry_refresh(&self) {
        if let Some(timers) = self.lock_timers().as_mut() {
            // Replacing the task cancels the old one; if it is the caller, it
            // still runs to completion.
            timers.before_expiry = Self::schedule_before_expiry(
                Arc::downgrade(&self.inner),
                self.inner.timings.refresh_before_expiry,
            );
            trace!("Expiry refresh pushed back");
        }
    }

    fn schedule_periodic(weak: Weak<Inner>, period: Duration) -> ScheduledTask {
        ScheduledTask::every("session_refresh", period, move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let session = Self { inner };
                if session.is_authenticated() {
                    session.attempt_refresh().await;
                }
            }
        })
    }

    fn schedule_before_expiry(weak: Weak<Inner>, delay: Duration) -> ScheduledTask {
        ScheduledTask::after("session_refresh_before_expiry", delay, move || async move {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.attempt_refresh().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockFoodshareApi, network_error, rejected, user};
    use crate::navigator::HistoryNavigator;
    use async_trait::async_trait;
    use foodshare_core::{Donation, NewDonation};
    use foodshare_http::client::error::ClientError;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn new_session(api: MockFoodshareApi) -> (AuthSession, Arc<HistoryNavigator>) {
        let navigator = Arc::new(HistoryNavigator::new());
        (AuthSession::new(Arc::new(api), navigator.clone()), navigator)
    }

    #[tokio::test]
    async fn test_check_auth_caches_user() {
        let mut api = MockFoodshareApi::new();
        api.expect_me().times(1).returning(|| Ok(user()));
        let (session, _) = new_session(api);

        assert!(session.is_loading());
        session.init().await;

        assert_eq!(session.user(), Some(user()));
        assert!(session.is_authenticated());
        assert!(!session.is_loading());
        assert!(session.has_refresh_timers());
        session.dispose();
        assert!(!session.has_refresh_timers());
    }

    #[tokio::test]
    async fn test_rejected_identity_tries_one_refresh() {
        let mut api = MockFoodshareApi::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let me_calls = calls.clone();
        api.expect_me().times(2).returning(move || {
            if me_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(rejected(401, Some("Not authenticated")))
            } else {
                Ok(user())
            }
        });
        api.expect_refresh().times(1).returning(|| Ok(()));
        let (session, _) = new_session(api);

        session.check_auth().await;

        assert_eq!(session.user(), Some(user()));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_identity_empty() {
        let mut api = MockFoodshareApi::new();
        api.expect_me()
            .times(1)
            .returning(|| Err(rejected(401, None)));
        api.expect_refresh()
            .times(1)
            .returning(|| Err(rejected(401, Some("Invalid refresh token"))));
        let (session, _) = new_session(api);

        session.check_auth().await;

        assert_eq!(session.user(), None);
        assert!(!session.is_loading());
        assert!(!session.has_refresh_timers());
    }

    #[tokio::test]
    async fn test_network_failure_is_not_authenticated_without_refresh() {
        let mut api = MockFoodshareApi::new();
        api.expect_me().times(1).returning(|| Err(network_error()));
        api.expect_refresh().never();
        let (session, _) = new_session(api);

        session.check_auth().await;

        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_attempt_refresh_outcomes() {
        let mut api = MockFoodshareApi::new();
        api.expect_refresh().times(1).returning(|| Ok(()));
        api.expect_me().times(1).returning(|| Ok(user()));
        let (session, _) = new_session(api);
        assert!(session.attempt_refresh().await);
        assert_eq!(session.user(), Some(user()));

        let mut api = MockFoodshareApi::new();
        api.expect_refresh().times(1).returning(|| Ok(()));
        api.expect_me().times(1).returning(|| Err(rejected(401, None)));
        let (session, _) = new_session(api);
        assert!(!session.attempt_refresh().await);
        assert_eq!(session.user(), None);

        let mut api = MockFoodshareApi::new();
        api.expect_refresh().times(1).returning(|| Err(network_error()));
        let (session, _) = new_session(api);
        assert!(!session.attempt_refresh().await);
    }

    #[tokio::test]
    async fn test_login_success_loads_identity() {
        let mut api = MockFoodshareApi::new();
        api.expect_login().times(1).returning(|email, _| {
            assert_eq!(email.to_string(), "ada@example.com");
            Ok(())
        });
        api.expect_me().times(1).returning(|| Ok(user()));
        let (session, _) = new_session(api);

        let outcome = session.login("ada@example.com", "pw").await;

        assert_eq!(
            outcome,
            LoginOutcome {
                success: true,
                error: None
            }
        );
        assert_eq!(session.user(), Some(user()));
    }

    #[tokio::test]
    async fn test_login_rejection_messages() {
        let mut api = MockFoodshareApi::new();
        api.expect_login()
            .times(1)
            .returning(|_, _| Err(rejected(401, Some("Invalid credentials"))));
        let (session, _) = new_session(api);
        let outcome = session.login("ada@example.com", "wrong").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Invalid credentials"));

        let mut api = MockFoodshareApi::new();
        api.expect_login()
            .times(1)
            .returning(|_, _| Err(rejected(500, None)));
        let (session, _) = new_session(api);
        let outcome = session.login("ada@example.com", "pw").await;
        assert_eq!(outcome.error.as_deref(), Some(LOGIN_FAILED));

        let mut api = MockFoodshareApi::new();
        api.expect_login()
            .times(1)
            .returning(|_, _| Err(network_error()));
        let (session, _) = new_session(api);
        let outcome = session.login("ada@example.com", "pw").await;
        assert_eq!(outcome.error.as_deref(), Some(LOGIN_NETWORK_ERROR));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_and_goes_home_even_on_failure() {
        let mut api = MockFoodshareApi::new();
        api.expect_me().times(1).returning(|| Ok(user()));
        api.expect_logout().times(1).returning(|| Err(network_error()));
        let (session, navigator) = new_session(api);

        session.init().await;
        assert!(session.is_authenticated());

        session.logout().await;

        assert!(!session.is_authenticated());
        assert!(!session.has_refresh_timers());
        assert_eq!(navigator.current().as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_subscribers_see_identity_changes() {
        let mut api = MockFoodshareApi::new();
        api.expect_me().times(1).returning(|| Ok(user()));
        let (session, _) = new_session(api);
        let mut rx = session.subscribe();

        session.init().await;

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.user, Some(user()));
        assert!(!state.is_loading);
        session.dispose();
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_refresh_pushes_back_expiry_refresh() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let counted = refreshes.clone();

        let mut api = MockFoodshareApi::new();
        api.expect_me().returning(|| Ok(user()));
        api.expect_refresh().returning(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let (session, _) = new_session(api);
        session.init().await;

        tokio::time::sleep(Duration::from_secs(10 * 60 - 1)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);

        // The refresh at ten minutes moved the one-shot to twenty-three
        tokio::time::sleep(Duration::from_secs(3 * 60)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(7 * 60)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 2);

        session.dispose();
        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_refresh_rearms_after_same_user() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let counted = refreshes.clone();

        let mut api = MockFoodshareApi::new();
        api.expect_me().returning(|| Ok(user()));
        api.expect_refresh().returning(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let session = AuthSession::with_timings(
            Arc::new(api),
            Arc::new(HistoryNavigator::new()),
            SessionTimings {
                refresh_interval: Duration::from_secs(24 * 60 * 60),
                refresh_before_expiry: Duration::from_secs(13 * 60),
            },
        );
        session.init().await;

        tokio::time::sleep(Duration::from_secs(13 * 60 + 1)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(session.user(), Some(user()));

        tokio::time::sleep(Duration::from_secs(13 * 60)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(13 * 60)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 3);

        session.dispose();
        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 3);
    }

    /// Identity query that waits until the test lets it answer
    #[derive(Default)]
    struct HeldIdentity {
        asked: Notify,
        answer: Notify,
    }

    #[async_trait]
    impl FoodshareApi for HeldIdentity {
        async fn me(&self) -> Result<User, ClientError> {
            self.asked.notify_one();
            self.answer.notified().await;
            Ok(user())
        }

        async fn refresh(&self) -> Result<(), ClientError> {
            Ok(())
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<(), ClientError> {
            Ok(())
        }

        async fn logout(&self) -> Result<(), ClientError> {
            Ok(())
        }

        async fn list_donations(&self) -> Result<Vec<Donation>, ClientError> {
            Ok(Vec::new())
        }

        async fn create_donation(&self, _donation: &NewDonation) -> Result<Donation, ClientError> {
            Err(network_error())
        }

        async fn claim_donation(&self, _id: i64) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_logout_during_refresh_stays_signed_out() {
        let api = Arc::new(HeldIdentity::default());
        let navigator = Arc::new(HistoryNavigator::new());
        let session = AuthSession::new(api.clone(), navigator.clone());

        let refreshing = tokio::spawn({
            let session = session.clone();
            async move { session.attempt_refresh().await }
        });
        api.asked.notified().await;

        session.logout().await;
        api.answer.notify_one();

        assert!(!refreshing.await.unwrap());
        assert_eq!(session.user(), None);
        assert!(!session.has_refresh_timers());
        assert_eq!(navigator.current().as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_logout_during_identity_check_stays_signed_out() {
        let api = Arc::new(HeldIdentity::default());
        let session = AuthSession::new(api.clone(), Arc::new(HistoryNavigator::new()));

        let checking = tokio::spawn({
            let session = session.clone();
            async move { session.check_auth().await }
        });
        api.asked.notified().await;

        session.logout().await;
        api.answer.notify_one();
        checking.await.unwrap();

        assert_eq!(session.user(), None);
        assert!(!session.is_loading());
        assert!(!session.has_refresh_timers());

        // A later check belongs to the new generation and is applied
        let recheck = tokio::spawn({
            let session = session.clone();
            async move { session.check_auth().await }
        });
        api.asked.notified().await;
        api.answer.notify_one();
        recheck.await.unwrap();
        assert_eq!(session.user(), Some(user()));
        session.dispose();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_background_refresh_stops_timers() {
        let mut api = MockFoodshareApi::new();
        api.expect_me().times(1).returning(|| Ok(user()));
        api.expect_refresh()
            .times(1)
            .returning(|| Err(rejected(401, None)));
        let (session, _) = new_session(api);
        session.init().await;

        tokio::time::sleep(Duration::from_secs(10 * 60 + 1)).await;

        assert!(!session.is_authenticated());
        assert!(!session.has_refresh_timers());

        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_every_handle_ends_timers() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let counted = refreshes.clone();

        let mut api = MockFoodshareApi::new();
        api.expect_me().returning(|| Ok(user()));
        api.expect_refresh().returning(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let (session, _) = new_session(api);
        session.init().await;
        drop(session);

        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
    }
}
