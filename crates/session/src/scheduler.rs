//! Cancellable background tasks driven by the tokio clock
//!
//! Cancellation is cooperative: a callback that is already running finishes,
//! and no further runs start after [`ScheduledTask::cancel`]. Dropping the
//! task cancels it.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// A periodic or one-shot callback running on its own tokio task
#[derive(Debug)]
pub struct ScheduledTask {
    name: &'static str,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `callback` every `period`, first after one full period
    pub fn every<F, Fut>(name: &'static str, period: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        trace!(task = name, "Periodic task firing");
                        callback().await;
                    }
                }
            }
            trace!(task = name, "Periodic task stopped");
        });

        Self {
            name,
            token,
            handle,
        }
    }

    /// Run `callback` once after `delay`
    pub fn after<F, Fut>(name: &'static str, delay: Duration, callback: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancelled.cancelled() => {
                    trace!(task = name, "One-shot task cancelled before firing");
                }
                () = tokio::time::sleep(delay) => {
                    trace!(task = name, "One-shot task firing");
                    callback().await;
                }
            }
        });

        Self {
            name,
            token,
            handle,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Stop any future runs
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the underlying task has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
