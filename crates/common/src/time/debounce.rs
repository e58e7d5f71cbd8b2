//! Trailing-edge debouncer
//!
//! Each call to [`Debouncer::schedule`] starts a fresh timer and cancels the
//! one still pending, so only the last task scheduled within the delay
//! window runs.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use super::timer::{spawn_after, TimerHandle};

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<TimerHandle>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: Mutex::new(None) }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task` to run after the delay, cancelling the previously
    /// scheduled task if it has not started yet.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F) -> TimerHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            if previous.is_pending() {
                trace!("Debounced task superseded");
            }
            previous.cancel();
        }
        let handle = spawn_after(self.delay, task);
        *pending = Some(handle.clone());
        handle
    }

    /// Cancel the pending task, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.cancel();
        }
    }

    /// Whether a scheduled task is still waiting for its delay to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(TimerHandle::is_pending)
    }
}
