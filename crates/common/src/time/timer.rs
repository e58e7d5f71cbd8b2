//! Cancellable delayed tasks

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Shared view of one delayed task.
///
/// The task moves from pending to exactly one of fired or cancelled, so a
/// cancel that loses the race against the deadline is a no-op.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    state: Arc<AtomicU8>,
}

impl TimerHandle {
    fn pending() -> Self {
        Self { state: Arc::new(AtomicU8::new(PENDING)) }
    }

    /// Stop the task from starting. Returns false if it already started.
    pub fn cancel(&self) -> bool {
        self.transition(CANCELLED) || self.state.load(Ordering::Acquire) == CANCELLED
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == PENDING
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }

    fn transition(&self, to: u8) -> bool {
        self.state.compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }
}

/// Run `task` once `delay` has elapsed, unless the handle is cancelled first.
///
/// Must be called from within a tokio runtime.
pub fn spawn_after<F>(delay: Duration, task: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = TimerHandle::pending();
    let state = handle.clone();

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if state.transition(FIRED) {
            task.await;
        }
    });

    handle
}
