//! Clock abstraction
//!
//! Expiry checks read the wall clock through [`Clock`] so tests can move time
//! without sleeping.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync {
    /// Monotonic timestamp suitable for measuring durations.
    fn now(&self) -> Instant;

    /// Current wall-clock time.
    fn system_time(&self) -> SystemTime;

    /// Milliseconds since the UNIX epoch.
    fn millis_since_epoch(&self) -> u64 {
        let millis = self.system_time().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same elapsed time, so a clone handed to a component can
/// be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
    base_system_time: SystemTime,
}

impl MockClock {
    /// Clock starting at the current real time.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(SystemTime::now())
    }

    /// Clock whose wall time starts at `epoch_millis`.
    #[must_use]
    pub fn at_millis(epoch_millis: u64) -> Self {
        Self::starting_at(UNIX_EPOCH + Duration::from_millis(epoch_millis))
    }

    fn starting_at(base_system_time: SystemTime) -> Self {
        Self { start: Instant::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)), base_system_time }
    }

    /// Move time forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Replace the elapsed time.
    pub fn set_elapsed(&self, duration: Duration) {
        *self.elapsed.lock() = duration;
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }

    fn system_time(&self) -> SystemTime {
        self.base_system_time + *self.elapsed.lock()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for time::clock.
    use super::*;

    /// Validates `MockClock::advance` behavior for the shared clone scenario.
    ///
    /// Assertions:
    /// - Confirms advancing one clone is visible through the other.
    /// - Confirms `millis_since_epoch` starts at the configured base.
    #[test]
    fn test_mock_clock_clones_share_time() {
        let clock = MockClock::at_millis(10_000);
        let observer = clock.clone();
        assert_eq!(observer.millis_since_epoch(), 10_000);

        clock.advance(Duration::from_millis(1_500));
        assert_eq!(observer.millis_since_epoch(), 11_500);
        assert_eq!(observer.elapsed(), Duration::from_millis(1_500));

        clock.set_elapsed(Duration::ZERO);
        assert_eq!(observer.millis_since_epoch(), 10_000);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.millis_since_epoch() > 1_600_000_000_000);
    }
}
