//! Integration tests for time module

#![cfg(feature = "runtime")]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use propmon_common::time::{spawn_after, Debouncer};

/// Validates trailing-edge debouncing across a burst of schedules.
///
/// # Test Steps
/// 1. Schedule three tasks 50 ms apart on a 150 ms debouncer
/// 2. Verify nothing ran before the window closed
/// 3. Verify only the last task ran once the window closed
#[tokio::test(start_paused = true)]
async fn test_burst_collapses_to_last_task() {
    let debouncer = Debouncer::new(Duration::from_millis(150));
    let seen = Arc::new(Mutex::new(Vec::new()));

    for label in ["a", "ab", "abc"] {
        let seen = Arc::clone(&seen);
        debouncer.schedule(async move { seen.lock().push(label) });
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(seen.lock().is_empty());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(*seen.lock(), vec!["abc"]);
}

#[tokio::test(start_paused = true)]
async fn test_spaced_schedules_all_run() {
    let debouncer = Debouncer::new(Duration::from_millis(150));
    let seen = Arc::new(Mutex::new(0_u32));

    for _ in 0..2 {
        let seen = Arc::clone(&seen);
        debouncer.schedule(async move { *seen.lock() += 1 });
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert_eq!(*seen.lock(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_handle_reports_fired() {
    let handle = spawn_after(Duration::from_secs(1), async {});
    assert!(handle.is_pending());
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(handle.has_fired());
}
