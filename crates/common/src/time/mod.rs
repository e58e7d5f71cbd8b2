//! Time utilities and abstractions
//!
//! - **[`clock`]**: wall-clock abstraction with a controllable mock
//! - **[`timer`]**: cancellable delayed tasks
//! - **[`debounce`]**: trailing-edge debouncer built on timers
//!
//! ```rust
//! use std::time::Duration;
//!
//! use propmon_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::at_millis(1_000);
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.millis_since_epoch(), 6_000);
//! ```

pub mod clock;
pub mod debounce;
pub mod timer;

pub use clock::{Clock, MockClock, SystemClock};
pub use debounce::Debouncer;
pub use timer::{spawn_after, TimerHandle};
