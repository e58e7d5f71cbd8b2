//! Testing utilities and helpers
//!
//! - **[`mocks`]**: scripted token endpoint and a recording session-expiry
//!   handler
//!
//! ```rust
//! use propmon_common::testing::{Clock, MockClock};
//!
//! let clock = MockClock::at_millis(0);
//! clock.advance(std::time::Duration::from_secs(5));
//! assert_eq!(clock.millis_since_epoch(), 5_000);
//! ```

pub mod mocks;

#[cfg(feature = "platform")]
pub use mocks::{MockTokenEndpoint, RecordingSessionHandler};
pub use crate::time::{Clock, MockClock, SystemClock};
