//! Shared utilities for the propmon crates.
//!
//! # Feature Tiers
//!
//! - `foundation`: error types and classification
//! - `runtime`: clock, timers, debounce, key-value storage
//! - `platform`: token endpoint client, session store, auth service
//! - `test-utils`: mocks for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod storage;
#[cfg(feature = "runtime")]
pub mod time;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{AuthError, AuthService, Credentials, SessionExpiredHandler, SessionStore};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
#[cfg(feature = "runtime")]
pub use time::{Clock, Debouncer, MockClock, SystemClock, TimerHandle};
