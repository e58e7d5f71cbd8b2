//! # Propmon App
//!
//! Application layer - service wiring and the commands behind the `propmon`
//! binary.
//!
//! This crate contains:
//! - Commands (page layer → services bridge)
//! - Application context (dependency injection)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the ports to their infrastructure implementations
//! - Provides the commands the CLI front end dispatches to

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
