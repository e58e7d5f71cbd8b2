//! # Propmon Domain
//!
//! Business domain types and models for the proposal monitoring client.
//!
//! This crate contains:
//! - Wire/data types returned by the monitoring API (history, KPIs, alerts,
//!   distributions, funnel, contracts)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and date parsing utilities
//!
//! ## Architecture
//! - No dependencies on other propmon crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::dates::{
    format_display_date, format_query_date, parse_any_timestamp, parse_timestamp,
    DateParseError, TimestampFormat,
};
