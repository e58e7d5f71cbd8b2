//! # Propmon Core
//!
//! Pure business logic layer - no HTTP or storage code.
//!
//! This crate contains:
//! - The [`DashboardSource`] port every data source implements
//! - [`DashboardService`], which falls back to a secondary source
//! - History grouping, timelines and the status stepper
//! - The debounced, paginated [`HistoryExplorer`]
//!
//! ## Architecture Principles
//! - Only depends on `propmon-common` and `propmon-domain`
//! - All data access via the [`DashboardSource`] trait
//! - Pure, testable business logic

pub mod analytics;
pub mod dashboard;
pub mod history;

pub use analytics::{filter_alerts_by_status, funnel_with_conversion, normalize_distribution};
pub use dashboard::{DashboardService, DashboardSource};
pub use history::{
    group_latest_by_proposal, summarize, timeline_for, ExplorerSnapshot, HistoryExplorer,
    HistoryRow, SortOrder, StatusStep, StatusStepper, TimelineFlag,
};
