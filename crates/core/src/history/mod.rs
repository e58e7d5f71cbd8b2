//! Proposal history: grouping, timelines, status stepper and the paginated
//! explorer.

pub mod aggregator;
pub mod explorer;
pub mod stepper;

pub use aggregator::{
    count_occurrences, group_latest_by_proposal, has_detail, summarize, timeline_for, HistoryRow,
    SortOrder, TimelineFlag,
};
pub use explorer::{ExplorerSnapshot, HistoryExplorer};
pub use stepper::{StatusStep, StatusStepper};
