//! Domain types and models
//!
//! Wire types keep the monitoring API's field names through `serde(rename)`
//! and expose English field names to Rust callers.

pub mod contract;
pub mod dashboard;
pub mod history;

pub use contract::{Contract, ContractQuery, ContractResponse};
pub use dashboard::{
    FunnelStage, GerAlert, GerAlertResponse, KpiSummary, OverviewStat, StatValue,
    StatusDistributionParams, StatusShare,
};
pub use history::{
    AppliedFilters, FilterValue, HistoryFilters, HistoryQuery, IndicatorFlag, LatestStatusRecord,
    LatestStatusResponse, Pagination, ProposalHistoryRecord, ProposalHistoryResponse,
};
