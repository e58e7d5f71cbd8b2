//! Port interfaces for dashboard data
//!
//! Infrastructure provides a live implementation over the resource API and a
//! bundled-fixture implementation; core services only see this trait.

use async_trait::async_trait;
use propmon_domain::{
    ContractQuery, ContractResponse, FunnelStage, GerAlertResponse, HistoryQuery, KpiSummary,
    LatestStatusResponse, ProposalHistoryResponse, Result, StatusDistributionParams, StatusShare,
};

/// Source of every read-only dashboard view.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Short name used in logs (`"api"`, `"fixtures"`).
    fn name(&self) -> &'static str;

    async fn fetch_kpis(&self) -> Result<KpiSummary>;

    /// Proposals stuck in GER for more than two hours
    async fn fetch_ger_alerts(&self) -> Result<GerAlertResponse>;

    async fn fetch_status_distribution(
        &self,
        params: &StatusDistributionParams,
    ) -> Result<Vec<StatusShare>>;

    async fn fetch_funnel(&self) -> Result<Vec<FunnelStage>>;

    async fn fetch_proposal_history(&self, query: &HistoryQuery)
        -> Result<ProposalHistoryResponse>;

    async fn fetch_latest_status(&self, query: &HistoryQuery) -> Result<LatestStatusResponse>;

    async fn fetch_contract(&self, query: &ContractQuery) -> Result<ContractResponse>;
}
