//! Monitoring API bindings for the [`DashboardSource`] port

use std::sync::Arc;

use async_trait::async_trait;
use propmon_core::DashboardSource;
use propmon_domain::{
    ContractQuery, ContractResponse, FunnelStage, GerAlertResponse, HistoryQuery, KpiSummary,
    LatestStatusResponse, ProposalHistoryResponse, Result, StatusDistributionParams, StatusShare,
};

use super::client::ApiClient;

pub const KPIS_PATH: &str = "/kpis";
pub const GER_ALERTS_PATH: &str = "/propostas-ger-2h";
pub const STATUS_DISTRIBUTION_PATH: &str = "/distribuicao-situacao";
pub const FUNNEL_PATH: &str = "/funil-conversao";
pub const PROPOSAL_HISTORY_PATH: &str = "/monitoracao/v1/propostas/filtros";
pub const LATEST_STATUS_PATH: &str = "/monitoracao/v1/propostas/ultimaSituacao";
pub const CONTRACT_PATH: &str = "/credito/contrato";

/// Live dashboard data from the monitoring API.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: Arc<ApiClient>,
}

impl DashboardApi {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DashboardSource for DashboardApi {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn fetch_kpis(&self) -> Result<KpiSummary> {
        Ok(self.client.get(KPIS_PATH, &[]).await?)
    }

    async fn fetch_ger_alerts(&self) -> Result<GerAlertResponse> {
        Ok(self.client.get(GER_ALERTS_PATH, &[]).await?)
    }

    async fn fetch_status_distribution(
        &self,
        params: &StatusDistributionParams,
    ) -> Result<Vec<StatusShare>> {
        Ok(self.client.get(STATUS_DISTRIBUTION_PATH, &params.to_query_pairs()).await?)
    }

    async fn fetch_funnel(&self) -> Result<Vec<FunnelStage>> {
        Ok(self.client.get(FUNNEL_PATH, &[]).await?)
    }

    async fn fetch_proposal_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<ProposalHistoryResponse> {
        Ok(self.client.get(PROPOSAL_HISTORY_PATH, &query.to_query_pairs()).await?)
    }

    async fn fetch_latest_status(&self, query: &HistoryQuery) -> Result<LatestStatusResponse> {
        Ok(self.client.get(LATEST_STATUS_PATH, &query.to_query_pairs()).await?)
    }

    async fn fetch_contract(&self, query: &ContractQuery) -> Result<ContractResponse> {
        Ok(self.client.get(CONTRACT_PATH, &query.to_query_pairs()).await?)
    }
}
