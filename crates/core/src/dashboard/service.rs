//! Dashboard service with fixture fallback
//!
//! Wraps a primary [`DashboardSource`] and, when configured, a secondary
//! source that answers whenever the primary fails. A session-expired failure
//! is never masked: the caller must send the user back to login.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use propmon_domain::{
    ContractQuery, ContractResponse, FunnelStage, GerAlert, GerAlertResponse, HistoryQuery,
    KpiSummary, LatestStatusResponse, OverviewStat, ProposalHistoryResponse, Result,
    StatusDistributionParams, StatusShare,
};
use tracing::warn;

use super::ports::DashboardSource;
use crate::analytics::{filter_alerts_by_status, funnel_with_conversion, normalize_distribution};

/// Dashboard data access with optional fallback.
#[derive(Clone)]
pub struct DashboardService {
    primary: Arc<dyn DashboardSource>,
    fallback: Option<Arc<dyn DashboardSource>>,
}

impl DashboardService {
    #[must_use]
    pub fn new(primary: Arc<dyn DashboardSource>) -> Self {
        Self { primary, fallback: None }
    }

    /// Answer from `fallback` when the primary source fails.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn DashboardSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    async fn with_fallback_source<'a, T, F, Fut>(&'a self, view: &'static str, call: F) -> Result<T>
    where
        F: Fn(&'a dyn DashboardSource) -> Fut,
        Fut: Future<Output = Result<T>> + 'a,
    {
        match call(self.primary.as_ref()).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_session_expired() => Err(err),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        view,
                        source = self.primary.name(),
                        fallback = fallback.name(),
                        error = %err,
                        "Primary source failed; serving fallback data"
                    );
                    call(fallback.as_ref()).await
                }
                None => Err(err),
            },
        }
    }

    /// KPI summary projected into the four overview cards.
    ///
    /// # Errors
    /// Returns the source error when no fallback can answer.
    pub async fn overview(&self) -> Result<Vec<OverviewStat>> {
        Ok(self.fetch_kpis().await?.overview_cards())
    }

    /// GER alerts, optionally restricted to one alert status.
    ///
    /// # Errors
    /// Returns the source error when no fallback can answer.
    pub async fn alerts(&self, status: Option<&str>) -> Result<Vec<GerAlert>> {
        let response = self.fetch_ger_alerts().await?;
        Ok(filter_alerts_by_status(response.alerts, status))
    }

    /// Status distribution with percentages recomputed from the quantities.
    ///
    /// # Errors
    /// Returns the source error when no fallback can answer.
    pub async fn distribution(&self, params: &StatusDistributionParams) -> Result<Vec<StatusShare>> {
        Ok(normalize_distribution(self.fetch_status_distribution(params).await?))
    }

    /// Funnel ordered by stage with conversion relative to the first stage.
    ///
    /// # Errors
    /// Returns the source error when no fallback can answer.
    pub async fn funnel(&self) -> Result<Vec<FunnelStage>> {
        Ok(funnel_with_conversion(self.fetch_funnel().await?))
    }
}

#[async_trait]
impl DashboardSource for DashboardService {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    async fn fetch_kpis(&self) -> Result<KpiSummary> {
        self.with_fallback_source("kpis", |s| s.fetch_kpis()).await
    }

    async fn fetch_ger_alerts(&self) -> Result<GerAlertResponse> {
        self.with_fallback_source("ger_alerts", |s| s.fetch_ger_alerts()).await
    }

    async fn fetch_status_distribution(
        &self,
        params: &StatusDistributionParams,
    ) -> Result<Vec<StatusShare>> {
        self.with_fallback_source("status_distribution", |s| s.fetch_status_distribution(params))
            .await
    }

    async fn fetch_funnel(&self) -> Result<Vec<FunnelStage>> {
        self.with_fallback_source("funnel", |s| s.fetch_funnel()).await
    }

    async fn fetch_proposal_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<ProposalHistoryResponse> {
        self.with_fallback_source("proposal_history", |s| s.fetch_proposal_history(query)).await
    }

    async fn fetch_latest_status(&self, query: &HistoryQuery) -> Result<LatestStatusResponse> {
        self.with_fallback_source("latest_status", |s| s.fetch_latest_status(query)).await
    }

    async fn fetch_contract(&self, query: &ContractQuery) -> Result<ContractResponse> {
        self.with_fallback_source("contract", |s| s.fetch_contract(query)).await
    }
}
