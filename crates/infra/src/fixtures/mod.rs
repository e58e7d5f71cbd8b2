//! Bundled sample dataset
//!
//! Served when the monitoring API cannot answer a read-only view. History
//! and latest-status pages honour the same filters and paging as the live
//! endpoints so the explorer behaves identically offline.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use propmon_core::DashboardSource;
use propmon_domain::{
    AppliedFilters, ContractQuery, ContractResponse, FilterValue, FunnelStage, GerAlertResponse,
    HistoryFilters, HistoryQuery, KpiSummary, LatestStatusRecord, LatestStatusResponse,
    Pagination, PropmonError, ProposalHistoryRecord, ProposalHistoryResponse, Result,
    StatusDistributionParams, StatusShare,
};
use serde::de::DeserializeOwned;
use tracing::debug;

const PROPOSAL_HISTORY: &str = include_str!("../../fixtures/proposal_history.json");
const LATEST_STATUS: &str = include_str!("../../fixtures/latest_status.json");
const CONTRACT: &str = include_str!("../../fixtures/contract.json");
const KPIS: &str = include_str!("../../fixtures/kpis.json");
const GER_ALERTS: &str = include_str!("../../fixtures/ger_alerts.json");
const STATUS_DISTRIBUTION: &str = include_str!("../../fixtures/status_distribution.json");
const FUNNEL: &str = include_str!("../../fixtures/funnel.json");

/// In-memory copy of the bundled dataset.
#[derive(Debug, Clone)]
pub struct BundledFixtures {
    history: ProposalHistoryResponse,
    latest: LatestStatusResponse,
    contract: ContractResponse,
    kpis: KpiSummary,
    alerts: GerAlertResponse,
    distribution: Vec<StatusShare>,
    funnel: Vec<FunnelStage>,
}

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| PropmonError::Decode(format!("bundled fixture {name}: {e}")))
}

impl BundledFixtures {
    /// Parse every bundled file.
    ///
    /// # Errors
    /// Returns [`PropmonError::Decode`] naming the first file that does not
    /// match its type.
    pub fn load() -> Result<Self> {
        Ok(Self {
            history: parse("proposal_history", PROPOSAL_HISTORY)?,
            latest: parse("latest_status", LATEST_STATUS)?,
            contract: parse("contract", CONTRACT)?,
            kpis: parse("kpis", KPIS)?,
            alerts: parse("ger_alerts", GER_ALERTS)?,
            distribution: parse("status_distribution", STATUS_DISTRIBUTION)?,
            funnel: parse("funnel", FUNNEL)?,
        })
    }
}

/* -------------------------------------------------------------------------- */
/* Local filtering */
/* -------------------------------------------------------------------------- */

fn matches(
    filters: &HistoryFilters,
    proposal_id: u64,
    status_code: &str,
    at: NaiveDateTime,
) -> bool {
    let id_ok = filters
        .proposal_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or(true, |id| id == proposal_id.to_string());
    let status_ok = filters
        .status_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map_or(true, |code| code.eq_ignore_ascii_case(status_code));
    let from_ok = filters.date_from.map_or(true, |from| at.date() >= from);
    let to_ok = filters.date_to.map_or(true, |to| at.date() <= to);
    id_ok && status_ok && from_ok && to_ok
}

fn page<T: Clone>(items: &[T], query: &HistoryQuery) -> (Vec<T>, Pagination) {
    let count = items.len() as u64;
    let offset = usize::try_from(query.offset).unwrap_or(usize::MAX).min(items.len());
    let limit = if query.limit == 0 {
        items.len()
    } else {
        usize::try_from(query.limit).unwrap_or(usize::MAX)
    };
    let slice = items.iter().skip(offset).take(limit).cloned().collect();
    (slice, Pagination { offset: query.offset, limit: query.limit, count })
}

fn applied(filters: &HistoryFilters) -> AppliedFilters {
    AppliedFilters {
        proposal_id: filters.proposal_id.clone().filter(|id| !id.trim().is_empty()).map(|id| {
            id.trim().parse().map_or(FilterValue::Text(id.clone()), FilterValue::Number)
        }),
        status_code: filters.status_code.clone().filter(|code| !code.trim().is_empty()),
        date_from: filters.date_from.map(propmon_domain::format_query_date),
        date_to: filters.date_to.map(propmon_domain::format_query_date),
    }
}

#[async_trait]
impl DashboardSource for BundledFixtures {
    fn name(&self) -> &'static str {
        "fixtures"
    }

    async fn fetch_kpis(&self) -> Result<KpiSummary> {
        Ok(self.kpis.clone())
    }

    async fn fetch_ger_alerts(&self) -> Result<GerAlertResponse> {
        Ok(self.alerts.clone())
    }

    async fn fetch_status_distribution(
        &self,
        _params: &StatusDistributionParams,
    ) -> Result<Vec<StatusShare>> {
        Ok(self.distribution.clone())
    }

    async fn fetch_funnel(&self) -> Result<Vec<FunnelStage>> {
        Ok(self.funnel.clone())
    }

    async fn fetch_proposal_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<ProposalHistoryResponse> {
        let filtered: Vec<ProposalHistoryRecord> = self
            .history
            .records
            .iter()
            .filter(|r| matches(&query.filters, r.proposal_id, &r.status_code, r.evolution_date))
            .cloned()
            .collect();
        let (records, pagination) = page(&filtered, query);
        debug!(matched = filtered.len(), returned = records.len(), "Serving history fixture");
        Ok(ProposalHistoryResponse {
            records,
            pagination,
            applied_filters: applied(&query.filters),
            timestamp: self.history.timestamp.clone(),
        })
    }

    async fn fetch_latest_status(&self, query: &HistoryQuery) -> Result<LatestStatusResponse> {
        let filtered: Vec<LatestStatusRecord> = self
            .latest
            .records
            .iter()
            .filter(|r| matches(&query.filters, r.proposal_id, &r.status_code, r.evolution_date))
            .cloned()
            .collect();
        let (records, pagination) = page(&filtered, query);
        Ok(LatestStatusResponse {
            records,
            pagination,
            applied_filters: applied(&query.filters),
            timestamp: self.latest.timestamp.clone(),
        })
    }

    async fn fetch_contract(&self, query: &ContractQuery) -> Result<ContractResponse> {
        let wanted = query.contract_number.trim();
        let data: Vec<_> = self
            .contract
            .data
            .iter()
            .filter(|c| wanted.is_empty() || c.nu_contrato == wanted || c.co_contrato == wanted)
            .cloned()
            .collect();
        Ok(ContractResponse {
            page: query.page,
            size: query.size,
            total: data.len() as u64,
            upstream_error: false,
            data,
        })
    }
}
