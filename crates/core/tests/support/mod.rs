//! Shared test helpers for `propmon-core` integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use propmon_core::DashboardSource;
use propmon_domain::{
    ContractQuery, ContractResponse, FunnelStage, GerAlertResponse, HistoryQuery, IndicatorFlag,
    KpiSummary, LatestStatusResponse, Pagination, PropmonError, ProposalHistoryRecord,
    ProposalHistoryResponse, Result, StatusDistributionParams, StatusShare,
};

pub fn record(proposal_id: u64, status: &str, at: &str, business: bool) -> ProposalHistoryRecord {
    ProposalHistoryRecord {
        evolution_date: NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
            .unwrap_or_else(|e| panic!("bad test timestamp {at}: {e}")),
        contract_id: None,
        proposal_id,
        status_code: status.to_string(),
        status_label: format!("SITUACAO {status}"),
        flow_action: String::new(),
        flow_type_label: String::new(),
        system_reason: None,
        monitoring_flag: IndicatorFlag::Yes,
        business_flag: if business { IndicatorFlag::Yes } else { IndicatorFlag::No },
    }
}

/// Source serving a fixed history page, or failing every call.
pub struct StaticSource {
    pub name: &'static str,
    pub records: Vec<ProposalHistoryRecord>,
    pub failure: Option<PropmonError>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn serving(name: &'static str, records: Vec<ProposalHistoryRecord>) -> Self {
        Self { name, records, failure: None, calls: AtomicUsize::new(0) }
    }

    pub fn failing(name: &'static str, failure: PropmonError) -> Self {
        Self { name, records: Vec::new(), failure: Some(failure), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer<T>(&self, value: impl FnOnce() -> T) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(value()),
        }
    }
}

#[async_trait]
impl DashboardSource for StaticSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_kpis(&self) -> Result<KpiSummary> {
        self.answer(|| KpiSummary {
            total_proposals: 1250,
            active_proposals: 980,
            ger_over_two_hours: 45,
            conversion_rate: 78.4,
        })
    }

    async fn fetch_ger_alerts(&self) -> Result<GerAlertResponse> {
        self.answer(GerAlertResponse::default)
    }

    async fn fetch_status_distribution(
        &self,
        _params: &StatusDistributionParams,
    ) -> Result<Vec<StatusShare>> {
        self.answer(Vec::new)
    }

    async fn fetch_funnel(&self) -> Result<Vec<FunnelStage>> {
        self.answer(Vec::new)
    }

    async fn fetch_proposal_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<ProposalHistoryResponse> {
        self.answer(|| ProposalHistoryResponse {
            records: self.records.clone(),
            pagination: Pagination {
                offset: query.offset,
                limit: query.limit,
                count: self.records.len() as u64,
            },
            ..ProposalHistoryResponse::default()
        })
    }

    async fn fetch_latest_status(&self, _query: &HistoryQuery) -> Result<LatestStatusResponse> {
        self.answer(LatestStatusResponse::default)
    }

    async fn fetch_contract(&self, _query: &ContractQuery) -> Result<ContractResponse> {
        self.answer(ContractResponse::default)
    }
}
