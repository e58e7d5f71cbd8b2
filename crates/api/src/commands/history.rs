//! Proposal history commands: paged history, latest status and per-proposal
//! drill-down

use chrono::NaiveDateTime;
use propmon_core::{
    summarize, timeline_for, DashboardSource, ExplorerSnapshot, HistoryRow, SortOrder,
    StatusStepper, TimelineFlag,
};
use propmon_domain::constants::PAGE_SIZE_OPTIONS;
use propmon_domain::{
    HistoryFilters, HistoryQuery, LatestStatusResponse, ProposalHistoryRecord, PropmonError,
    Result,
};
use serde::Serialize;

use crate::context::AppContext;
use crate::utils::logging::run_logged;

/// Filters plus the page to show. `page` is zero-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRequest {
    pub filters: HistoryFilters,
    pub page: u64,
    /// Defaults to the configured page size
    pub page_size: Option<u32>,
}

/// One grouped row: the latest record of a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: ProposalHistoryRecord,
    pub occurrences: usize,
    /// More than one record exists, so a drill-down is available
    pub has_detail: bool,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        let has_detail = row.has_detail();
        Self { record: row.record, occurrences: row.occurrences, has_detail }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPage {
    pub page: u64,
    pub page_size: u32,
    pub total_pages: u64,
    /// Records across all pages, before grouping
    pub count: u64,
    pub rows: Vec<HistoryEntry>,
}

impl HistoryPage {
    fn from_snapshot(snapshot: &ExplorerSnapshot) -> Self {
        Self {
            page: snapshot.page,
            page_size: snapshot.page_size,
            total_pages: snapshot.total_pages(),
            count: snapshot.response.as_ref().map_or(0, |r| r.pagination.count),
            rows: snapshot.rows().into_iter().map(HistoryEntry::from).collect(),
        }
    }
}

/// Fetch one page of proposal history, grouped to one row per proposal.
///
/// # Errors
/// Returns [`PropmonError::InvalidInput`] for an unsupported page size and
/// the fetch error when neither the API nor the fixtures answer.
pub async fn history(ctx: &AppContext, request: HistoryRequest) -> Result<HistoryPage> {
    run_logged("history::history", async {
        let explorer = ctx.history_explorer()?;
        if let Some(page_size) = request.page_size {
            explorer.set_page_size(page_size)?;
        }
        explorer.set_filters(request.filters);
        explorer.set_page(request.page).await;

        let snapshot = explorer.snapshot();
        if let Some(err) = snapshot.error.clone() {
            return Err(err);
        }
        Ok(HistoryPage::from_snapshot(&snapshot))
    })
    .await
}

/// Latest known status of each proposal matching the filters.
///
/// # Errors
/// Returns [`PropmonError::InvalidInput`] for an unsupported page size and
/// the fetch error when neither the API nor the fixtures answer.
pub async fn latest_status(
    ctx: &AppContext,
    request: HistoryRequest,
) -> Result<LatestStatusResponse> {
    run_logged("history::latest_status", async {
        let page_size = request.page_size.unwrap_or(ctx.config.api.default_page_size);
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(PropmonError::InvalidInput(format!(
                "page size {page_size} is not one of {PAGE_SIZE_OPTIONS:?}"
            )));
        }
        let query = HistoryQuery::for_page(request.filters, request.page, u64::from(page_size));
        ctx.dashboard.fetch_latest_status(&query).await
    })
    .await
}

/* -------------------------------------------------------------------------- */
/* Drill-down */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub status_code: String,
    pub status_label: String,
    pub first_reached: NaiveDateTime,
    pub completed: bool,
}

/// Everything the detail view of one proposal shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalDetail {
    pub proposal_id: u64,
    pub occurrences: usize,
    /// Latest record across all flags
    pub latest: Option<HistoryEntry>,
    /// Business records, newest first
    pub business_timeline: Vec<ProposalHistoryRecord>,
    /// Monitoring records, newest first
    pub monitoring_timeline: Vec<ProposalHistoryRecord>,
    pub steps: Vec<StepView>,
    pub current_step: Option<usize>,
    pub progress_percent: f64,
}

impl ProposalDetail {
    /// Build the detail view from whatever records were fetched; records of
    /// other proposals are ignored.
    #[must_use]
    pub fn from_records(records: &[ProposalHistoryRecord], proposal_id: u64) -> Self {
        let own: Vec<ProposalHistoryRecord> =
            records.iter().filter(|r| r.proposal_id == proposal_id).cloned().collect();
        let stepper = StatusStepper::for_proposal(&own, proposal_id);
        let steps = stepper
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepView {
                status_code: step.status_code.clone(),
                status_label: step.status_label.clone(),
                first_reached: step.first_reached,
                completed: stepper.is_completed(index),
            })
            .collect();

        Self {
            proposal_id,
            occurrences: own.len(),
            latest: summarize(&own).into_iter().next().map(HistoryEntry::from),
            business_timeline: timeline_for(
                &own,
                proposal_id,
                TimelineFlag::Business,
                SortOrder::Descending,
            ),
            monitoring_timeline: timeline_for(
                &own,
                proposal_id,
                TimelineFlag::Monitoring,
                SortOrder::Descending,
            ),
            steps,
            current_step: stepper.current_index(),
            progress_percent: stepper.progress_percent(),
        }
    }
}

/// Timeline and status stepper of one proposal.
///
/// # Errors
/// Returns [`PropmonError::NotFound`] when the proposal has no records and
/// the fetch error when neither the API nor the fixtures answer.
pub async fn proposal_detail(ctx: &AppContext, proposal_id: u64) -> Result<ProposalDetail> {
    run_logged("history::proposal_detail", async {
        let query = HistoryQuery {
            filters: HistoryFilters {
                proposal_id: Some(proposal_id.to_string()),
                ..HistoryFilters::default()
            },
            offset: 0,
            limit: 0,
        };
        let response = ctx.dashboard.fetch_proposal_history(&query).await?;
        let detail = ProposalDetail::from_records(&response.records, proposal_id);
        if detail.occurrences == 0 {
            return Err(PropmonError::NotFound(format!("proposal {proposal_id}")));
        }
        Ok(detail)
    })
    .await
}
