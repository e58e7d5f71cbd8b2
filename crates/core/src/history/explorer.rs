//! Paginated, filterable history view
//!
//! Filter and page-size edits are debounced so a burst of keystrokes issues
//! a single request carrying the final parameters. Every request is tagged
//! with a sequence number; a response that arrives after a newer request
//! has started is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use propmon_common::time::Debouncer;
use propmon_domain::constants::{DEFAULT_PAGE_SIZE, HISTORY_DEBOUNCE_MS, PAGE_SIZE_OPTIONS};
use propmon_domain::{
    HistoryFilters, HistoryQuery, PropmonError, ProposalHistoryResponse, Result,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::aggregator::{summarize, HistoryRow};
use crate::dashboard::DashboardSource;

/// Point-in-time view of the explorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerSnapshot {
    pub filters: HistoryFilters,
    /// Zero-based page index
    pub page: u64,
    pub page_size: u32,
    pub loading: bool,
    pub response: Option<ProposalHistoryResponse>,
    pub error: Option<PropmonError>,
}

impl ExplorerSnapshot {
    fn new(page_size: u32) -> Self {
        Self {
            filters: HistoryFilters::default(),
            page: 0,
            page_size,
            loading: false,
            response: None,
            error: None,
        }
    }

    #[must_use]
    pub fn query(&self) -> HistoryQuery {
        HistoryQuery::for_page(self.filters.clone(), self.page, u64::from(self.page_size))
    }

    /// Total pages reported by the last response.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.response.as_ref().map_or(0, |r| r.pagination.total_pages())
    }

    /// One row per proposal from the current page.
    #[must_use]
    pub fn rows(&self) -> Vec<HistoryRow> {
        self.response.as_ref().map(|r| summarize(&r.records)).unwrap_or_default()
    }
}

struct Shared {
    source: Arc<dyn DashboardSource>,
    state: Mutex<ExplorerSnapshot>,
    sequence: AtomicU64,
    updates: watch::Sender<u64>,
}

impl Shared {
    /// Fetch whatever the state currently asks for.
    async fn fetch_current(&self) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let query = {
            let mut state = self.state.lock();
            state.loading = true;
            state.query()
        };
        debug!(seq, offset = query.offset, limit = query.limit, "Fetching proposal history");

        let result = self.source.fetch_proposal_history(&query).await;

        {
            let mut state = self.state.lock();
            if self.sequence.load(Ordering::SeqCst) != seq {
                debug!(seq, "Discarding stale history response");
                return;
            }
            state.loading = false;
            match result {
                Ok(response) => {
                    state.response = Some(response);
                    state.error = None;
                }
                Err(err) => {
                    warn!(seq, error = %err, "History fetch failed");
                    state.error = Some(err);
                }
            }
        }
        self.updates.send_replace(seq);
    }
}

/// Stateful history explorer over a [`DashboardSource`].
pub struct HistoryExplorer {
    shared: Arc<Shared>,
    debouncer: Debouncer,
}

impl HistoryExplorer {
    /// Explorer with the default debounce window and page size.
    #[must_use]
    pub fn new(source: Arc<dyn DashboardSource>) -> Self {
        Self::build(source, Duration::from_millis(HISTORY_DEBOUNCE_MS), DEFAULT_PAGE_SIZE)
    }

    /// # Errors
    /// Returns [`PropmonError::InvalidInput`] when `page_size` is not one of
    /// [`PAGE_SIZE_OPTIONS`].
    pub fn with_settings(
        source: Arc<dyn DashboardSource>,
        debounce: Duration,
        page_size: u32,
    ) -> Result<Self> {
        validate_page_size(page_size)?;
        Ok(Self::build(source, debounce, page_size))
    }

    fn build(source: Arc<dyn DashboardSource>, debounce: Duration, page_size: u32) -> Self {
        let (updates, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                source,
                state: Mutex::new(ExplorerSnapshot::new(page_size)),
                sequence: AtomicU64::new(0),
                updates,
            }),
            debouncer: Debouncer::new(debounce),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ExplorerSnapshot {
        self.shared.state.lock().clone()
    }

    #[must_use]
    pub fn rows(&self) -> Vec<HistoryRow> {
        self.shared.state.lock().rows()
    }

    /// Receiver bumped with the sequence number of every applied response.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.updates.subscribe()
    }

    #[must_use]
    pub fn is_fetch_scheduled(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Replace the filters and schedule a debounced fetch of the first page.
    pub fn set_filters(&self, filters: HistoryFilters) {
        self.update_filters(|current| *current = filters);
    }

    /// Edit the filters in place and schedule a debounced fetch of the first
    /// page.
    pub fn update_filters<F>(&self, edit: F)
    where
        F: FnOnce(&mut HistoryFilters),
    {
        {
            let mut state = self.shared.state.lock();
            edit(&mut state.filters);
            state.page = 0;
        }
        self.schedule_fetch();
    }

    /// # Errors
    /// Returns [`PropmonError::InvalidInput`] for sizes outside
    /// [`PAGE_SIZE_OPTIONS`]; the state is left untouched.
    pub fn set_page_size(&self, page_size: u32) -> Result<()> {
        validate_page_size(page_size)?;
        {
            let mut state = self.shared.state.lock();
            state.page_size = page_size;
            state.page = 0;
        }
        self.schedule_fetch();
        Ok(())
    }

    /// Clear all filters and go back to the first page.
    pub fn reset(&self) {
        self.set_filters(HistoryFilters::default());
    }

    /// Jump to `page` and fetch it right away, superseding any debounced
    /// fetch still waiting.
    pub async fn set_page(&self, page: u64) {
        self.debouncer.cancel();
        self.shared.state.lock().page = page;
        self.shared.fetch_current().await;
    }

    /// Re-fetch the current page immediately.
    pub async fn refresh(&self) {
        self.debouncer.cancel();
        self.shared.fetch_current().await;
    }

    fn schedule_fetch(&self) {
        self.shared.state.lock().loading = true;
        let shared = Arc::clone(&self.shared);
        self.debouncer.schedule(async move { shared.fetch_current().await });
    }
}

impl Drop for HistoryExplorer {
    fn drop(&mut self) {
        self.debouncer.cancel();
    }
}

fn validate_page_size(page_size: u32) -> Result<()> {
    if PAGE_SIZE_OPTIONS.contains(&page_size) {
        Ok(())
    } else {
        Err(PropmonError::InvalidInput(format!(
            "page size {page_size} is not one of {PAGE_SIZE_OPTIONS:?}"
        )))
    }
}
