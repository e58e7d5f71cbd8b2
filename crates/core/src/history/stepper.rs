//! Status stepper for a single proposal
//!
//! Steps are the distinct status codes of the proposal's business timeline in
//! the order they were first reached; the current step is the status of the
//! most recent record.

use chrono::NaiveDateTime;
use propmon_domain::ProposalHistoryRecord;
use serde::Serialize;

use super::aggregator::{timeline_for, SortOrder, TimelineFlag};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusStep {
    pub status_code: String,
    pub status_label: String,
    pub first_reached: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusStepper {
    steps: Vec<StatusStep>,
    current: Option<usize>,
}

impl StatusStepper {
    /// Build from a timeline already sorted oldest first.
    #[must_use]
    pub fn from_timeline(ascending: &[ProposalHistoryRecord]) -> Self {
        let mut steps: Vec<StatusStep> = Vec::new();
        for record in ascending {
            if !steps.iter().any(|s| s.status_code == record.status_code) {
                steps.push(StatusStep {
                    status_code: record.status_code.clone(),
                    status_label: record.status_label.clone(),
                    first_reached: record.evolution_date,
                });
            }
        }

        let current = ascending
            .last()
            .and_then(|last| steps.iter().position(|s| s.status_code == last.status_code));

        Self { steps, current }
    }

    /// Stepper over the business timeline of `proposal_id`.
    #[must_use]
    pub fn for_proposal(records: &[ProposalHistoryRecord], proposal_id: u64) -> Self {
        Self::from_timeline(&timeline_for(
            records,
            proposal_id,
            TimelineFlag::Business,
            SortOrder::Ascending,
        ))
    }

    #[must_use]
    pub fn steps(&self) -> &[StatusStep] {
        &self.steps
    }

    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&StatusStep> {
        self.current.and_then(|i| self.steps.get(i))
    }

    /// Steps up to and including the current one are complete.
    #[must_use]
    pub fn is_completed(&self, index: usize) -> bool {
        self.current.is_some_and(|current| index <= current)
    }

    /// `index(current) / (steps - 1) * 100`; 0 with fewer than two steps.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        match (self.current, self.steps.len()) {
            (Some(current), len) if len > 1 => {
                #[allow(clippy::cast_precision_loss)]
                let ratio = current as f64 / (len - 1) as f64;
                ratio * 100.0
            }
            _ => 0.0,
        }
    }
}
