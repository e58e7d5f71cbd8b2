//! Grouping and timeline helpers for proposal history records
//!
//! All functions are pure and operate on the slice they are given; they do
//! not assume any input ordering.

use std::collections::HashMap;

use propmon_domain::ProposalHistoryRecord;
use serde::Serialize;

/// Which indicator selects records for a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineFlag {
    /// `icNegocial == "S"`
    Business,
    /// `icMonitoracao == "S"`
    Monitoring,
}

impl TimelineFlag {
    fn selects(self, record: &ProposalHistoryRecord) -> bool {
        match self {
            Self::Business => record.business_flag.is_set(),
            Self::Monitoring => record.monitoring_flag.is_set(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first (stepper)
    Ascending,
    /// Newest first (display)
    Descending,
}

/// Latest record of a proposal plus how many records the proposal has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub record: ProposalHistoryRecord,
    pub occurrences: usize,
}

impl HistoryRow {
    /// Drill-down is offered when the proposal has more than one record.
    #[must_use]
    pub const fn has_detail(&self) -> bool {
        self.occurrences > 1
    }
}

/// One record per proposal id: the one with the latest evolution date.
///
/// Output keeps the position at which each proposal id was first seen. On
/// equal dates the record seen later wins.
#[must_use]
pub fn group_latest_by_proposal(records: &[ProposalHistoryRecord]) -> Vec<ProposalHistoryRecord> {
    let mut slots: HashMap<u64, usize> = HashMap::with_capacity(records.len());
    let mut latest: Vec<&ProposalHistoryRecord> = Vec::new();

    for record in records {
        match slots.get(&record.proposal_id) {
            Some(&slot) => {
                if latest[slot].evolution_date <= record.evolution_date {
                    latest[slot] = record;
                }
            }
            None => {
                slots.insert(record.proposal_id, latest.len());
                latest.push(record);
            }
        }
    }

    latest.into_iter().cloned().collect()
}

/// Number of records belonging to `proposal_id`.
#[must_use]
pub fn count_occurrences(records: &[ProposalHistoryRecord], proposal_id: u64) -> usize {
    records.iter().filter(|r| r.proposal_id == proposal_id).count()
}

#[must_use]
pub fn has_detail(records: &[ProposalHistoryRecord], proposal_id: u64) -> bool {
    count_occurrences(records, proposal_id) > 1
}

/// Grouped rows with occurrence counts, in first-seen order.
#[must_use]
pub fn summarize(records: &[ProposalHistoryRecord]) -> Vec<HistoryRow> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.proposal_id).or_default() += 1;
    }
    group_latest_by_proposal(records)
        .into_iter()
        .map(|record| {
            let occurrences = counts.get(&record.proposal_id).copied().unwrap_or(1);
            HistoryRow { record, occurrences }
        })
        .collect()
}

/// Records of `proposal_id` selected by `flag`, sorted by evolution date.
///
/// The sort is stable: records with equal dates keep their input order.
#[must_use]
pub fn timeline_for(
    records: &[ProposalHistoryRecord],
    proposal_id: u64,
    flag: TimelineFlag,
    order: SortOrder,
) -> Vec<ProposalHistoryRecord> {
    let mut timeline: Vec<ProposalHistoryRecord> = records
        .iter()
        .filter(|r| r.proposal_id == proposal_id && flag.selects(r))
        .cloned()
        .collect();

    match order {
        SortOrder::Ascending => timeline.sort_by(|a, b| a.evolution_date.cmp(&b.evolution_date)),
        SortOrder::Descending => timeline.sort_by(|a, b| b.evolution_date.cmp(&a.evolution_date)),
    }
    timeline
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use propmon_domain::IndicatorFlag;

    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn record(id: u64, status: &str, when: NaiveDateTime) -> ProposalHistoryRecord {
        ProposalHistoryRecord {
            evolution_date: when,
            contract_id: None,
            proposal_id: id,
            status_code: status.to_string(),
            status_label: format!("label {status}"),
            flow_action: "ACAO".to_string(),
            flow_type_label: "FLUXO".to_string(),
            system_reason: None,
            monitoring_flag: IndicatorFlag::No,
            business_flag: IndicatorFlag::Yes,
        }
    }

    #[test]
    fn keeps_latest_record_for_out_of_order_input() {
        let records = vec![
            record(1, "PEN", at(2, 0)),
            record(1, "APR", at(3, 0)),
            record(1, "GER", at(1, 0)),
        ];
        let grouped = group_latest_by_proposal(&records);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].status_code, "APR");
    }

    #[test]
    fn preserves_first_encounter_order() {
        let records = vec![
            record(20, "GER", at(1, 0)),
            record(10, "GER", at(1, 0)),
            record(20, "PEN", at(4, 0)),
            record(30, "GER", at(2, 0)),
        ];
        let ids: Vec<u64> =
            group_latest_by_proposal(&records).iter().map(|r| r.proposal_id).collect();
        assert_eq!(ids, vec![20, 10, 30]);
    }

    #[test]
    fn later_record_wins_ties() {
        let records = vec![record(1, "GER", at(1, 9)), record(1, "ENV", at(1, 9))];
        assert_eq!(group_latest_by_proposal(&records)[0].status_code, "ENV");
    }

    #[test]
    fn grouping_is_idempotent() {
        let records = vec![
            record(1, "GER", at(1, 0)),
            record(2, "GER", at(1, 1)),
            record(1, "PEN", at(2, 0)),
        ];
        let once = group_latest_by_proposal(&records);
        assert_eq!(group_latest_by_proposal(&once), once);
    }

    #[test]
    fn counts_and_detail_flags() {
        let records = vec![
            record(1, "GER", at(1, 0)),
            record(2, "GER", at(1, 0)),
            record(1, "PEN", at(2, 0)),
        ];
        assert_eq!(count_occurrences(&records, 1), 2);
        assert!(has_detail(&records, 1));
        assert!(!has_detail(&records, 2));
        assert_eq!(count_occurrences(&records, 99), 0);

        let rows = summarize(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].occurrences, 2);
        assert!(rows[0].has_detail());
        assert_eq!(rows[0].record.status_code, "PEN");
        assert!(!rows[1].has_detail());
    }

    #[test]
    fn timeline_filters_by_flag_and_sorts() {
        let mut monitoring_only = record(1, "VNC", at(2, 12));
        monitoring_only.business_flag = IndicatorFlag::No;
        monitoring_only.monitoring_flag = IndicatorFlag::Yes;

        let records = vec![
            record(1, "PEN", at(2, 0)),
            monitoring_only,
            record(1, "GER", at(1, 0)),
            record(2, "GER", at(1, 0)),
            record(1, "APR", at(3, 0)),
        ];

        let ascending = timeline_for(&records, 1, TimelineFlag::Business, SortOrder::Ascending);
        let codes: Vec<&str> = ascending.iter().map(|r| r.status_code.as_str()).collect();
        assert_eq!(codes, ["GER", "PEN", "APR"]);

        let descending = timeline_for(&records, 1, TimelineFlag::Business, SortOrder::Descending);
        let codes: Vec<&str> = descending.iter().map(|r| r.status_code.as_str()).collect();
        assert_eq!(codes, ["APR", "PEN", "GER"]);

        let monitoring = timeline_for(&records, 1, TimelineFlag::Monitoring, SortOrder::Descending);
        assert_eq!(monitoring.len(), 1);
        assert_eq!(monitoring[0].status_code, "VNC");
    }

    #[test]
    fn timeline_sort_is_stable_for_equal_dates() {
        let records = vec![record(1, "A", at(1, 0)), record(1, "B", at(1, 0))];
        let asc = timeline_for(&records, 1, TimelineFlag::Business, SortOrder::Ascending);
        let desc = timeline_for(&records, 1, TimelineFlag::Business, SortOrder::Descending);
        assert_eq!(asc[0].status_code, "A");
        assert_eq!(desc[0].status_code, "A");
    }
}
