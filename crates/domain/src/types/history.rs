//! Proposal history types
//!
//! Records of how a proposal moved through the workflow, as returned by
//! `/monitoracao/v1/propostas/filtros` and `/monitoracao/v1/propostas/ultimaSituacao`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::utils::dates::{api_timestamp, format_query_date};

/* -------------------------------------------------------------------------- */
/* Indicator flags */
/* -------------------------------------------------------------------------- */

/// `"S"` / `"N"` indicator used by the history API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorFlag {
    #[serde(rename = "S")]
    Yes,
    #[default]
    #[serde(rename = "N")]
    No,
}

impl IndicatorFlag {
    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/* -------------------------------------------------------------------------- */
/* History records */
/* -------------------------------------------------------------------------- */

/// One evolution event of a proposal.
///
/// Many records share a `proposal_id`; each describes the status the
/// proposal reached at `evolution_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalHistoryRecord {
    #[serde(rename = "dataEvolucao", with = "api_timestamp")]
    pub evolution_date: NaiveDateTime,
    #[serde(rename = "contrato", default)]
    pub contract_id: Option<String>,
    #[serde(rename = "nuPropostaSeguridade")]
    pub proposal_id: u64,
    #[serde(rename = "sgSituacaoProposta")]
    pub status_code: String,
    #[serde(rename = "deSituacaoProposta", default)]
    pub status_label: String,
    #[serde(rename = "deAcaoFluxoServico", default)]
    pub flow_action: String,
    #[serde(rename = "deFluxoServicoSeguridade", default)]
    pub flow_type_label: String,
    #[serde(rename = "deMotivoSistema", default)]
    pub system_reason: Option<String>,
    #[serde(rename = "icMonitoracao", default)]
    pub monitoring_flag: IndicatorFlag,
    #[serde(rename = "icNegocial", default)]
    pub business_flag: IndicatorFlag,
}

/// Server-side paging window. `count` is the total across all pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
    pub count: u64,
}

impl Pagination {
    /// Number of pages needed to show `count` rows, `limit` rows at a time.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.count.div_ceil(self.limit)
        }
    }
}

/// Filter values echo the request; the proposal id comes back either as a
/// number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(u64),
    Text(String),
}

/// Filters the server applied to a history query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFilters {
    #[serde(rename = "nuPropostaSeguridade", default)]
    pub proposal_id: Option<FilterValue>,
    #[serde(rename = "sgSituacaoProposta", default)]
    pub status_code: Option<String>,
    #[serde(rename = "dataInicio", default)]
    pub date_from: Option<String>,
    #[serde(rename = "dataFim", default)]
    pub date_to: Option<String>,
}

/// Page of history records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalHistoryResponse {
    #[serde(rename = "propostas")]
    pub records: Vec<ProposalHistoryRecord>,
    #[serde(rename = "paginacao")]
    pub pagination: Pagination,
    #[serde(rename = "filtros", default)]
    pub applied_filters: AppliedFilters,
    #[serde(default)]
    pub timestamp: String,
}

/// Latest known situation of one proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestStatusRecord {
    #[serde(rename = "nuPropostaSeguridade")]
    pub proposal_id: u64,
    #[serde(rename = "dataEvolucao", with = "api_timestamp")]
    pub evolution_date: NaiveDateTime,
    #[serde(rename = "nuPropostaGPFDV", default)]
    pub gpfdv_proposal: Option<String>,
    #[serde(rename = "nuSituacaoProposta")]
    pub status_number: i64,
    #[serde(rename = "sgSituacaoProposta")]
    pub status_code: String,
    #[serde(rename = "contrato", default)]
    pub contract_id: Option<String>,
    #[serde(rename = "txtMotivo", default)]
    pub reason_text: Option<String>,
    #[serde(rename = "nuMotivoSistema", default)]
    pub system_reason_number: Option<i64>,
    #[serde(rename = "deMotivoSistema", default)]
    pub system_reason: Option<String>,
    #[serde(rename = "nuMonitoracaoSistema", default)]
    pub monitoring_number: Option<i64>,
    #[serde(rename = "NU_LINHA", default)]
    pub row_number: u64,
}

/// Page of latest-status rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestStatusResponse {
    #[serde(rename = "propostas")]
    pub records: Vec<LatestStatusRecord>,
    #[serde(rename = "paginacao")]
    pub pagination: Pagination,
    #[serde(rename = "filtros", default)]
    pub applied_filters: AppliedFilters,
    #[serde(default)]
    pub timestamp: String,
}

/* -------------------------------------------------------------------------- */
/* Queries */
/* -------------------------------------------------------------------------- */

/// User-editable history filters. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilters {
    pub proposal_id: Option<String>,
    pub status_code: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl HistoryFilters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        non_blank(self.proposal_id.as_deref()).is_none()
            && non_blank(self.status_code.as_deref()).is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Query pairs for the filter fields, in API order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(id) = non_blank(self.proposal_id.as_deref()) {
            pairs.push(("nuPropostaSeguridade", id.to_string()));
        }
        if let Some(code) = non_blank(self.status_code.as_deref()) {
            pairs.push(("sgSituacaoProposta", code.to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("dataInicio", format_query_date(from)));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dataFim", format_query_date(to)));
        }
        pairs
    }
}

/// History request: filters plus a paging window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub filters: HistoryFilters,
    pub offset: u64,
    pub limit: u64,
}

impl HistoryQuery {
    /// Query for page `page` (zero-based) of `page_size` rows.
    #[must_use]
    pub fn for_page(filters: HistoryFilters, page: u64, page_size: u64) -> Self {
        Self { filters, offset: page.saturating_mul(page_size), limit: page_size }
    }

    /// Full query string pairs. Zero `offset`/`limit` are omitted.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.filters.to_query_pairs();
        if self.offset > 0 {
            pairs.push(("offset", self.offset.to_string()));
        }
        if self.limit > 0 {
            pairs.push(("limit", self.limit.to_string()));
        }
        pairs
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD_JSON: &str = r#"{
        "dataEvolucao": "05/03/2024 14:20",
        "contrato": "CT-1",
        "nuPropostaSeguridade": 8001,
        "sgSituacaoProposta": "GER",
        "deSituacaoProposta": "PROPOSTA GERADA",
        "deAcaoFluxoServico": "CRIAR",
        "deFluxoServicoSeguridade": "FLUXO PADRAO",
        "deMotivoSistema": null,
        "icMonitoracao": "N",
        "icNegocial": "S"
    }"#;

    #[test]
    fn record_deserializes_wire_names() {
        let record: ProposalHistoryRecord = serde_json::from_str(RECORD_JSON).unwrap();
        assert_eq!(record.proposal_id, 8001);
        assert_eq!(record.status_code, "GER");
        assert_eq!(record.contract_id.as_deref(), Some("CT-1"));
        assert!(record.business_flag.is_set());
        assert!(!record.monitoring_flag.is_set());
        assert_eq!(record.system_reason, None);
        assert_eq!(
            record.evolution_date,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 20, 0).unwrap()
        );
    }

    #[test]
    fn record_rejects_unknown_timestamp_shape() {
        let bad = RECORD_JSON.replace("05/03/2024 14:20", "March 5th");
        assert!(serde_json::from_str::<ProposalHistoryRecord>(&bad).is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Pagination { offset: 0, limit: 10, count: 37 };
        assert_eq!(page.total_pages(), 4);
        assert_eq!(Pagination { offset: 0, limit: 10, count: 40 }.total_pages(), 4);
        assert_eq!(Pagination { offset: 0, limit: 0, count: 37 }.total_pages(), 0);
        assert_eq!(Pagination::default().total_pages(), 0);
    }

    #[test]
    fn applied_filters_accept_numeric_or_text_ids() {
        let numeric: AppliedFilters =
            serde_json::from_str(r#"{"nuPropostaSeguridade": 42, "sgSituacaoProposta": null}"#)
                .unwrap();
        assert_eq!(numeric.proposal_id, Some(FilterValue::Number(42)));

        let text: AppliedFilters =
            serde_json::from_str(r#"{"nuPropostaSeguridade": "42"}"#).unwrap();
        assert_eq!(text.proposal_id, Some(FilterValue::Text("42".to_string())));
    }

    #[test]
    fn query_pairs_skip_empty_filters() {
        let filters = HistoryFilters {
            proposal_id: Some("  ".to_string()),
            status_code: Some("PEN".to_string()),
            date_from: NaiveDate::from_ymd_opt(2024, 1, 2),
            date_to: None,
        };
        let query = HistoryQuery::for_page(filters, 0, 10);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("sgSituacaoProposta", "PEN".to_string()),
                ("dataInicio", "2024-01-02".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn page_offset_is_page_times_size() {
        let query = HistoryQuery::for_page(HistoryFilters::default(), 3, 20);
        assert_eq!(query.offset, 60);
        assert!(query.to_query_pairs().contains(&("offset", "60".to_string())));
        assert!(HistoryFilters::default().is_empty());
    }
}
