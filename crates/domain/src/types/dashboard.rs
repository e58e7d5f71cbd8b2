//! Dashboard resource types
//!
//! KPIs, GER alerts, status distribution and the conversion funnel.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::history::Pagination;
use crate::utils::dates::format_query_date;

/* -------------------------------------------------------------------------- */
/* KPIs */
/* -------------------------------------------------------------------------- */

/// Raw `/kpis` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    #[serde(rename = "totalPropostas")]
    pub total_proposals: u64,
    #[serde(rename = "propostasAtivas")]
    pub active_proposals: u64,
    #[serde(rename = "propostasGER2h")]
    pub ger_over_two_hours: u64,
    #[serde(rename = "taxaConversao")]
    pub conversion_rate: f64,
}

impl KpiSummary {
    /// Overview cards in display order.
    #[must_use]
    pub fn overview_cards(&self) -> Vec<OverviewStat> {
        vec![
            OverviewStat::new(1, "Total Propostas", StatValue::Count(self.total_proposals)),
            OverviewStat::new(2, "Propostas Ativas", StatValue::Count(self.active_proposals)),
            OverviewStat::new(3, "Propostas GER 2h", StatValue::Count(self.ger_over_two_hours)),
            OverviewStat::new(
                4,
                "Taxa de Conversão",
                StatValue::Text(format!("{}%", self.conversion_rate)),
            ),
        ]
    }
}

/// Card value: a count or preformatted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(u64),
    Text(String),
}

/// One overview card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewStat {
    pub id: u32,
    pub title: String,
    pub value: StatValue,
}

impl OverviewStat {
    fn new(id: u32, title: &str, value: StatValue) -> Self {
        Self { id, title: title.to_string(), value }
    }
}

/* -------------------------------------------------------------------------- */
/* GER alerts */
/* -------------------------------------------------------------------------- */

/// A proposal that has stayed in GER status for more than two hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GerAlert {
    #[serde(rename = "nuPropostaSeguridade")]
    pub proposal_id: u64,
    #[serde(rename = "horasEmGer")]
    pub hours_in_ger: f64,
    #[serde(rename = "statusAlerta")]
    pub alert_status: String,
    #[serde(rename = "ultimaAtualizacao")]
    pub last_update: String,
    #[serde(rename = "nuCanalSeguridade")]
    pub channel: i64,
    #[serde(rename = "nuEmpresaSeguridade")]
    pub company: i64,
    #[serde(rename = "nuSituacaoProposta")]
    pub status_number: i64,
    #[serde(rename = "sgSituacaoProposta")]
    pub status_code: String,
    #[serde(rename = "deSituacaoProposta")]
    pub status_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GerAlertResponse {
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "propostas")]
    pub alerts: Vec<GerAlert>,
    #[serde(rename = "paginacao", default)]
    pub pagination: Pagination,
}

/* -------------------------------------------------------------------------- */
/* Status distribution */
/* -------------------------------------------------------------------------- */

/// Share of proposals currently in one status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusShare {
    #[serde(rename = "sgSituacaoProposta")]
    pub status_code: String,
    #[serde(rename = "deSituacaoProposta")]
    pub status_label: String,
    #[serde(rename = "quantidade")]
    pub quantity: u64,
    #[serde(rename = "percentual")]
    pub percentage: f64,
}

/// Optional date window for `/distribuicao-situacao`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusDistributionParams {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl StatusDistributionParams {
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(from) = self.date_from {
            pairs.push(("dataInicio", format_query_date(from)));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dataFim", format_query_date(to)));
        }
        pairs
    }
}

/* -------------------------------------------------------------------------- */
/* Funnel */
/* -------------------------------------------------------------------------- */

/// One stage of the conversion funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    #[serde(rename = "ORDEM")]
    pub order: u32,
    #[serde(rename = "ETAPA")]
    pub stage: String,
    #[serde(rename = "DESCRICAO")]
    pub description: String,
    #[serde(rename = "QTD_PROPOSTAS")]
    pub proposals: u64,
    #[serde(rename = "TAXA_CONVERSAO")]
    pub conversion_rate: f64,
}
