//! Credit contract lookup types (`/credito/contrato`)

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CONTRACT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub co_contrato: String,
    pub nu_contrato: String,
    pub nu_cpf_cnpj: u64,
    pub dt_contratacao: String,
    pub vr_contrato: f64,
    pub no_situacao: String,
    pub is_legado: bool,
    #[serde(default)]
    pub dt_fim_contrato: Option<String>,
    #[serde(default)]
    pub novacao: bool,
    #[serde(default)]
    pub dh_situacao: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractResponse {
    pub page: u32,
    pub size: u32,
    pub total: u64,
    /// Set when the upstream contract system (SIFEC) failed
    #[serde(rename = "erroSIFEC", default)]
    pub upstream_error: bool,
    pub data: Vec<Contract>,
}

/// Contract lookup parameters. Pages are one-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractQuery {
    pub contract_number: String,
    pub size: u32,
    pub page: u32,
}

impl ContractQuery {
    #[must_use]
    pub fn new(contract_number: impl Into<String>) -> Self {
        Self { contract_number: contract_number.into(), size: DEFAULT_CONTRACT_PAGE_SIZE, page: 1 }
    }

    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("nuContrato", self.contract_number.clone()),
            ("size", self.size.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}
