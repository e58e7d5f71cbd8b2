//! Dashboard commands: overview cards, alerts, distribution, funnel and
//! contract lookup

use chrono::NaiveDate;
use propmon_core::DashboardSource;
use propmon_domain::{
    ContractQuery, ContractResponse, FunnelStage, GerAlert, OverviewStat, PropmonError, Result,
    StatusDistributionParams, StatusShare,
};

use crate::context::AppContext;
use crate::utils::logging::run_logged;

/// The four overview cards.
///
/// # Errors
/// Returns the source error when neither the API nor the fixtures answer.
pub async fn overview(ctx: &AppContext) -> Result<Vec<OverviewStat>> {
    run_logged("dashboard::overview", ctx.dashboard.overview()).await
}

/// GER alerts, optionally narrowed to one alert status (`"all"` keeps
/// everything).
///
/// # Errors
/// Returns the source error when neither the API nor the fixtures answer.
pub async fn alerts(ctx: &AppContext, status: Option<&str>) -> Result<Vec<GerAlert>> {
    run_logged("dashboard::alerts", ctx.dashboard.alerts(status)).await
}

/// Status distribution within an optional date window.
///
/// # Errors
/// Returns [`PropmonError::InvalidInput`] when `from` is after `to`.
pub async fn distribution(
    ctx: &AppContext,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<StatusShare>> {
    run_logged("dashboard::distribution", async {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(PropmonError::InvalidInput(format!(
                    "date range start {from} is after its end {to}"
                )));
            }
        }
        let params = StatusDistributionParams { date_from: from, date_to: to };
        ctx.dashboard.distribution(&params).await
    })
    .await
}

/// Funnel stages in order with conversion relative to the first stage.
///
/// # Errors
/// Returns the source error when neither the API nor the fixtures answer.
pub async fn funnel(ctx: &AppContext) -> Result<Vec<FunnelStage>> {
    run_logged("dashboard::funnel", ctx.dashboard.funnel()).await
}

/// Look up a credit contract by number.
///
/// # Errors
/// Returns [`PropmonError::InvalidInput`] for a blank number and
/// [`PropmonError::NotFound`] when no contract matches.
pub async fn contract(ctx: &AppContext, number: &str) -> Result<ContractResponse> {
    run_logged("dashboard::contract", async {
        let number = number.trim();
        if number.is_empty() {
            return Err(PropmonError::InvalidInput("contract number must not be blank".into()));
        }
        let response = ctx.dashboard.fetch_contract(&ContractQuery::new(number)).await?;
        if response.data.is_empty() {
            return Err(PropmonError::NotFound(format!("contract {number}")));
        }
        Ok(response)
    })
    .await
}
