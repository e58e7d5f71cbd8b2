//! Client-side reshaping of dashboard aggregates

use propmon_domain::{FunnelStage, GerAlert, StatusShare};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

/// Recompute each share's percentage from the quantities (two decimals).
#[must_use]
pub fn normalize_distribution(mut shares: Vec<StatusShare>) -> Vec<StatusShare> {
    let total = shares.iter().fold(0_u64, |sum, s| sum.saturating_add(s.quantity));
    for share in &mut shares {
        share.percentage = percentage(share.quantity, total);
    }
    shares
}

/// Order stages and recompute conversion relative to the first stage.
#[must_use]
pub fn funnel_with_conversion(mut stages: Vec<FunnelStage>) -> Vec<FunnelStage> {
    stages.sort_by_key(|s| s.order);
    let first = stages.first().map_or(0, |s| s.proposals);
    for stage in &mut stages {
        stage.conversion_rate = percentage(stage.proposals, first);
    }
    stages
}

/// Keep alerts whose status matches `status` (case-insensitive). `None`,
/// blank and `"all"` keep everything.
#[must_use]
pub fn filter_alerts_by_status(alerts: Vec<GerAlert>, status: Option<&str>) -> Vec<GerAlert> {
    match status.map(str::trim) {
        None | Some("") => alerts,
        Some(wanted) if wanted.eq_ignore_ascii_case("all") => alerts,
        Some(wanted) => {
            alerts.into_iter().filter(|a| a.alert_status.eq_ignore_ascii_case(wanted)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(code: &str, quantity: u64) -> StatusShare {
        StatusShare {
            status_code: code.to_string(),
            status_label: code.to_string(),
            quantity,
            percentage: -1.0,
        }
    }

    fn stage(order: u32, code: &str, proposals: u64) -> FunnelStage {
        FunnelStage {
            order,
            stage: code.to_string(),
            description: String::new(),
            proposals,
            conversion_rate: 0.0,
        }
    }

    fn alert(id: u64, status: &str) -> GerAlert {
        GerAlert {
            proposal_id: id,
            hours_in_ger: 3.5,
            alert_status: status.to_string(),
            last_update: "2024-05-01T10:00:00".to_string(),
            channel: 1,
            company: 1,
            status_number: 1,
            status_code: "GER".to_string(),
            status_label: "PROPOSTA GERADA".to_string(),
        }
    }

    #[test]
    fn distribution_percentages_use_quantities() {
        let shares = normalize_distribution(vec![share("GER", 1), share("PEN", 2)]);
        assert!((shares[0].percentage - 33.33).abs() < 1e-9);
        assert!((shares[1].percentage - 66.67).abs() < 1e-9);
    }

    #[test]
    fn empty_distribution_is_zero() {
        let shares = normalize_distribution(vec![share("GER", 0)]);
        assert!(shares[0].percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn huge_quantities_saturate_instead_of_overflowing() {
        let shares = normalize_distribution(vec![share("GER", u64::MAX), share("PEN", u64::MAX)]);
        assert!((shares[0].percentage - 100.0).abs() < 1e-9);
        assert!(shares.iter().all(|s| s.percentage.is_finite()));
    }

    #[test]
    fn funnel_conversion_relative_to_first_stage() {
        let stages = funnel_with_conversion(vec![
            stage(3, "EMT", 156),
            stage(1, "GER", 245),
            stage(4, "ATV", 132),
            stage(2, "PAE", 187),
        ]);
        let rates: Vec<f64> = stages.iter().map(|s| s.conversion_rate).collect();
        assert_eq!(stages[0].stage, "GER");
        assert_eq!(rates, vec![100.0, 76.33, 63.67, 53.88]);
    }

    #[test]
    fn alert_filter_is_case_insensitive() {
        let alerts = vec![alert(1, "CRITICO"), alert(2, "ATENCAO"), alert(3, "critico")];
        assert_eq!(filter_alerts_by_status(alerts.clone(), Some("critico")).len(), 2);
        assert_eq!(filter_alerts_by_status(alerts.clone(), Some("all")).len(), 3);
        assert_eq!(filter_alerts_by_status(alerts, None).len(), 3);
    }
}
