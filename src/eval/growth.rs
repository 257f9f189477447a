//! Year-over-year revenue growth and its tiering.

use crate::domain::{EvaluationConfig, GrowthCategory};

/// Growth in percent from `previous` to `current`.
///
/// Returns `None` when `previous` is exactly zero or the rate overflows.
pub fn growth_rate(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0).filter(|rate| rate.is_finite())
}

/// Growth for every consecutive pair of years (`n` years -> `n - 1` rates).
pub fn growth_rates(yearly_revenue: &[f64]) -> Vec<Option<f64>> {
    yearly_revenue
        .windows(2)
        .map(|pair| growth_rate(pair[0], pair[1]))
        .collect()
}

/// Tier a growth rate (percent) against the configured thresholds.
///
/// The aggressive boundary is checked first, so a rate equal to it is
/// `Aggressive`. `modeled_revenue_growth_low` is not a boundary: anything
/// under the standard threshold is `Low`.
pub fn categorize(rate: Option<f64>, config: &EvaluationConfig) -> GrowthCategory {
    let Some(rate) = rate else {
        return GrowthCategory::Undefined;
    };
    if rate >= config.modeled_revenue_growth_aggressive * 100.0 {
        GrowthCategory::Aggressive
    } else if rate >= config.modeled_revenue_growth_standard * 100.0 {
        GrowthCategory::Standard
    } else {
        GrowthCategory::Low
    }
}
