//! The deal evaluator.
//!
//! `evaluate` runs the full chain for one deal:
//! growth rates -> growth tiers -> implied multiple -> discount -> interest ->
//! valuation -> runway. Zero denominators and overflowing quotients never abort
//! the chain; they null the affected field and are listed in
//! `EvaluationReport::issues`.

use tracing::debug;

use crate::domain::{
    DealInput, EvalIssue, EvaluationConfig, EvaluationReport, IndustryMultiples, Metric, MultipleMode,
};
use crate::error::EvalError;
use crate::eval::assess::{assess_discount, assess_interest, assess_runway, assess_valuation};
use crate::eval::growth::{categorize, growth_rates};

/// Shape checks applied before evaluation.
///
/// Rejects an empty revenue series and any non-finite number. Negative amounts
/// are passed through unchanged.
pub fn validate(deal: &DealInput) -> Result<(), EvalError> {
    if deal.yearly_revenue.is_empty() {
        return Err(EvalError::invalid("yearly_revenue", "at least one year of revenue is required"));
    }
    if let Some(idx) = deal.yearly_revenue.iter().position(|v| !v.is_finite()) {
        return Err(EvalError::invalid(
            "yearly_revenue",
            format!("year {} is not a finite number", idx + 1),
        ));
    }

    let scalars = [
        ("ask", deal.ask),
        ("valuation_cap", deal.valuation_cap),
        ("discount_rate", deal.discount_rate),
        ("interest", deal.interest),
        ("monthly_burn", deal.monthly_burn),
        ("current_cash", deal.current_cash),
        ("previous_raise", deal.previous_raise),
    ];
    for (field, value) in scalars {
        if !value.is_finite() {
            return Err(EvalError::invalid(field, "must be a finite number"));
        }
    }
    if let Some(months) = deal.months_of_cash {
        if !months.is_finite() {
            return Err(EvalError::invalid("months_of_cash", "must be a finite number"));
        }
    }
    Ok(())
}

/// Evaluate one deal against `config` and `benchmarks`.
pub fn evaluate(
    deal: &DealInput,
    config: &EvaluationConfig,
    benchmarks: &IndustryMultiples,
) -> Result<EvaluationReport, EvalError> {
    validate(deal)?;

    let mut issues = Vec::new();

    // 1) Growth rates and tiers.
    let growth_rates = growth_rates(&deal.yearly_revenue);
    for (idx, rate) in growth_rates.iter().enumerate() {
        if rate.is_none() {
            issues.push(undefined_issue(Metric::GrowthRate, idx, deal.yearly_revenue[idx]));
        }
    }
    let growth_rate_assessment = growth_rates.iter().map(|r| categorize(*r, config)).collect();

    // 2) Implied multiple(s).
    let first_year_multiple = multiple_of(deal.valuation_cap, deal.yearly_revenue[0]);
    if first_year_multiple.is_none() {
        issues.push(undefined_issue(Metric::ImpliedMultiple, 0, deal.yearly_revenue[0]));
    }
    let implied_multiples = match config.multiple_mode {
        MultipleMode::FirstYear => None,
        MultipleMode::PerYear => Some(
            deal.yearly_revenue
                .iter()
                .map(|revenue| multiple_of(deal.valuation_cap, *revenue))
                .collect(),
        ),
    };

    // 3) Deal terms.
    let discount_rate_assessment =
        assess_discount(&deal.security_type, deal.discount_rate, config.modeled_discount_rate);
    let interest_rate_assessment =
        assess_interest(&deal.security_type, deal.interest, config.modeled_interest_rate);

    // 4) Valuation against the industry benchmark.
    let benchmark = benchmarks.lookup(&deal.industry);
    if benchmark.is_fallback() {
        debug!(
            industry = %deal.industry,
            source = ?benchmark.source,
            multiple = benchmark.multiple,
            "no recorded benchmark multiple, using default"
        );
        issues.push(EvalIssue::BenchmarkFallback {
            industry: deal.industry.clone(),
            multiple: benchmark.multiple,
        });
    }
    let valuation_assessment =
        assess_valuation(first_year_multiple, benchmark.multiple, config.modeled_valuation_threshold);

    // 5) Runway.
    let runway = assess_runway(deal, config.runway_policy, config.modeled_cash_months);
    issues.extend(runway.issue);

    debug!(
        company = %deal.company_name,
        valuation = %valuation_assessment,
        runway = %runway.assessment,
        issues = issues.len(),
        "deal evaluated"
    );

    Ok(EvaluationReport {
        growth_rates,
        growth_rate_assessment,
        implied_multiple: first_year_multiple,
        implied_multiples,
        industry_multiple: benchmark.multiple,
        discount_rate_assessment,
        interest_rate_assessment,
        valuation_assessment,
        runway_assessment: runway.assessment,
        months_of_cash: runway.months_of_cash,
        issues,
    })
}

/// Stricter caller-level policy: treat any undefined metric as an error.
pub fn ensure_complete(report: &EvaluationReport) -> Result<(), EvalError> {
    for issue in &report.issues {
        match issue {
            EvalIssue::DivisionByZero { .. } => {
                return Err(EvalError::DivisionByZero {
                    what: issue.to_string(),
                });
            }
            EvalIssue::Overflow { .. } => {
                return Err(EvalError::Overflow {
                    what: issue.to_string(),
                });
            }
            EvalIssue::BenchmarkFallback { .. } => {}
        }
    }
    Ok(())
}

/// Valuation cap over one year's revenue; `None` for zero revenue or overflow.
fn multiple_of(valuation_cap: f64, revenue: f64) -> Option<f64> {
    if revenue == 0.0 {
        return None;
    }
    Some(valuation_cap / revenue).filter(|multiple| multiple.is_finite())
}

/// Why a metric keyed on `year_index` came out undefined.
fn undefined_issue(metric: Metric, year_index: usize, denominator: f64) -> EvalIssue {
    if denominator == 0.0 {
        EvalIssue::DivisionByZero {
            metric,
            year_index: Some(year_index),
        }
    } else {
        EvalIssue::Overflow {
            metric,
            year_index: Some(year_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DiscountAssessment, GrowthCategory, InterestAssessment, RunwayAssessment, SecurityType, ValuationAssessment,
    };

    fn sample_deal() -> DealInput {
        DealInput {
            company_name: "Achieve Clinics".to_string(),
            industry: "Software".to_string(),
            ask: 500_000.0,
            valuation_cap: 5_000_000.0,
            security_type: SecurityType::Safe,
            discount_rate: 0.20,
            interest: 0.0,
            yearly_revenue: vec![500_000.0, 750_000.0],
            monthly_burn: 10_000.0,
            current_cash: 240_000.0,
            previous_raise: 0.0,
            months_of_cash: None,
        }
    }

    #[test]
    fn high_valuation_against_software_benchmark() {
        let report = evaluate(
            &sample_deal(),
            &EvaluationConfig::default(),
            &IndustryMultiples::builtin(),
        )
        .unwrap();

        assert_eq!(report.implied_multiple, Some(10.0));
        assert_eq!(report.industry_multiple, 3.13);
        assert_eq!(report.valuation_assessment, ValuationAssessment::High);
        assert_eq!(report.growth_rates, vec![Some(50.0)]);
        assert_eq!(report.growth_rate_assessment, vec![GrowthCategory::Standard]);
        assert_eq!(report.discount_rate_assessment, DiscountAssessment::Standard);
        assert_eq!(report.interest_rate_assessment, InterestAssessment::DoesNotApply);
        assert_eq!(report.months_of_cash, Some(24.0));
        assert_eq!(report.runway_assessment, RunwayAssessment::Adequate);
        assert_eq!(report.implied_multiples, None);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn unknown_industry_uses_default_multiple() {
        let deal = DealInput {
            industry: "Nonexistent Sector".to_string(),
            // 2.5x sits inside the 25% band below the 3.0 default.
            valuation_cap: 1_250_000.0,
            ..sample_deal()
        };
        let report = evaluate(&deal, &EvaluationConfig::default(), &IndustryMultiples::builtin()).unwrap();

        assert_eq!(report.industry_multiple, 3.0);
        assert_eq!(report.valuation_assessment, ValuationAssessment::Fair);
        assert_eq!(
            report.issues,
            vec![EvalIssue::BenchmarkFallback {
                industry: "Nonexistent Sector".to_string(),
                multiple: 3.0,
            }]
        );
        assert!(ensure_complete(&report).is_ok());
    }

    #[test]
    fn zero_first_year_is_incomplete_not_an_error() {
        let deal = DealInput {
            yearly_revenue: vec![0.0, 100.0],
            ..sample_deal()
        };
        let report = evaluate(&deal, &EvaluationConfig::default(), &IndustryMultiples::builtin()).unwrap();

        assert_eq!(report.growth_rates, vec![None]);
        assert_eq!(report.growth_rate_assessment, vec![GrowthCategory::Undefined]);
        assert_eq!(report.implied_multiple, None);
        assert_eq!(report.valuation_assessment, ValuationAssessment::Incomplete);
        assert_eq!(report.issues.len(), 2);

        let err = ensure_complete(&report).unwrap_err();
        assert!(matches!(err, EvalError::DivisionByZero { .. }));
    }

    #[test]
    fn per_year_mode_reports_every_multiple() {
        let deal = DealInput {
            yearly_revenue: vec![500_000.0, 0.0, 1_000_000.0],
            ..sample_deal()
        };
        let config = EvaluationConfig {
            multiple_mode: MultipleMode::PerYear,
            ..EvaluationConfig::default()
        };
        let report = evaluate(&deal, &config, &IndustryMultiples::builtin()).unwrap();

        assert_eq!(report.implied_multiple, Some(10.0));
        assert_eq!(report.implied_multiples, Some(vec![Some(10.0), None, Some(5.0)]));
        // The valuation still keys off the first year.
        assert_eq!(report.valuation_assessment, ValuationAssessment::High);
        // Year 2 is zero, so the 2 -> 3 growth rate is undefined.
        assert_eq!(report.growth_rates, vec![Some(-100.0), None]);
    }

    #[test]
    fn empty_revenue_is_rejected() {
        let deal = DealInput {
            yearly_revenue: vec![],
            ..sample_deal()
        };
        let err = evaluate(&deal, &EvaluationConfig::default(), &IndustryMultiples::builtin()).unwrap_err();
        assert!(matches!(err, EvalError::InvalidInput { ref field, .. } if field == "yearly_revenue"));
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let deal = DealInput {
            valuation_cap: f64::INFINITY,
            ..sample_deal()
        };
        assert!(validate(&deal).is_err());

        let deal = DealInput {
            yearly_revenue: vec![1.0, f64::NAN],
            ..sample_deal()
        };
        assert!(validate(&deal).is_err());

        let deal = DealInput {
            months_of_cash: Some(f64::NAN),
            ..sample_deal()
        };
        assert!(validate(&deal).is_err());
    }

    #[test]
    fn overflowing_metrics_are_undefined_not_infinite() {
        let deal = DealInput {
            valuation_cap: 1e308,
            yearly_revenue: vec![1e-10, 1e300],
            monthly_burn: 1e-320,
            ..sample_deal()
        };
        let report = evaluate(&deal, &EvaluationConfig::default(), &IndustryMultiples::builtin()).unwrap();

        assert_eq!(report.growth_rates, vec![None]);
        assert_eq!(report.growth_rate_assessment, vec![GrowthCategory::Undefined]);
        assert_eq!(report.implied_multiple, None);
        assert_eq!(report.valuation_assessment, ValuationAssessment::Incomplete);
        assert_eq!(report.months_of_cash, None);
        assert_eq!(report.runway_assessment, RunwayAssessment::Unknown);
        assert_eq!(
            report.issues,
            vec![
                EvalIssue::Overflow {
                    metric: Metric::GrowthRate,
                    year_index: Some(0),
                },
                EvalIssue::Overflow {
                    metric: Metric::ImpliedMultiple,
                    year_index: Some(0),
                },
                EvalIssue::Overflow {
                    metric: Metric::MonthsOfCash,
                    year_index: None,
                },
            ]
        );

        let json = crate::io::report_json(&deal.company_name, &report).unwrap();
        assert!(json.contains("\"valuation_assessment\": \"Incomplete\""));
        assert!(json.contains("\"kind\": \"overflow\""));

        let err = ensure_complete(&report).unwrap_err();
        assert!(matches!(err, EvalError::Overflow { .. }));
    }

    #[test]
    fn custom_config_shifts_tiers() {
        let config = EvaluationConfig {
            modeled_discount_rate: 0.25,
            modeled_revenue_growth_standard: 0.75,
            ..EvaluationConfig::default()
        };
        let report = evaluate(&sample_deal(), &config, &IndustryMultiples::builtin()).unwrap();
        assert_eq!(report.discount_rate_assessment, DiscountAssessment::Lower);
        assert_eq!(report.growth_rate_assessment, vec![GrowthCategory::Low]);
    }
}
