//! Threshold assessments: discount, interest, valuation and runway.
//!
//! Each function is a pure comparison of one deal term against one configured
//! benchmark. The "standard" branch of the rate comparisons is an exact float
//! equality: rates are expected to arrive as the same decimal literal the
//! config uses (`0.20` vs `0.20`). Values that only round to the modeled rate
//! land in `Lower`/`Higher`.

use crate::domain::{
    DealInput, DiscountAssessment, EvalIssue, InterestAssessment, Metric, RunwayAssessment, RunwayPolicy,
    SecurityType, ValuationAssessment,
};

/// Position of a deal rate relative to the modeled rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBand {
    Zero,
    Lower,
    Standard,
    Higher,
}

/// Zero first, then below / equal / above the modeled rate.
pub fn rate_band(rate: f64, modeled: f64) -> RateBand {
    if rate == 0.0 {
        RateBand::Zero
    } else if rate < modeled {
        RateBand::Lower
    } else if rate == modeled {
        RateBand::Standard
    } else {
        RateBand::Higher
    }
}

pub fn assess_discount(security: &SecurityType, discount_rate: f64, modeled: f64) -> DiscountAssessment {
    if !security.carries_discount() {
        return DiscountAssessment::DoesNotApply;
    }
    match rate_band(discount_rate, modeled) {
        RateBand::Zero => DiscountAssessment::Zero,
        RateBand::Lower => DiscountAssessment::Lower,
        RateBand::Standard => DiscountAssessment::Standard,
        RateBand::Higher => DiscountAssessment::Higher,
    }
}

pub fn assess_interest(security: &SecurityType, interest: f64, modeled: f64) -> InterestAssessment {
    if !security.accrues_interest() {
        return InterestAssessment::DoesNotApply;
    }
    match rate_band(interest, modeled) {
        RateBand::Zero => InterestAssessment::Zero,
        RateBand::Lower => InterestAssessment::Lower,
        RateBand::Standard => InterestAssessment::Standard,
        RateBand::Higher => InterestAssessment::Higher,
    }
}

/// Judge an implied multiple against the industry benchmark.
///
/// - above the benchmark: `High`
/// - within `threshold` (fraction) below it: `Fair`
/// - further below: `Favorable`
pub fn assess_valuation(implied_multiple: Option<f64>, industry_multiple: f64, threshold: f64) -> ValuationAssessment {
    let Some(implied) = implied_multiple else {
        return ValuationAssessment::Incomplete;
    };
    if implied > industry_multiple {
        ValuationAssessment::High
    } else if implied >= (1.0 - threshold) * industry_multiple {
        ValuationAssessment::Fair
    } else {
        ValuationAssessment::Favorable
    }
}

/// Runway outcome: the figure used, its assessment, and any zero-denominator issue.
#[derive(Debug, Clone, PartialEq)]
pub struct Runway {
    pub months_of_cash: Option<f64>,
    pub assessment: RunwayAssessment,
    pub issue: Option<EvalIssue>,
}

/// Assess runway under `policy`; more than `modeled_months` is adequate.
pub fn assess_runway(deal: &DealInput, policy: RunwayPolicy, modeled_months: f64) -> Runway {
    let (months_of_cash, issue) = match policy {
        RunwayPolicy::Supplied => (deal.months_of_cash.filter(|m| *m != 0.0), None),
        RunwayPolicy::Computed => {
            if deal.monthly_burn == 0.0 {
                (
                    None,
                    Some(EvalIssue::DivisionByZero {
                        metric: Metric::MonthsOfCash,
                        year_index: None,
                    }),
                )
            } else {
                let months = deal.current_cash / deal.monthly_burn;
                if months.is_finite() {
                    (Some(months), None)
                } else {
                    (
                        None,
                        Some(EvalIssue::Overflow {
                            metric: Metric::MonthsOfCash,
                            year_index: None,
                        }),
                    )
                }
            }
        }
    };

    let assessment = match months_of_cash {
        None => RunwayAssessment::Unknown,
        Some(months) if months > modeled_months => RunwayAssessment::Adequate,
        Some(_) => RunwayAssessment::Inadequate,
    };

    Runway {
        months_of_cash,
        assessment,
        issue,
    }
}
