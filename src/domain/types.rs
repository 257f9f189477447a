//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - deserialized straight from deal JSON / config override files
//! - passed by reference through the evaluator
//! - exported to JSON/CSV unchanged

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Instrument being offered in the round.
///
/// Only the four instruments the tool knows about get their own variant; any
/// other label is carried through verbatim so it still shows up in reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SecurityType {
    ConvertibleNote,
    Safe,
    CommonEquity,
    PreferredEquity,
    Other(String),
}

impl SecurityType {
    /// The instruments the tool has explicit rules for.
    pub const KNOWN: [SecurityType; 4] = [
        SecurityType::ConvertibleNote,
        SecurityType::Safe,
        SecurityType::CommonEquity,
        SecurityType::PreferredEquity,
    ];

    pub fn label(&self) -> &str {
        match self {
            SecurityType::ConvertibleNote => "Convertible Note",
            SecurityType::Safe => "SAFE",
            SecurityType::CommonEquity => "Common Equity",
            SecurityType::PreferredEquity => "Preferred Equity",
            SecurityType::Other(label) => label,
        }
    }

    /// Whether the instrument converts at a discount (notes and SAFEs).
    pub fn carries_discount(&self) -> bool {
        matches!(self, SecurityType::ConvertibleNote | SecurityType::Safe)
    }

    /// Whether the instrument accrues interest (notes only).
    pub fn accrues_interest(&self) -> bool {
        matches!(self, SecurityType::ConvertibleNote)
    }
}

impl From<String> for SecurityType {
    fn from(value: String) -> Self {
        // Labels are matched exactly; "safe" is an unknown instrument, not a SAFE.
        match value.as_str() {
            "Convertible Note" => SecurityType::ConvertibleNote,
            "SAFE" => SecurityType::Safe,
            "Common Equity" => SecurityType::CommonEquity,
            "Preferred Equity" => SecurityType::PreferredEquity,
            _ => SecurityType::Other(value),
        }
    }
}

impl From<&str> for SecurityType {
    fn from(value: &str) -> Self {
        SecurityType::from(value.to_string())
    }
}

impl From<SecurityType> for String {
    fn from(value: SecurityType) -> Self {
        match value {
            SecurityType::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single term sheet as supplied by the caller.
///
/// Monetary amounts are plain floats in the deal's currency; rates are
/// fractions (`0.20` = 20%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealInput {
    pub company_name: String,
    /// Lookup key into the industry benchmark table.
    pub industry: String,
    pub ask: f64,
    pub valuation_cap: f64,
    pub security_type: SecurityType,
    pub discount_rate: f64,
    pub interest: f64,
    /// Revenue per fiscal year, earliest first.
    pub yearly_revenue: Vec<f64>,
    #[serde(default)]
    pub monthly_burn: f64,
    #[serde(default)]
    pub current_cash: f64,
    #[serde(default)]
    pub previous_raise: f64,
    /// Runway figure supplied with the deal; only read under `RunwayPolicy::Supplied`.
    #[serde(default)]
    pub months_of_cash: Option<f64>,
}

/// How the runway assessment obtains its months-of-cash figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RunwayPolicy {
    /// Recompute as `current_cash / monthly_burn`, ignoring any supplied figure.
    #[default]
    Computed,
    /// Trust the deal's `months_of_cash`; missing or zero means unknown.
    Supplied,
}

/// Which implied-multiple figures the report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MultipleMode {
    /// Valuation cap over first-year revenue only.
    #[default]
    FirstYear,
    /// Additionally report the cap over every year's revenue in `implied_multiples`.
    PerYear,
}

/// Benchmark thresholds every evaluation is measured against.
///
/// Growth thresholds are fractional (`0.50` = 50%) and are scaled by 100
/// before being compared with growth rates, which are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub modeled_discount_rate: f64,
    pub modeled_interest_rate: f64,
    pub modeled_revenue_growth_aggressive: f64,
    pub modeled_revenue_growth_standard: f64,
    /// Carried for compatibility with existing config files; no tier boundary uses it.
    pub modeled_revenue_growth_low: f64,
    pub modeled_valuation_threshold: f64,
    pub modeled_cash_months: f64,
    pub runway_policy: RunwayPolicy,
    pub multiple_mode: MultipleMode,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            modeled_discount_rate: 0.20,
            modeled_interest_rate: 0.06,
            modeled_revenue_growth_aggressive: 5.00,
            modeled_revenue_growth_standard: 0.50,
            modeled_revenue_growth_low: 0.10,
            modeled_valuation_threshold: 0.25,
            modeled_cash_months: 12.0,
            runway_policy: RunwayPolicy::default(),
            multiple_mode: MultipleMode::default(),
        }
    }
}

impl EvaluationConfig {
    /// Return a copy with every field present in `patch` overridden.
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        let mut out = self.clone();
        out.apply(patch);
        out
    }

    /// Override the fields present in `patch` in place.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(v) = patch.modeled_discount_rate {
            self.modeled_discount_rate = v;
        }
        if let Some(v) = patch.modeled_interest_rate {
            self.modeled_interest_rate = v;
        }
        if let Some(v) = patch.modeled_revenue_growth_aggressive {
            self.modeled_revenue_growth_aggressive = v;
        }
        if let Some(v) = patch.modeled_revenue_growth_standard {
            self.modeled_revenue_growth_standard = v;
        }
        if let Some(v) = patch.modeled_revenue_growth_low {
            self.modeled_revenue_growth_low = v;
        }
        if let Some(v) = patch.modeled_valuation_threshold {
            self.modeled_valuation_threshold = v;
        }
        if let Some(v) = patch.modeled_cash_months {
            self.modeled_cash_months = v;
        }
        if let Some(v) = patch.runway_policy {
            self.runway_policy = v;
        }
        if let Some(v) = patch.multiple_mode {
            self.multiple_mode = v;
        }
    }

    /// Reject thresholds that would make every comparison meaningless.
    pub fn validate(&self) -> Result<(), EvalError> {
        let fields = [
            ("modeled_discount_rate", self.modeled_discount_rate),
            ("modeled_interest_rate", self.modeled_interest_rate),
            ("modeled_revenue_growth_aggressive", self.modeled_revenue_growth_aggressive),
            ("modeled_revenue_growth_standard", self.modeled_revenue_growth_standard),
            ("modeled_revenue_growth_low", self.modeled_revenue_growth_low),
            ("modeled_valuation_threshold", self.modeled_valuation_threshold),
            ("modeled_cash_months", self.modeled_cash_months),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(EvalError::invalid(field, "must be a finite number"));
            }
        }
        Ok(())
    }
}

/// Partial config used for merge-updates and per-request overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigPatch {
    pub modeled_discount_rate: Option<f64>,
    pub modeled_interest_rate: Option<f64>,
    pub modeled_revenue_growth_aggressive: Option<f64>,
    pub modeled_revenue_growth_standard: Option<f64>,
    pub modeled_revenue_growth_low: Option<f64>,
    pub modeled_valuation_threshold: Option<f64>,
    pub modeled_cash_months: Option<f64>,
    pub runway_policy: Option<RunwayPolicy>,
    pub multiple_mode: Option<MultipleMode>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == ConfigPatch::default()
    }
}

/// Growth tier for one year-over-year growth rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GrowthCategory {
    /// The prior year's revenue was zero, so no rate exists.
    Undefined,
    Low,
    Standard,
    Aggressive,
}

impl GrowthCategory {
    pub fn label(self) -> &'static str {
        match self {
            GrowthCategory::Undefined => "Undefined",
            GrowthCategory::Low => "Low",
            GrowthCategory::Standard => "Standard",
            GrowthCategory::Aggressive => "Aggressive",
        }
    }
}

/// Discount term compared with the modeled discount rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountAssessment {
    #[serde(rename = "Does not apply")]
    DoesNotApply,
    #[serde(rename = "Zero Discount")]
    Zero,
    #[serde(rename = "Lower Discount")]
    Lower,
    #[serde(rename = "Standard Discount")]
    Standard,
    #[serde(rename = "Higher Discount")]
    Higher,
}

impl DiscountAssessment {
    pub fn label(self) -> &'static str {
        match self {
            DiscountAssessment::DoesNotApply => "Does not apply",
            DiscountAssessment::Zero => "Zero Discount",
            DiscountAssessment::Lower => "Lower Discount",
            DiscountAssessment::Standard => "Standard Discount",
            DiscountAssessment::Higher => "Higher Discount",
        }
    }
}

/// Interest term compared with the modeled interest rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestAssessment {
    #[serde(rename = "Does not apply")]
    DoesNotApply,
    #[serde(rename = "Zero Interest")]
    Zero,
    #[serde(rename = "Lower Interest")]
    Lower,
    #[serde(rename = "Standard Interest")]
    Standard,
    #[serde(rename = "Higher Interest")]
    Higher,
}

impl InterestAssessment {
    pub fn label(self) -> &'static str {
        match self {
            InterestAssessment::DoesNotApply => "Does not apply",
            InterestAssessment::Zero => "Zero Interest",
            InterestAssessment::Lower => "Lower Interest",
            InterestAssessment::Standard => "Standard Interest",
            InterestAssessment::Higher => "Higher Interest",
        }
    }
}

/// Implied multiple compared with the industry benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationAssessment {
    /// No implied multiple (first-year revenue was zero).
    Incomplete,
    /// Above the benchmark multiple.
    #[serde(rename = "High Valuation")]
    High,
    /// Within the threshold band below the benchmark.
    #[serde(rename = "Fair Valuation")]
    Fair,
    /// Further below the benchmark than the threshold band.
    #[serde(rename = "Favorable Valuation")]
    Favorable,
}

impl ValuationAssessment {
    pub fn label(self) -> &'static str {
        match self {
            ValuationAssessment::Incomplete => "Incomplete",
            ValuationAssessment::High => "High Valuation",
            ValuationAssessment::Fair => "Fair Valuation",
            ValuationAssessment::Favorable => "Favorable Valuation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunwayAssessment {
    Adequate,
    Inadequate,
    Unknown,
}

impl RunwayAssessment {
    pub fn label(self) -> &'static str {
        match self {
            RunwayAssessment::Adequate => "Adequate",
            RunwayAssessment::Inadequate => "Inadequate",
            RunwayAssessment::Unknown => "Unknown",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

display_via_label!(
    GrowthCategory,
    DiscountAssessment,
    InterestAssessment,
    ValuationAssessment,
    RunwayAssessment,
);

/// Metric whose denominator turned out to be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    GrowthRate,
    ImpliedMultiple,
    MonthsOfCash,
}

/// Something the evaluator could not compute, or had to assume.
///
/// Issues never abort an evaluation; the affected report field carries a
/// null / `Undefined` / `Incomplete` / `Unknown` marker and the issue says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalIssue {
    /// A zero denominator; `year_index` is the zero-revenue year where relevant.
    DivisionByZero {
        metric: Metric,
        year_index: Option<usize>,
    },
    /// Finite inputs whose quotient is not a finite number.
    Overflow {
        metric: Metric,
        year_index: Option<usize>,
    },
    /// The industry had no usable benchmark, so the default multiple was used.
    BenchmarkFallback { industry: String, multiple: f64 },
}

impl fmt::Display for EvalIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalIssue::DivisionByZero {
                metric: Metric::GrowthRate,
                year_index: Some(i),
            } => write!(f, "growth rate undefined: year {} revenue is zero", i + 1),
            EvalIssue::DivisionByZero {
                metric: Metric::ImpliedMultiple,
                year_index: Some(i),
            } => write!(f, "implied multiple undefined: year {} revenue is zero", i + 1),
            EvalIssue::DivisionByZero {
                metric: Metric::MonthsOfCash,
                ..
            } => write!(f, "months of cash undefined: monthly burn is zero"),
            EvalIssue::DivisionByZero { metric, .. } => write!(f, "{metric:?} undefined: zero denominator"),
            EvalIssue::Overflow {
                metric: Metric::GrowthRate,
                year_index: Some(i),
            } => write!(f, "growth rate undefined: year {} to {} overflows", i + 1, i + 2),
            EvalIssue::Overflow {
                metric: Metric::ImpliedMultiple,
                year_index: Some(i),
            } => write!(f, "implied multiple undefined: year {} overflows", i + 1),
            EvalIssue::Overflow {
                metric: Metric::MonthsOfCash,
                ..
            } => write!(f, "months of cash undefined: cash / burn overflows"),
            EvalIssue::Overflow { metric, .. } => write!(f, "{metric:?} undefined: overflow"),
            EvalIssue::BenchmarkFallback { industry, multiple } => {
                write!(f, "no benchmark multiple for '{industry}', using {multiple:.2}")
            }
        }
    }
}

/// Derived metrics for one deal.
///
/// Every field is always present; undefined values are explicit nulls or
/// marker labels so consumers can rely on a stable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Year-over-year growth in percent; `None` where the prior year was zero.
    pub growth_rates: Vec<Option<f64>>,
    /// Parallel to `growth_rates`.
    pub growth_rate_assessment: Vec<GrowthCategory>,
    /// Valuation cap over first-year revenue.
    pub implied_multiple: Option<f64>,
    /// Valuation cap over each year's revenue (`MultipleMode::PerYear` only).
    pub implied_multiples: Option<Vec<Option<f64>>>,
    /// Benchmark multiple the valuation was judged against.
    pub industry_multiple: f64,
    pub discount_rate_assessment: DiscountAssessment,
    pub interest_rate_assessment: InterestAssessment,
    pub valuation_assessment: ValuationAssessment,
    pub runway_assessment: RunwayAssessment,
    /// Runway figure the assessment used (supplied or recomputed, per policy).
    pub months_of_cash: Option<f64>,
    pub issues: Vec<EvalIssue>,
}

/// One row of a batch run, in input order.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// 1-based source line (CSV) or position (other inputs).
    pub line: usize,
    pub company_name: String,
    pub outcome: Result<EvaluationReport, EvalError>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_type_round_trips_known_and_custom_labels() {
        for known in SecurityType::KNOWN {
            let label = known.label().to_string();
            assert_eq!(SecurityType::from(label.clone()), known);
            assert_eq!(String::from(known), label);
        }

        let custom = SecurityType::from("Revenue Share");
        assert_eq!(custom, SecurityType::Other("Revenue Share".to_string()));
        assert!(!custom.carries_discount());
        assert_eq!(custom.to_string(), "Revenue Share");

        // Exact match only.
        assert!(matches!(SecurityType::from("safe"), SecurityType::Other(_)));
    }

    #[test]
    fn discount_and_interest_scope() {
        assert!(SecurityType::Safe.carries_discount());
        assert!(!SecurityType::Safe.accrues_interest());
        assert!(SecurityType::ConvertibleNote.carries_discount());
        assert!(SecurityType::ConvertibleNote.accrues_interest());
        assert!(!SecurityType::PreferredEquity.carries_discount());
    }

    #[test]
    fn patch_overrides_only_present_fields() {
        let base = EvaluationConfig::default();
        let patch = ConfigPatch {
            modeled_discount_rate: Some(0.25),
            runway_policy: Some(RunwayPolicy::Supplied),
            ..ConfigPatch::default()
        };
        let merged = base.merged(&patch);

        assert_eq!(merged.modeled_discount_rate, 0.25);
        assert_eq!(merged.runway_policy, RunwayPolicy::Supplied);
        assert_eq!(merged.modeled_interest_rate, base.modeled_interest_rate);
        assert_eq!(merged.modeled_cash_months, base.modeled_cash_months);
        assert!(ConfigPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let err = serde_json::from_str::<ConfigPatch>(r#"{"modeled_discount": 0.1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn config_validate_rejects_nan() {
        let config = EvaluationConfig {
            modeled_cash_months: f64::NAN,
            ..EvaluationConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(EvaluationConfig::default().validate().is_ok());
    }

    #[test]
    fn labels_serialize_as_display_text() {
        let json = serde_json::to_string(&ValuationAssessment::Favorable).unwrap();
        assert_eq!(json, "\"Favorable Valuation\"");
        let json = serde_json::to_string(&DiscountAssessment::DoesNotApply).unwrap();
        assert_eq!(json, "\"Does not apply\"");
        assert_eq!(InterestAssessment::Higher.to_string(), "Higher Interest");
    }

    #[test]
    fn deal_defaults_optional_runway_fields() {
        let deal: DealInput = serde_json::from_str(
            r#"{
                "company_name": "Acme",
                "industry": "Software",
                "ask": 500000,
                "valuation_cap": 5000000,
                "security_type": "SAFE",
                "discount_rate": 0.2,
                "interest": 0.0,
                "yearly_revenue": [100, 200]
            }"#,
        )
        .unwrap();
        assert_eq!(deal.security_type, SecurityType::Safe);
        assert_eq!(deal.monthly_burn, 0.0);
        assert_eq!(deal.months_of_cash, None);
    }
}
