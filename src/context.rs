//! Evaluation context: the config + benchmark snapshot a deal is judged against.
//!
//! `EvaluationContext` is immutable. `SharedContext` holds the current one
//! behind an `Arc` and replaces it wholesale on update, so an evaluation that
//! already took a snapshot keeps seeing a consistent config/table pair while
//! an update is in flight.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::domain::{ConfigPatch, DealInput, EvaluationConfig, EvaluationReport, IndustryMultiples};
use crate::error::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    config: EvaluationConfig,
    benchmarks: IndustryMultiples,
}

impl Default for EvaluationContext {
    /// Default thresholds and the built-in benchmark table.
    fn default() -> Self {
        Self {
            config: EvaluationConfig::default(),
            benchmarks: IndustryMultiples::builtin(),
        }
    }
}

impl EvaluationContext {
    pub fn new(config: EvaluationConfig, benchmarks: IndustryMultiples) -> Self {
        Self { config, benchmarks }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn benchmarks(&self) -> &IndustryMultiples {
        &self.benchmarks
    }

    /// Evaluate with this context's config.
    pub fn evaluate(&self, deal: &DealInput) -> Result<EvaluationReport, EvalError> {
        crate::eval::evaluate(deal, &self.config, &self.benchmarks)
    }

    /// Evaluate with a per-request config override layered on this context's config.
    pub fn evaluate_with(
        &self,
        deal: &DealInput,
        overrides: Option<&ConfigPatch>,
    ) -> Result<EvaluationReport, EvalError> {
        match overrides {
            Some(patch) if !patch.is_empty() => {
                let config = self.config.merged(patch);
                config.validate()?;
                crate::eval::evaluate(deal, &config, &self.benchmarks)
            }
            _ => self.evaluate(deal),
        }
    }

    /// A new context with `patch` merged into the config.
    pub fn with_config(&self, patch: &ConfigPatch) -> Result<Self, EvalError> {
        let config = self.config.merged(patch);
        config.validate()?;
        Ok(Self {
            config,
            benchmarks: self.benchmarks.clone(),
        })
    }

    /// A new context with `updates` merged into the benchmark table.
    pub fn with_benchmarks(&self, updates: &IndustryMultiples) -> Result<Self, EvalError> {
        if let Some(name) = updates.invalid_entries().first() {
            return Err(EvalError::invalid(
                format!("industry_multiples.{name}"),
                "multiple must be a finite number > 0 (or null)",
            ));
        }
        Ok(Self {
            config: self.config.clone(),
            benchmarks: self.benchmarks.merged(updates),
        })
    }
}

/// Process-wide, runtime-updatable evaluation context.
#[derive(Debug, Default)]
pub struct SharedContext {
    current: RwLock<Arc<EvaluationContext>>,
}

impl SharedContext {
    pub fn new(context: EvaluationContext) -> Self {
        Self {
            current: RwLock::new(Arc::new(context)),
        }
    }

    /// The current snapshot. Cheap; holds no lock after returning.
    pub fn snapshot(&self) -> Arc<EvaluationContext> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn config(&self) -> EvaluationConfig {
        self.snapshot().config().clone()
    }

    pub fn benchmarks(&self) -> IndustryMultiples {
        self.snapshot().benchmarks().clone()
    }

    /// Merge `patch` into the current config and publish the result.
    ///
    /// On error the current snapshot is left untouched.
    pub fn update_config(&self, patch: &ConfigPatch) -> Result<Arc<EvaluationContext>, EvalError> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(guard.with_config(patch)?);
        *guard = Arc::clone(&next);
        info!(?patch, "evaluation config updated");
        Ok(next)
    }

    /// Merge `updates` into the current benchmark table and publish the result.
    pub fn update_benchmarks(&self, updates: &IndustryMultiples) -> Result<Arc<EvaluationContext>, EvalError> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(guard.with_benchmarks(updates)?);
        *guard = Arc::clone(&next);
        info!(
            updated = updates.len(),
            total = next.benchmarks().len(),
            "industry multiples updated"
        );
        Ok(next)
    }

    /// Publish a whole new context.
    pub fn replace(&self, context: EvaluationContext) -> Arc<EvaluationContext> {
        let next = Arc::new(context);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiscountAssessment, SecurityType, ValuationAssessment};
    use std::thread;

    fn safe_deal() -> DealInput {
        DealInput {
            company_name: "Snapshot Labs".to_string(),
            industry: "Quantum".to_string(),
            ask: 250_000.0,
            valuation_cap: 4_000_000.0,
            security_type: SecurityType::Safe,
            discount_rate: 0.20,
            interest: 0.0,
            yearly_revenue: vec![1_000_000.0],
            monthly_burn: 0.0,
            current_cash: 0.0,
            previous_raise: 0.0,
            months_of_cash: None,
        }
    }

    #[test]
    fn earlier_snapshot_is_unaffected_by_updates() {
        let shared = SharedContext::new(EvaluationContext::default());
        let before = shared.snapshot();

        let patch = ConfigPatch {
            modeled_discount_rate: Some(0.25),
            ..ConfigPatch::default()
        };
        shared.update_config(&patch).unwrap();

        assert_eq!(before.config().modeled_discount_rate, 0.20);
        assert_eq!(shared.config().modeled_discount_rate, 0.25);

        let old = before.evaluate(&safe_deal()).unwrap();
        let new = shared.snapshot().evaluate(&safe_deal()).unwrap();
        assert_eq!(old.discount_rate_assessment, DiscountAssessment::Standard);
        assert_eq!(new.discount_rate_assessment, DiscountAssessment::Lower);
    }

    #[test]
    fn replace_publishes_a_whole_new_context() {
        let shared = SharedContext::default();
        let before = shared.snapshot();

        let mut table = IndustryMultiples::default();
        table.insert("Quantum", Some(5.0));
        let config = EvaluationConfig {
            modeled_discount_rate: 0.30,
            ..EvaluationConfig::default()
        };
        let published = shared.replace(EvaluationContext::new(config, table));

        assert!(Arc::ptr_eq(&published, &shared.snapshot()));
        assert_eq!(before.config().modeled_discount_rate, 0.20);
        assert_eq!(before.benchmarks().len(), 40);
        assert_eq!(shared.benchmarks().len(), 1);

        let old = before.evaluate(&safe_deal()).unwrap();
        let new = shared.snapshot().evaluate(&safe_deal()).unwrap();
        assert_eq!(old.industry_multiple, 3.0);
        assert_eq!(old.valuation_assessment, ValuationAssessment::High);
        // 4x against 5x sits inside the 25% band.
        assert_eq!(new.industry_multiple, 5.0);
        assert_eq!(new.valuation_assessment, ValuationAssessment::Fair);
        assert_eq!(new.discount_rate_assessment, DiscountAssessment::Lower);
    }

    #[test]
    fn benchmark_update_changes_valuation() {
        let shared = SharedContext::default();
        // Unlisted industry: falls back to 3.0, so 4x is high.
        let report = shared.snapshot().evaluate(&safe_deal()).unwrap();
        assert_eq!(report.valuation_assessment, ValuationAssessment::High);

        let mut updates = IndustryMultiples::default();
        updates.insert("Quantum", Some(8.0));
        shared.update_benchmarks(&updates).unwrap();

        let report = shared.snapshot().evaluate(&safe_deal()).unwrap();
        assert_eq!(report.industry_multiple, 8.0);
        assert_eq!(report.valuation_assessment, ValuationAssessment::Favorable);
    }

    #[test]
    fn rejected_update_keeps_current_snapshot() {
        let shared = SharedContext::new(EvaluationContext::default());
        let patch = ConfigPatch {
            modeled_cash_months: Some(f64::INFINITY),
            ..ConfigPatch::default()
        };
        assert!(shared.update_config(&patch).is_err());
        assert_eq!(shared.config(), EvaluationConfig::default());

        let mut bad = IndustryMultiples::default();
        bad.insert("Software", Some(0.0));
        assert!(shared.update_benchmarks(&bad).is_err());
        assert_eq!(shared.benchmarks().lookup("Software").multiple, 3.13);
    }

    #[test]
    fn per_request_override_does_not_touch_context() {
        let context = EvaluationContext::default();
        let patch = ConfigPatch {
            modeled_discount_rate: Some(0.10),
            ..ConfigPatch::default()
        };
        let report = context.evaluate_with(&safe_deal(), Some(&patch)).unwrap();
        assert_eq!(report.discount_rate_assessment, DiscountAssessment::Higher);
        assert_eq!(context.config().modeled_discount_rate, 0.20);

        let report = context.evaluate_with(&safe_deal(), None).unwrap();
        assert_eq!(report.discount_rate_assessment, DiscountAssessment::Standard);
    }

    #[test]
    fn concurrent_readers_always_see_a_whole_snapshot() {
        let config = EvaluationConfig {
            modeled_interest_rate: 0.20,
            ..EvaluationConfig::default()
        };
        let shared = Arc::new(SharedContext::new(EvaluationContext::new(
            config,
            IndustryMultiples::builtin(),
        )));

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..200 {
                    // Discount and interest move together; readers must never see them split.
                    let rate = if i % 2 == 0 { 0.30 } else { 0.20 };
                    let patch = ConfigPatch {
                        modeled_discount_rate: Some(rate),
                        modeled_interest_rate: Some(rate),
                        ..ConfigPatch::default()
                    };
                    shared.update_config(&patch).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snap = shared.snapshot();
                        let config = snap.config();
                        assert_eq!(config.modeled_discount_rate, config.modeled_interest_rate);
                        snap.evaluate(&safe_deal()).unwrap();
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
