//! The allocation pipeline.
//!
//! `Optimizer` owns one read-only catalog snapshot and one configuration.
//! Each request runs the configured phases in order over a fresh
//! `BuildConfiguration`, then derives the final issues, cost and score.
//! Nothing survives between requests, so concurrent callers can share an
//! `Optimizer` freely.

use rigsmith_catalog::{CatalogSnapshot, Region};
use tracing::{debug, info, info_span};

use crate::build::{BuildConfiguration, OptimizedBuild};
use crate::compat::CompatibilityEvaluator;
use crate::config::{AllocatorConfig, Phase};
use crate::error::AllocationError;
use crate::fallback::fill_missing;
use crate::greedy::allocate;
use crate::notes::OptimizationNote;
use crate::repair::repair;
use crate::scorer::{HeuristicScorer, PerformanceModel, aggregate_score};
use crate::upgrade::upgrade;

/// Everything a phase may read. Phases never see the request budget
/// directly; they receive what is left of it.
#[derive(Clone, Copy)]
pub struct PhaseContext<'a> {
    pub snapshot: &'a CatalogSnapshot,
    pub region: Region,
    pub config: &'a AllocatorConfig,
    pub scorer: &'a dyn PerformanceModel,
}

impl<'a> PhaseContext<'a> {
    pub fn new(
        snapshot: &'a CatalogSnapshot,
        region: Region,
        config: &'a AllocatorConfig,
        scorer: &'a dyn PerformanceModel,
    ) -> Self {
        Self {
            snapshot,
            region,
            config,
            scorer,
        }
    }

    pub fn evaluator(&self) -> CompatibilityEvaluator<'a> {
        CompatibilityEvaluator::new(self.config)
    }
}

/// Budget allocator over one catalog snapshot.
#[derive(Debug, Clone)]
pub struct Optimizer {
    snapshot: CatalogSnapshot,
    config: AllocatorConfig,
}

impl Optimizer {
    /// Optimizer with the production configuration.
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot,
            config: AllocatorConfig::default(),
        }
    }

    /// Optimizer with an internal configuration variant.
    pub fn with_config(
        snapshot: CatalogSnapshot,
        config: AllocatorConfig,
    ) -> Result<Self, AllocationError> {
        config.validate()?;
        Ok(Self { snapshot, config })
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Allocate `budget` in `region` using the heuristic scorer.
    pub fn optimize(&self, budget: f64, region: Region) -> Result<OptimizedBuild, AllocationError> {
        let scorer = HeuristicScorer::new(region);
        self.optimize_with(budget, region, &scorer)
    }

    /// Like [`Optimizer::optimize`], with the region given as a code.
    pub fn optimize_request(
        &self,
        budget: f64,
        region: &str,
    ) -> Result<OptimizedBuild, AllocationError> {
        let region: Region = region
            .parse()
            .map_err(|_| AllocationError::UnknownRegion(region.to_string()))?;
        self.optimize(budget, region)
    }

    /// Allocate with a caller-supplied performance model.
    pub fn optimize_with(
        &self,
        budget: f64,
        region: Region,
        scorer: &dyn PerformanceModel,
    ) -> Result<OptimizedBuild, AllocationError> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(AllocationError::InvalidBudget { budget });
        }

        let span = info_span!("optimize", %region, budget);
        let _guard = span.enter();

        let ctx = PhaseContext::new(&self.snapshot, region, &self.config, scorer);
        let mut build = BuildConfiguration::empty();
        let mut remaining = budget;
        let mut notes: Vec<OptimizationNote> = Vec::new();
        let mut fallback_categories = Vec::new();

        for &phase in &self.config.phase_order {
            debug!(%phase, remaining, "phase start");
            match phase {
                Phase::Greedy => {
                    let outcome = allocate(budget, &ctx);
                    build = outcome.build;
                    remaining = outcome.remaining_budget;
                    notes.extend(outcome.notes);
                }
                Phase::Repair => {
                    let outcome = repair(build, &ctx);
                    build = outcome.build;
                    remaining = budget - build.total_cost(region);
                    notes.extend(outcome.notes);
                }
                Phase::Upgrade => {
                    let outcome = upgrade(build, remaining, &ctx);
                    build = outcome.build;
                    remaining = outcome.remaining_budget;
                    notes.extend(outcome.notes);
                }
                Phase::Fallback => {
                    if build.is_complete() {
                        continue;
                    }
                    let outcome = fill_missing(build, &ctx);
                    build = outcome.build;
                    remaining = budget - build.total_cost(region);
                    fallback_categories = outcome.filled;
                    notes.extend(outcome.notes);
                }
            }
        }

        let evaluator = ctx.evaluator();
        let total_cost = build.total_cost(region);
        let result = OptimizedBuild {
            region,
            budget,
            total_cost,
            budget_utilization: total_cost / budget * 100.0,
            is_complete: build.is_complete(),
            compatibility_issues: evaluator.issues(&build),
            performance_score: aggregate_score(&build, scorer, &self.config.category_weights),
            notes,
            fallback_categories,
            snapshot_digest: self.snapshot.digest(),
            configuration: build,
        };

        info!(
            total_cost,
            remaining,
            score = result.performance_score_display(),
            issues = result.compatibility_issues.len(),
            fallbacks = result.fallback_categories.len(),
            "build allocated"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigsmith_catalog::{Category, Component};

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::from_components(Category::ALL.into_iter().map(|c| {
            Component::new(format!("{c}-1"), format!("{c} one"), c).with_price(Region::Us, 50.0)
        }))
    }

    #[test]
    fn rejects_bad_budgets_before_allocating() {
        let optimizer = Optimizer::new(catalog());
        for budget in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                optimizer.optimize(budget, Region::Us),
                Err(AllocationError::InvalidBudget { .. })
            ));
        }
    }

    #[test]
    fn rejects_unknown_region_codes() {
        let optimizer = Optimizer::new(catalog());
        let err = optimizer.optimize_request(1000.0, "FR").unwrap_err();
        assert!(matches!(err, AllocationError::UnknownRegion(ref code) if code == "FR"));
        assert!(optimizer.optimize_request(1000.0, "gb").is_ok());
    }

    #[test]
    fn with_config_validates() {
        let config = AllocatorConfig {
            phase_order: vec![Phase::Repair, Phase::Greedy, Phase::Upgrade, Phase::Fallback],
            ..AllocatorConfig::default()
        };
        assert!(matches!(
            Optimizer::with_config(catalog(), config),
            Err(AllocationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn full_catalog_needs_no_fallback() {
        let build = Optimizer::new(catalog())
            .optimize(1000.0, Region::Us)
            .unwrap();
        assert!(build.is_complete);
        assert!(!build.is_reduced_confidence());
        assert_eq!(build.total_cost, 400.0);
        assert_eq!(build.budget_utilization, 40.0);
        assert!(build.compatibility_issues.is_empty());
    }

    #[test]
    fn swapping_repair_and_upgrade_is_allowed() {
        let config = AllocatorConfig {
            phase_order: vec![Phase::Greedy, Phase::Upgrade, Phase::Repair, Phase::Fallback],
            ..AllocatorConfig::default()
        };
        let optimizer = Optimizer::with_config(catalog(), config).unwrap();
        let build = optimizer.optimize(1000.0, Region::Us).unwrap();
        assert!(build.is_complete);
    }
}
