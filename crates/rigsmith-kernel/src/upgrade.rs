//! Upgrade optimization.
//!
//! Spends leftover budget on the categories in `upgrade_order`. Within one
//! pass each category may move to a pricier, higher-scoring candidate; the
//! best candidate maximizes
//!
//! ```text
//! performance × perf + value × value_scale × perf / price + compatibility × penalty
//! ```
//!
//! A candidate must be in stock, strictly pricier than the current part,
//! affordable with the remaining budget, strictly better by performance
//! score, and must not lower the slot's compatibility score. Passes repeat
//! until one finds nothing or the budget runs out.

use rigsmith_catalog::{Category, Component};
use tracing::{debug, info};

use crate::build::BuildConfiguration;
use crate::config::Phase;
use crate::greedy::priced_candidates;
use crate::notes::{NoteKind, OptimizationNote};
use crate::pipeline::PhaseContext;

#[derive(Debug, Clone)]
pub struct UpgradeOutcome {
    pub build: BuildConfiguration,
    pub remaining_budget: f64,
    pub notes: Vec<OptimizationNote>,
}

struct Scored<'s> {
    component: &'s Component,
    price: f64,
    performance: f64,
    score: f64,
}

pub fn upgrade(
    mut build: BuildConfiguration,
    remaining_budget: f64,
    ctx: &PhaseContext<'_>,
) -> UpgradeOutcome {
    let region = ctx.region;
    let mut remaining = remaining_budget;
    let mut notes = Vec::new();

    if remaining <= 0.0 {
        notes.push(OptimizationNote::new(
            Phase::Upgrade,
            NoteKind::Skipped,
            None,
            "No budget left for upgrades",
        ));
        return UpgradeOutcome {
            build,
            remaining_budget: remaining,
            notes,
        };
    }

    let mut passes = 0;
    while remaining > 0.0 && passes < ctx.config.max_upgrade_passes {
        passes += 1;
        let mut upgraded = 0;

        for &category in &ctx.config.upgrade_order {
            if remaining <= 0.0 {
                break;
            }
            let Some(current) = build.get(category).cloned() else {
                continue;
            };
            let Some(best) = best_upgrade(ctx, &build, &current, category, remaining) else {
                continue;
            };

            let current_price = current.price(region).unwrap_or(0.0);
            let current_performance = ctx.scorer.score(&current);
            let delta = best.price - current_price;
            remaining -= delta;
            upgraded += 1;

            debug!(
                %category,
                from = %current.id,
                to = %best.component.id,
                delta,
                score = best.score,
                "upgrade"
            );
            notes.push(OptimizationNote::new(
                Phase::Upgrade,
                NoteKind::Upgraded,
                Some(category),
                format!(
                    "Upgraded {}: {} -> {} for +{} (performance {:.0} -> {:.0}, {} left)",
                    category.label(),
                    current.name,
                    best.component.name,
                    region.format_amount(delta),
                    current_performance,
                    best.performance,
                    region.format_amount(remaining),
                ),
            ));
            build.place(best.component.clone());
        }

        if upgraded == 0 {
            break;
        }
    }

    info!(passes, remaining, "upgrade phase finished");
    UpgradeOutcome {
        build,
        remaining_budget: remaining,
        notes,
    }
}

fn best_upgrade<'s>(
    ctx: &PhaseContext<'s>,
    build: &BuildConfiguration,
    current: &Component,
    category: Category,
    remaining: f64,
) -> Option<Scored<'s>> {
    let evaluator = ctx.evaluator();
    let weights = &ctx.config.upgrade_weights;
    let current_price = current.price(ctx.region).unwrap_or(0.0);
    let current_performance = ctx.scorer.score(current);
    let current_compatibility = evaluator.penalty(current, build);
    let ceiling = current_price + remaining;

    priced_candidates(ctx, category)
        .into_iter()
        .filter(|(candidate, price)| {
            candidate.id != current.id
                && candidate.is_in_stock()
                && *price > current_price
                && *price <= ceiling
        })
        .filter_map(|(candidate, price)| {
            let performance = ctx.scorer.score(candidate);
            if performance <= current_performance {
                return None;
            }
            let compatibility = evaluator.penalty(candidate, build);
            if compatibility < current_compatibility {
                return None;
            }
            let score = weights.performance * performance
                + weights.value * weights.value_scale * (performance / price)
                + weights.compatibility * compatibility;
            Some(Scored {
                component: candidate,
                price,
                performance,
                score,
            })
        })
        .max_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| b.price.total_cmp(&a.price))
                .then_with(|| b.component.name.cmp(&a.component.name))
                .then_with(|| b.component.id.cmp(&a.component.id))
        })
}
