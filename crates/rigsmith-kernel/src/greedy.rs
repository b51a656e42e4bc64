//! Greedy completion.
//!
//! One left-to-right pass over the configured category order. Each slot
//! takes the cheapest in-stock candidate that fits what is left of the
//! budget. When nothing fits, the most purchasable candidate is taken
//! anyway (in stock before limited before out of stock, cheapest within
//! each) and the overrun is noted. The pass never looks ahead and never
//! revisits a slot.

use rigsmith_catalog::{Category, Component};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::build::BuildConfiguration;
use crate::config::Phase;
use crate::notes::{NoteKind, OptimizationNote};
use crate::pipeline::PhaseContext;

#[derive(Debug, Clone)]
pub struct GreedyOutcome {
    pub build: BuildConfiguration,
    pub total_cost: f64,
    /// May be negative after over-budget picks.
    pub remaining_budget: f64,
    pub notes: Vec<OptimizationNote>,
}

/// Fill every category the catalog can serve.
pub fn allocate(budget: f64, ctx: &PhaseContext<'_>) -> GreedyOutcome {
    let region = ctx.region;
    let mut build = BuildConfiguration::empty();
    let mut remaining = budget;
    let mut notes = Vec::new();

    for &category in &ctx.config.greedy_order {
        let priced = priced_candidates(ctx, category);
        if priced.is_empty() {
            warn!(%category, %region, "catalog has no priced candidates");
            notes.push(OptimizationNote::new(
                Phase::Greedy,
                NoteKind::CatalogEmpty,
                Some(category),
                format!(
                    "No {} listed for {region}; slot left for fallback",
                    category.label()
                ),
            ));
            continue;
        }

        let affordable: Vec<(&Component, f64)> = priced
            .iter()
            .copied()
            .filter(|(component, price)| component.is_in_stock() && *price <= remaining)
            .collect();
        let preferred = cheapest(
            affordable
                .iter()
                .copied()
                .filter(|(component, _)| ctx.config.minimum_spec.admits(component)),
        );

        let (component, price, note) = match (preferred, cheapest(affordable.iter().copied())) {
            (Some((component, price)), _) => {
                let note = OptimizationNote::new(
                    Phase::Greedy,
                    NoteKind::Selected,
                    Some(category),
                    format!(
                        "Selected {} for {} at {} (cheapest in stock within {} remaining)",
                        component.name,
                        category.label(),
                        region.format_amount(price),
                        region.format_amount(remaining),
                    ),
                );
                (component, price, note)
            }
            (None, Some((component, price))) => {
                let note = OptimizationNote::new(
                    Phase::Greedy,
                    NoteKind::Selected,
                    Some(category),
                    format!(
                        "Selected {} for {} at {}; no affordable candidate meets the minimum spec",
                        component.name,
                        category.label(),
                        region.format_amount(price),
                    ),
                );
                (component, price, note)
            }
            (None, None) => {
                // `priced` is non-empty, so an over-budget pick always exists.
                let Some((component, price)) = most_purchasable(priced.iter().copied()) else {
                    continue;
                };
                warn!(
                    %category,
                    component = %component.id,
                    availability = component.availability.as_str(),
                    price,
                    remaining,
                    "no in-stock candidate within budget; taking cheapest purchasable"
                );
                let note = OptimizationNote::new(
                    Phase::Greedy,
                    NoteKind::OverBudget,
                    Some(category),
                    format!(
                        "Over budget: no in-stock {} fits {} remaining; using {} ({}) at {}",
                        category.label(),
                        region.format_amount(remaining.max(0.0)),
                        component.name,
                        component.availability.as_str(),
                        region.format_amount(price),
                    ),
                );
                (component, price, note)
            }
        };

        debug!(%category, component = %component.id, price, "greedy pick");
        remaining -= price;
        build.place(component.clone());
        notes.push(note);
    }

    GreedyOutcome {
        total_cost: build.total_cost(region),
        build,
        remaining_budget: remaining,
        notes,
    }
}

/// Candidates of `category` with a usable price in the request region.
pub(crate) fn priced_candidates<'s>(
    ctx: &PhaseContext<'s>,
    category: Category,
) -> Vec<(&'s Component, f64)> {
    ctx.snapshot
        .candidates(category)
        .iter()
        .filter_map(|component| component.price(ctx.region).map(|price| (component, price)))
        .collect()
}

/// Deterministic price-then-name-then-ID ordering.
pub(crate) fn by_price_then_name(a: &(&Component, f64), b: &(&Component, f64)) -> Ordering {
    a.1.total_cmp(&b.1)
        .then_with(|| a.0.name.cmp(&b.0.name))
        .then_with(|| a.0.id.cmp(&b.0.id))
}

fn cheapest<'c>(
    candidates: impl Iterator<Item = (&'c Component, f64)>,
) -> Option<(&'c Component, f64)> {
    candidates.min_by(by_price_then_name)
}

/// Best availability first, then price, name and ID.
fn most_purchasable<'c>(
    candidates: impl Iterator<Item = (&'c Component, f64)>,
) -> Option<(&'c Component, f64)> {
    candidates.min_by(|a, b| {
        a.0.availability
            .rank()
            .cmp(&b.0.availability.rank())
            .then_with(|| by_price_then_name(a, b))
    })
}
