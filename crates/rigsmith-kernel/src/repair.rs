//! Compatibility repair.
//!
//! Walks the four violation classes in order. For each one present, the
//! repair slot (see `Violation::repair_category`) is swapped for the
//! cheapest in-stock candidate that positively resolves it and costs at
//! most `max_price_ratio ×` the part it replaces. Candidates that would
//! introduce a different violation are only used when nothing cleaner
//! exists. Violations without a substitute are reported, not fatal.
//!
//! A build with no violations passes through untouched.

use rigsmith_catalog::Component;
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::build::BuildConfiguration;
use crate::compat::{SlotView, Violation};
use crate::config::Phase;
use crate::greedy::{by_price_then_name, priced_candidates};
use crate::notes::{NoteKind, OptimizationNote};
use crate::pipeline::PhaseContext;

#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub build: BuildConfiguration,
    /// Messages of violations left unresolved, in evaluation order.
    pub issues: Vec<String>,
    pub notes: Vec<OptimizationNote>,
}

pub fn repair(mut build: BuildConfiguration, ctx: &PhaseContext<'_>) -> RepairOutcome {
    let evaluator = ctx.evaluator();
    let region = ctx.region;
    let band = &ctx.config.repair;
    let mut issues = Vec::new();
    let mut notes = Vec::new();

    for violation in Violation::ALL {
        if !evaluator.detects(violation, SlotView::of(&build)) {
            continue;
        }

        let target = violation.repair_category();
        let Some(current) = build.get(target).cloned() else {
            continue;
        };
        let current_price = current.price(region).unwrap_or(0.0);
        // Only the upper bound filters. Cheaper substitutes are accepted and
        // `preferred_price_ratio` is reported in the note, never enforced.
        let ceiling = current_price * band.max_price_ratio;
        let others_before = other_violations(ctx, &build, violation);

        let substitute = priced_candidates(ctx, target)
            .into_iter()
            .filter(|(candidate, price)| {
                candidate.id != current.id
                    && candidate.is_in_stock()
                    && *price <= ceiling
                    && evaluator.resolves(violation, candidate, &build)
            })
            .map(|(candidate, price)| {
                let introduces =
                    introduces_violation(ctx, &build, candidate, violation, others_before);
                (introduces, (candidate, price))
            })
            .min_by(|a, b| match a.0.cmp(&b.0) {
                Ordering::Equal => by_price_then_name(&a.1, &b.1),
                other => other,
            })
            .map(|(_, pick)| pick);

        match substitute {
            Some((candidate, price)) => {
                let ratio = if current_price > 0.0 {
                    price / current_price
                } else {
                    0.0
                };
                let band_note = if ratio > band.preferred_price_ratio {
                    format!(
                        "; {ratio:.2}x the replaced part, above the preferred {:.1}x band",
                        band.preferred_price_ratio
                    )
                } else {
                    String::new()
                };
                debug!(
                    violation = violation_name(violation),
                    from = %current.id,
                    to = %candidate.id,
                    price,
                    "repair substitution"
                );
                notes.push(OptimizationNote::new(
                    Phase::Repair,
                    NoteKind::Substituted,
                    Some(target),
                    format!(
                        "Replaced {} {} ({}) with {} ({}) to fix: {}{band_note}",
                        target.label(),
                        current.name,
                        region.format_amount(current_price),
                        candidate.name,
                        region.format_amount(price),
                        violation.message(),
                    ),
                ));
                build.place(candidate.clone());
            }
            None => {
                warn!(
                    violation = violation_name(violation),
                    slot = %target,
                    ceiling,
                    "no bounded-cost substitute"
                );
                notes.push(OptimizationNote::new(
                    Phase::Repair,
                    NoteKind::Unresolved,
                    Some(target),
                    format!(
                        "Unresolved: {}; no in-stock {} within {} resolves it",
                        violation.message(),
                        target.label(),
                        region.format_amount(ceiling),
                    ),
                ));
                issues.push(violation.message().to_string());
            }
        }
    }

    RepairOutcome {
        build,
        issues,
        notes,
    }
}

fn violation_name(violation: Violation) -> &'static str {
    match violation {
        Violation::SocketMismatch => "socket_mismatch",
        Violation::MemoryTypeMismatch => "memory_type_mismatch",
        Violation::InsufficientPsu => "insufficient_psu",
        Violation::GpuClearance => "gpu_clearance",
    }
}

fn other_violations(
    ctx: &PhaseContext<'_>,
    build: &BuildConfiguration,
    fixing: Violation,
) -> usize {
    let evaluator = ctx.evaluator();
    Violation::ALL
        .into_iter()
        .filter(|v| *v != fixing && evaluator.detects(*v, SlotView::of(build)))
        .count()
}

/// Whether swapping in `candidate` raises the count of other violations.
fn introduces_violation(
    ctx: &PhaseContext<'_>,
    build: &BuildConfiguration,
    candidate: &Component,
    fixing: Violation,
    before: usize,
) -> bool {
    let evaluator = ctx.evaluator();
    let view = SlotView::with_candidate(build, candidate);
    let after = Violation::ALL
        .into_iter()
        .filter(|v| *v != fixing && evaluator.detects(*v, view))
        .count();
    after > before
}
