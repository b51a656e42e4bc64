//! Optimization notes: the human-readable rationale log.
//!
//! Every selection, substitution, upgrade and fallback appends one note.
//! The log is append-only and ordered by the time the decision was made.

use rigsmith_catalog::Category;
use serde::Serialize;
use std::fmt;

use crate::config::Phase;

/// What kind of decision a note records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Ordinary in-budget greedy pick.
    Selected,
    /// Nothing in stock fit the remaining budget; cheapest listed part used.
    OverBudget,
    /// The catalog had no priced candidate for the category.
    CatalogEmpty,
    /// Repair replaced a part to resolve a hard violation.
    Substituted,
    /// Repair found no bounded-cost substitute.
    Unresolved,
    Upgraded,
    /// A phase had nothing to do.
    Skipped,
    /// A synthesized placeholder filled the slot.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationNote {
    pub phase: Phase,
    pub kind: NoteKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub message: String,
}

impl OptimizationNote {
    pub fn new(
        phase: Phase,
        kind: NoteKind,
        category: Option<Category>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            kind,
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for OptimizationNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
