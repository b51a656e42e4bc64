//! # Rigsmith Kernel
//!
//! Budget-constrained allocation of a complete eight-part PC build from one
//! read-only catalog snapshot.
//!
//! Every request returns a complete build. Over-budget picks, unresolved
//! incompatibilities and empty catalog categories degrade the answer (notes,
//! issues, fallback placeholders) but never fail it; only a non-positive
//! budget or an unknown region does.
//!
//! ## Architecture
//!
//! ```text
//! CatalogSnapshot        ← Immutable per-request view (rigsmith-catalog)
//!     │
//! Greedy completion      ← Cheapest in-stock fit per category, in order
//!     │
//! Compatibility repair   ← Bounded-cost swaps for hard violations
//!     │
//! Upgrade optimizer      ← Spend what is left on GPU, CPU, RAM, storage
//!     │
//! Emergency fallback     ← Synthesized placeholders for empty slots
//!     │
//! OptimizedBuild         ← Cost, issues, notes, aggregate score
//! ```
//!
//! Scoring and compatibility are separate seams: phases only call
//! `PerformanceModel::score` and `CompatibilityEvaluator`.

pub mod build;
pub mod compat;
pub mod config;
pub mod error;
pub mod fallback;
pub mod greedy;
pub mod notes;
pub mod pipeline;
pub mod repair;
pub mod scorer;
pub mod upgrade;

pub use build::{BuildConfiguration, OptimizedBuild};
pub use compat::{CompatibilityEvaluator, SlotView, Violation};
pub use config::{
    AllocatorConfig, CategoryWeights, DrawEstimate, MinimumSpec, PenaltyConfig, Phase,
    RepairConfig, UpgradeWeights,
};
pub use error::AllocationError;
pub use fallback::{FallbackOutcome, fill_missing};
pub use greedy::{GreedyOutcome, allocate};
pub use notes::{NoteKind, OptimizationNote};
pub use pipeline::{Optimizer, PhaseContext};
pub use repair::{RepairOutcome, repair};
pub use scorer::{HeuristicScorer, PerformanceModel, aggregate_score};
pub use upgrade::{UpgradeOutcome, upgrade};
