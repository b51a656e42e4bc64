//! Error types for allocation requests.
//!
//! Degraded outcomes (empty categories, over-budget picks, unresolved
//! incompatibilities) are never errors: they surface as notes and issues on
//! the returned build. Only malformed input fails a request.

/// Errors that reject a request before any allocation work starts.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// Budget is zero, negative, or not a finite number.
    #[error("budget must be a positive, finite amount (got {budget})")]
    InvalidBudget { budget: f64 },

    #[error("unknown region: {0} (expected one of US, CA, UK, DE, AU)")]
    UnknownRegion(String),

    /// An internal allocator variant is malformed.
    #[error("invalid allocator config: {0}")]
    InvalidConfig(String),

    #[error("invalid allocator config toml: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
