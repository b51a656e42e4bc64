//! Error types for catalog loading and snapshot assembly.

use crate::category::Category;

/// Errors raised while reading, writing or fetching catalog data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("io error at line {line}: {message}")]
    Io { line: usize, message: String },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An entry parsed but failed structural validation.
    #[error("line {line}: {category} component {id}: {message}")]
    InvalidComponent {
        line: usize,
        id: String,
        category: Category,
        message: String,
    },

    #[error("line {line}: duplicate component id {id} (first listed on line {first_line})")]
    DuplicateId {
        line: usize,
        first_line: usize,
        id: String,
    },

    /// A per-category dump holds an entry of another category.
    #[error("line {line}: component {id} is filed under {expected} but is a {found}")]
    Misfiled {
        line: usize,
        id: String,
        expected: Category,
        found: Category,
    },

    #[error("corrupt catalog: {0}")]
    Corrupt(String),

    #[error("serialize error: {0}")]
    Serialize(String),

    /// An upstream source failed for one category.
    #[error("provider failed for {category}: {message}")]
    Provider { category: Category, message: String },

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
