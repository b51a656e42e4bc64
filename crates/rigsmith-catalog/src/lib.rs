//! # rigsmith-catalog
//!
//! Catalog layer for build allocation.
//!
//! This crate provides:
//! - `Category`, `Region` and `Availability` (the closed vocabularies)
//! - `Component` and its optional spec bag (the catalog entries)
//! - `CatalogSnapshot` (one immutable, per-request view of the catalog)
//! - JSONL dumps, mixed or filed per category (portable catalog interchange)
//! - the `CatalogProvider` seam and concurrent snapshot assembly
//!
//! It intentionally does not allocate builds. That lives in
//! `rigsmith-kernel`, which only ever sees a finished snapshot.
//!
//! ## Data flow
//!
//! ```text
//! CatalogProvider (upstream, per category)
//!     │  assemble_snapshot (parallel, fail closed to cache)
//! CatalogSnapshot (read-only, deterministic ordering)
//!     │
//! rigsmith-kernel::Optimizer
//! ```

pub mod category;
pub mod component;
pub mod error;
pub mod jsonl;
pub mod provider;
pub mod snapshot;

pub use category::{Availability, Category, Region};
pub use component::{Component, ComponentSpecs, CoolerType, FALLBACK_TAG};
pub use error::CatalogError;
pub use jsonl::{
    category_file, read_catalog_dir, read_category_from_path, read_components,
    read_components_from_path, write_catalog_dir, write_components, write_components_to_path,
};
pub use provider::{
    CatalogProvider, DEFAULT_FETCH_TIMEOUT, StaticCatalogProvider, assemble_snapshot,
    assemble_snapshot_with_timeout,
};
pub use snapshot::{CatalogSnapshot, SnapshotDigest};
