//! Read-only catalog snapshot handed to one allocation request.
//!
//! A snapshot is assembled once, before allocation starts, and is never
//! mutated afterwards. Each category keeps its candidates in deterministic
//! ID order so that two snapshots with the same content behave identically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::category::Category;
use crate::component::Component;

/// Content digest of a snapshot (lowercase hex SHA-256).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotDigest(pub String);

impl fmt::Display for SnapshotDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable per-request view over candidate components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    candidates: BTreeMap<Category, Vec<Component>>,
    captured_at: DateTime<Utc>,
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self::from_components(Vec::new())
    }
}

impl CatalogSnapshot {
    /// Group components by category.
    ///
    /// Every category key is present, possibly with an empty list.
    /// Duplicate IDs within a category resolve last-write-wins.
    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Self {
        let mut by_category: BTreeMap<Category, BTreeMap<String, Component>> = Category::ALL
            .iter()
            .map(|category| (*category, BTreeMap::new()))
            .collect();

        for component in components {
            by_category
                .entry(component.category)
                .or_default()
                .insert(component.id.clone(), component);
        }

        let candidates = by_category
            .into_iter()
            .map(|(category, by_id)| (category, by_id.into_values().collect()))
            .collect();

        Self {
            candidates,
            captured_at: Utc::now(),
        }
    }

    /// Build from per-category lists, e.g. the output of a provider fetch.
    ///
    /// Components listed under the wrong category are dropped.
    pub fn from_categories(lists: BTreeMap<Category, Vec<Component>>) -> Self {
        let components = lists.into_iter().flat_map(|(category, list)| {
            list.into_iter()
                .filter(move |component| component.category == category)
        });
        Self::from_components(components)
    }

    pub fn with_captured_at(mut self, captured_at: DateTime<Utc>) -> Self {
        self.captured_at = captured_at;
        self
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Candidates for one category, in ID order.
    pub fn candidates(&self, category: Category) -> &[Component] {
        self.candidates
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Lookup one component by ID within a category.
    pub fn component(&self, category: Category, id: &str) -> Option<&Component> {
        self.candidates(category).iter().find(|c| c.id == id)
    }

    /// Total number of components across all categories.
    pub fn len(&self) -> usize {
        self.candidates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Categories for which the catalog offers nothing.
    pub fn empty_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.candidates(*category).is_empty())
            .collect()
    }

    /// Iterate every component in category, then ID, order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.candidates.values().flat_map(|list| list.iter())
    }

    /// Content digest over every component; excludes `captured_at`.
    pub fn digest(&self) -> SnapshotDigest {
        let mut hasher = Sha256::new();
        for component in self.components() {
            let encoded = serde_json::to_string(component).unwrap_or_default();
            hasher.update(component.category.as_str().as_bytes());
            hasher.update(b":");
            hasher.update(encoded.as_bytes());
            hasher.update(b"\n");
        }
        SnapshotDigest(format!("{:x}", hasher.finalize()))
    }
}
