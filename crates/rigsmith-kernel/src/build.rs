//! Build state: the working configuration and the finished result.

use rigsmith_catalog::{Category, Component, Region, SnapshotDigest};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::notes::OptimizationNote;

/// One optional slot per category.
///
/// The key set is fixed at construction: placing a component only ever
/// fills the slot of its own category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfiguration {
    slots: BTreeMap<Category, Option<Component>>,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self::empty()
    }
}

impl BuildConfiguration {
    /// All eight slots, all empty.
    pub fn empty() -> Self {
        Self {
            slots: Category::ALL.iter().map(|c| (*c, None)).collect(),
        }
    }

    pub fn get(&self, category: Category) -> Option<&Component> {
        self.slots.get(&category).and_then(Option::as_ref)
    }

    /// Fill the component's slot, returning whatever it replaced.
    pub fn place(&mut self, component: Component) -> Option<Component> {
        self.slots
            .get_mut(&component.category)
            .and_then(|slot| slot.replace(component))
    }

    pub fn clear(&mut self, category: Category) -> Option<Component> {
        self.slots.get_mut(&category).and_then(Option::take)
    }

    /// Every slot in canonical category order.
    pub fn slots(&self) -> impl Iterator<Item = (Category, Option<&Component>)> {
        self.slots.iter().map(|(c, slot)| (*c, slot.as_ref()))
    }

    pub fn filled(&self) -> impl Iterator<Item = &Component> {
        self.slots.values().filter_map(Option::as_ref)
    }

    pub fn missing(&self) -> Vec<Category> {
        self.slots()
            .filter(|(_, slot)| slot.is_none())
            .map(|(c, _)| c)
            .collect()
    }

    pub fn filled_count(&self) -> usize {
        self.filled().count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count() == Category::ALL.len()
    }

    /// Sum of the region price of every filled slot.
    pub fn total_cost(&self, region: Region) -> f64 {
        self.filled()
            .map(|component| component.price(region).unwrap_or(0.0))
            .sum()
    }
}

/// The allocator's answer to one request.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizedBuild {
    pub region: Region,
    pub budget: f64,
    pub configuration: BuildConfiguration,
    pub total_cost: f64,
    /// `total_cost / budget × 100`.
    pub budget_utilization: f64,
    pub is_complete: bool,
    pub compatibility_issues: Vec<String>,
    pub notes: Vec<OptimizationNote>,
    pub performance_score: f64,
    /// Categories filled by synthesized placeholders.
    pub fallback_categories: Vec<Category>,
    pub snapshot_digest: SnapshotDigest,
}

impl OptimizedBuild {
    /// Aggregate score rounded for display.
    pub fn performance_score_display(&self) -> u32 {
        self.performance_score.round().max(0.0) as u32
    }

    /// Whether any slot holds a placeholder instead of a catalog part.
    pub fn is_reduced_confidence(&self) -> bool {
        !self.fallback_categories.is_empty()
    }

    pub fn is_within_budget(&self) -> bool {
        self.total_cost <= self.budget
    }

    /// Stable digest of the request and the selected part IDs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.region.code().as_bytes());
        hasher.update(b"\n");
        hasher.update(format!("{:.2}", self.budget).as_bytes());
        hasher.update(b"\n");
        hasher.update(self.snapshot_digest.0.as_bytes());
        hasher.update(b"\n");
        for (category, slot) in self.configuration.slots() {
            hasher.update(category.as_str().as_bytes());
            hasher.update(b":");
            hasher.update(slot.map(|c| c.id.as_str()).unwrap_or("-").as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    /// Pretty JSON rendering for callers that log or persist results.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_build_has_all_keys_and_no_parts() {
        let build = BuildConfiguration::empty();
        assert_eq!(build.slots().count(), 8);
        assert_eq!(build.missing(), Category::ALL.to_vec());
        assert!(!build.is_complete());
    }

    #[test]
    fn place_replaces_only_its_own_slot() {
        let mut build = BuildConfiguration::empty();
        let first = Component::new("a", "First", Category::Ram).with_price(Region::Us, 40.0);
        let second = Component::new("b", "Second", Category::Ram).with_price(Region::Us, 60.0);

        assert!(build.place(first.clone()).is_none());
        assert_eq!(build.place(second), Some(first));
        assert_eq!(build.filled_count(), 1);
        assert_eq!(build.get(Category::Ram).map(|c| c.id.as_str()), Some("b"));
        assert_eq!(build.slots().count(), 8);
    }

    #[test]
    fn total_cost_uses_region_price() {
        let mut build = BuildConfiguration::empty();
        build.place(
            Component::new("c", "CPU", Category::Cpu)
                .with_price(Region::Us, 200.0)
                .with_price(Region::De, 180.0),
        );
        build.place(Component::new("k", "Case", Category::Case).with_price(Region::De, 70.0));

        assert_eq!(build.total_cost(Region::De), 250.0);
        assert_eq!(build.total_cost(Region::Us), 200.0);
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut build = BuildConfiguration::empty();
        build.place(Component::new("p", "PSU", Category::Psu));
        assert!(build.clear(Category::Psu).is_some());
        assert!(build.get(Category::Psu).is_none());
        assert_eq!(build.slots().count(), 8);
    }
}
