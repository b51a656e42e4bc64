//! Allocator configuration.
//!
//! One struct carries every tuning constant the pipeline uses: category
//! orders, phase order, penalty amounts, PSU headroom, the substitution
//! price band, upgrade score weights and the aggregate category weights.
//! `Default` is the production configuration. Requests never supply their
//! own; internal variants are loaded from TOML.

use rigsmith_catalog::{Category, Component};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::AllocationError;

/// A pipeline phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Greedy,
    Repair,
    Upgrade,
    Fallback,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Greedy => "greedy",
            Phase::Repair => "repair",
            Phase::Upgrade => "upgrade",
            Phase::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete allocator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Greedy fill order. Must list every category exactly once.
    pub greedy_order: Vec<Category>,
    /// Categories the upgrade optimizer may touch, highest priority first.
    pub upgrade_order: Vec<Category>,
    /// Phase order. Greedy first, fallback last.
    pub phase_order: Vec<Phase>,
    /// Upper bound on upgrade passes over `upgrade_order`.
    pub max_upgrade_passes: usize,
    pub penalties: PenaltyConfig,
    pub draw: DrawEstimate,
    pub repair: RepairConfig,
    pub upgrade_weights: UpgradeWeights,
    pub category_weights: CategoryWeights,
    pub minimum_spec: MinimumSpec,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            greedy_order: vec![
                Category::Cpu,
                Category::Motherboard,
                Category::Ram,
                Category::Storage,
                Category::Psu,
                Category::Cooler,
                Category::Case,
                Category::Gpu,
            ],
            upgrade_order: vec![
                Category::Gpu,
                Category::Cpu,
                Category::Ram,
                Category::Storage,
            ],
            phase_order: vec![
                Phase::Greedy,
                Phase::Repair,
                Phase::Upgrade,
                Phase::Fallback,
            ],
            max_upgrade_passes: 64,
            penalties: PenaltyConfig::default(),
            draw: DrawEstimate::default(),
            repair: RepairConfig::default(),
            upgrade_weights: UpgradeWeights::default(),
            category_weights: CategoryWeights::default(),
            minimum_spec: MinimumSpec::default(),
        }
    }
}

/// Amounts subtracted from a 100-point compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    pub socket_mismatch: f64,
    pub memory_type_mismatch: f64,
    pub insufficient_psu: f64,
    pub gpu_clearance: f64,
    /// PSU wattage below `psu_headroom × draw` counts as insufficient.
    pub psu_headroom: f64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            socket_mismatch: 50.0,
            memory_type_mismatch: 30.0,
            insufficient_psu: 40.0,
            gpu_clearance: 30.0,
            psu_headroom: 1.2,
        }
    }
}

/// Constants for the estimated system power draw, in watts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawEstimate {
    pub base_w: f64,
    pub cpu_default_w: f64,
    pub gpu_default_w: f64,
    pub ram_w: f64,
    pub storage_w: f64,
}

impl Default for DrawEstimate {
    fn default() -> Self {
        Self {
            base_w: 100.0,
            cpu_default_w: 65.0,
            gpu_default_w: 150.0,
            ram_w: 10.0,
            storage_w: 5.0,
        }
    }
}

/// Bounded-cost substitution used by the repair pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Substitutes up to this multiple of the placed price are routine.
    pub preferred_price_ratio: f64,
    /// Substitutes above this multiple are never considered.
    pub max_price_ratio: f64,
    /// A replacement PSU must deliver at least `psu_headroom × draw`.
    pub psu_headroom: f64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            preferred_price_ratio: 1.2,
            max_price_ratio: 1.5,
            psu_headroom: 1.3,
        }
    }
}

/// Weights of the upgrade candidate score.
///
/// `performance × perf + value × value_scale × perf / price + compatibility × penalty`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeWeights {
    pub performance: f64,
    pub value: f64,
    pub compatibility: f64,
    pub value_scale: f64,
}

impl Default for UpgradeWeights {
    fn default() -> Self {
        Self {
            performance: 0.5,
            value: 0.3,
            compatibility: 0.2,
            value_scale: 1000.0,
        }
    }
}

/// Per-category contribution to the aggregate performance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub gpu: f64,
    pub cpu: f64,
    pub ram: f64,
    pub storage: f64,
    pub motherboard: f64,
    pub psu: f64,
    pub cooler: f64,
    pub case: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            gpu: 0.45,
            cpu: 0.25,
            ram: 0.10,
            storage: 0.08,
            motherboard: 0.05,
            psu: 0.03,
            cooler: 0.02,
            case: 0.02,
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Gpu => self.gpu,
            Category::Cpu => self.cpu,
            Category::Ram => self.ram,
            Category::Storage => self.storage,
            Category::Motherboard => self.motherboard,
            Category::Psu => self.psu,
            Category::Cooler => self.cooler,
            Category::Case => self.case,
        }
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.weight(*c)).sum()
    }
}

/// Optional floor the greedy pass prefers to meet.
///
/// A candidate whose relevant field is unknown is admitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumSpec {
    pub psu_wattage_w: Option<f64>,
    pub ram_capacity_gb: Option<u32>,
    pub storage_capacity_gb: Option<u32>,
}

impl MinimumSpec {
    pub fn is_unset(&self) -> bool {
        self.psu_wattage_w.is_none()
            && self.ram_capacity_gb.is_none()
            && self.storage_capacity_gb.is_none()
    }

    pub fn admits(&self, component: &Component) -> bool {
        let specs = &component.specs;
        match component.category {
            Category::Psu => at_least(specs.wattage_w, self.psu_wattage_w),
            Category::Ram => at_least(specs.capacity_gb, self.ram_capacity_gb),
            Category::Storage => at_least(specs.capacity_gb, self.storage_capacity_gb),
            _ => true,
        }
    }
}

fn at_least<T: PartialOrd>(value: Option<T>, floor: Option<T>) -> bool {
    match (value, floor) {
        (Some(value), Some(floor)) => value >= floor,
        _ => true,
    }
}

impl AllocatorConfig {
    /// Parse and validate a TOML variant. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, AllocationError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run safely.
    pub fn validate(&self) -> Result<(), AllocationError> {
        let greedy: BTreeSet<Category> = self.greedy_order.iter().copied().collect();
        if greedy.len() != self.greedy_order.len() || greedy.len() != Category::ALL.len() {
            return Err(invalid(
                "greedy_order must list every category exactly once",
            ));
        }

        let upgrades: BTreeSet<Category> = self.upgrade_order.iter().copied().collect();
        if upgrades.len() != self.upgrade_order.len() {
            return Err(invalid("upgrade_order must not repeat a category"));
        }

        let phases: BTreeSet<Phase> = self.phase_order.iter().copied().collect();
        if phases.len() != self.phase_order.len() || phases.len() != 4 {
            return Err(invalid("phase_order must list every phase exactly once"));
        }
        if self.phase_order.first() != Some(&Phase::Greedy) {
            return Err(invalid("phase_order must start with greedy"));
        }
        if self.phase_order.last() != Some(&Phase::Fallback) {
            return Err(invalid("phase_order must end with fallback"));
        }

        if self.max_upgrade_passes == 0 {
            return Err(invalid("max_upgrade_passes must be at least 1"));
        }

        let constants = [
            ("penalties.socket_mismatch", self.penalties.socket_mismatch),
            (
                "penalties.memory_type_mismatch",
                self.penalties.memory_type_mismatch,
            ),
            ("penalties.insufficient_psu", self.penalties.insufficient_psu),
            ("penalties.gpu_clearance", self.penalties.gpu_clearance),
            ("penalties.psu_headroom", self.penalties.psu_headroom),
            ("draw.base_w", self.draw.base_w),
            ("draw.cpu_default_w", self.draw.cpu_default_w),
            ("draw.gpu_default_w", self.draw.gpu_default_w),
            ("draw.ram_w", self.draw.ram_w),
            ("draw.storage_w", self.draw.storage_w),
            ("repair.preferred_price_ratio", self.repair.preferred_price_ratio),
            ("repair.max_price_ratio", self.repair.max_price_ratio),
            ("repair.psu_headroom", self.repair.psu_headroom),
            ("upgrade_weights.performance", self.upgrade_weights.performance),
            ("upgrade_weights.value", self.upgrade_weights.value),
            ("upgrade_weights.compatibility", self.upgrade_weights.compatibility),
            ("upgrade_weights.value_scale", self.upgrade_weights.value_scale),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{name} must be a non-negative number (got {value})"
                )));
            }
        }

        if self.repair.preferred_price_ratio > self.repair.max_price_ratio {
            return Err(invalid(
                "repair.preferred_price_ratio must not exceed repair.max_price_ratio",
            ));
        }

        let weight_total = self.category_weights.total();
        if Category::ALL
            .iter()
            .any(|c| self.category_weights.weight(*c) < 0.0)
            || (weight_total - 1.0).abs() > 1e-6
        {
            return Err(invalid(format!(
                "category_weights must be non-negative and sum to 1.0 (got {weight_total})"
            )));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AllocationError {
    AllocationError::InvalidConfig(message.into())
}
