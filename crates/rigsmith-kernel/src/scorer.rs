//! Performance scoring.
//!
//! A score is a 0–100 estimate of how much a part contributes to gaming
//! performance. CPUs and GPUs are ranked by ordered tier tables matched
//! against the product name (most specific tier first). RAM and storage
//! are ranked from their specs. Everything else, and any name no tier
//! matches, falls back to `min(price / k, 100)` with a per-category `k`.
//!
//! This is a proxy, not a benchmark. The allocator only depends on the
//! `PerformanceModel` trait, so a measured table can replace it.

use regex::Regex;
use rigsmith_catalog::{Category, Component, Region};
use std::sync::OnceLock;

use crate::build::BuildConfiguration;
use crate::config::CategoryWeights;

/// Pure mapping from a component to a score in `[0, 100]`.
pub trait PerformanceModel {
    fn score(&self, component: &Component) -> f64;
}

/// Name- and spec-driven scorer. Price fallbacks use `region` prices.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicScorer {
    region: Region,
}

impl HeuristicScorer {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    fn price_estimate(&self, component: &Component) -> f64 {
        let price = component.price(self.region).unwrap_or(0.0);
        (price / price_scale(component.category)).min(100.0)
    }
}

impl PerformanceModel for HeuristicScorer {
    fn score(&self, component: &Component) -> f64 {
        let name = component.name.to_lowercase();
        let ruled = match component.category {
            Category::Cpu => tier_score(cpu_tiers(), &name),
            Category::Gpu => tier_score(gpu_tiers(), &name),
            Category::Ram => ram_score(component, &name),
            Category::Storage => storage_score(component, &name),
            _ => None,
        };
        ruled
            .unwrap_or_else(|| self.price_estimate(component))
            .clamp(0.0, 100.0)
    }
}

/// Divisor `k` of the price fallback.
pub fn price_scale(category: Category) -> f64 {
    match category {
        Category::Cpu => 6.0,
        Category::Gpu => 16.0,
        Category::Motherboard => 4.0,
        Category::Ram => 2.0,
        Category::Storage => 2.0,
        Category::Psu => 2.0,
        Category::Cooler => 1.5,
        Category::Case => 1.5,
    }
}

/// Weighted sum of the scores of every filled slot.
pub fn aggregate_score(
    build: &BuildConfiguration,
    model: &dyn PerformanceModel,
    weights: &CategoryWeights,
) -> f64 {
    build
        .filled()
        .map(|component| model.score(component) * weights.weight(component.category))
        .sum()
}

type TierTable = Vec<(Regex, f64)>;

fn tier_score(table: &TierTable, name: &str) -> Option<f64> {
    table
        .iter()
        .find(|(pattern, _)| pattern.is_match(name))
        .map(|(_, score)| *score)
}

fn compile(rows: &[(&str, f64)]) -> TierTable {
    rows.iter()
        .map(|(pattern, score)| {
            (
                Regex::new(pattern).expect("tier pattern must compile"),
                *score,
            )
        })
        .collect()
}

fn cpu_tiers() -> &'static TierTable {
    static TABLE: OnceLock<TierTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        compile(&[
            (r"\b(7950x3d|9950x3d)\b", 100.0),
            (r"\b(14900ks?|13900ks?|9950x|7950x)\b", 97.0),
            (r"\b(7800x3d|9800x3d)\b", 96.0),
            (r"\bi9\b|\bryzen 9\b|\bultra 9\b", 92.0),
            (r"\b(14700kf?|13700kf?|9700x|7700x)\b", 86.0),
            (r"\bi7\b|\bryzen 7\b|\bultra 7\b", 82.0),
            (r"\b(14600kf?|13600kf?|9600x|7600x)\b", 76.0),
            (r"\bi5\b|\bryzen 5\b|\bultra 5\b", 70.0),
            (r"\bi3\b|\bryzen 3\b", 52.0),
            (r"\b(pentium|celeron|athlon)\b", 32.0),
        ])
    })
}

fn gpu_tiers() -> &'static TierTable {
    static TABLE: OnceLock<TierTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        compile(&[
            (r"rtx\s*5090\b", 100.0),
            (r"rtx\s*4090\b", 97.0),
            (r"rtx\s*5080\b", 92.0),
            (r"rtx\s*4080\b", 90.0),
            (r"rx\s*7900\s*xtx\b", 89.0),
            (r"rtx\s*(4070\s*ti\s*super|5070\s*ti)\b", 84.0),
            (r"rx\s*7900\s*xt\b", 83.0),
            (r"rtx\s*4070\s*ti\b", 80.0),
            (r"rtx\s*(4070\s*super|5070)\b", 78.0),
            (r"rtx\s*4070\b", 74.0),
            (r"rx\s*7800\s*xt\b", 73.0),
            (r"rx\s*7700\s*xt\b", 66.0),
            (r"rtx\s*4060\s*ti\b", 62.0),
            (r"rtx\s*3070\b", 60.0),
            (r"rtx\s*4060\b", 55.0),
            (r"rx\s*7600\b", 52.0),
            (r"rtx\s*3060\b", 48.0),
            (r"arc\s*a7[57]0\b", 46.0),
            (r"rx\s*6600\b", 42.0),
            (r"gtx\s*1660\b", 32.0),
            (r"gtx\s*1650\b", 25.0),
        ])
    })
}

fn capacity_from_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d+(?:\.\d+)?)\s*(tb|gb)\b").expect("capacity regex must compile")
    })
}

/// Capacity in GB from specs, else from a `32GB` / `2TB` name token.
fn capacity_gb(component: &Component, name: &str) -> Option<f64> {
    if let Some(capacity) = component.specs.capacity_gb {
        return Some(f64::from(capacity));
    }
    let captures = capacity_from_name_re().captures(name)?;
    let amount: f64 = captures.get(1)?.as_str().parse().ok()?;
    match captures.get(2)?.as_str() {
        "tb" => Some(amount * 1000.0),
        _ => Some(amount),
    }
}

fn ram_score(component: &Component, name: &str) -> Option<f64> {
    let capacity = capacity_gb(component, name)?;
    let base: f64 = if capacity >= 64.0 {
        90.0
    } else if capacity >= 32.0 {
        80.0
    } else if capacity >= 16.0 {
        62.0
    } else if capacity >= 8.0 {
        40.0
    } else {
        25.0
    };

    let ddr5 = component
        .specs
        .memory_type
        .as_deref()
        .map(|t| t.eq_ignore_ascii_case("ddr5"))
        .unwrap_or_else(|| name.contains("ddr5"));
    let bonus = if ddr5 { 8.0 } else { 0.0 };

    Some((base + bonus).min(100.0))
}

fn storage_score(component: &Component, name: &str) -> Option<f64> {
    let interface = component
        .specs
        .interface
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let base: f64 = if interface == "nvme" || name.contains("nvme") || name.contains("m.2") {
        if name.contains("gen5") || name.contains("gen 5") {
            80.0
        } else if name.contains("gen4") || name.contains("gen 4") {
            75.0
        } else {
            70.0
        }
    } else if interface == "sata" || name.contains("ssd") {
        55.0
    } else if interface == "hdd" || name.contains("hdd") || name.contains("rpm") {
        30.0
    } else {
        return None;
    };

    let bonus = match capacity_gb(component, name) {
        Some(gb) if gb >= 4000.0 => 15.0,
        Some(gb) if gb >= 2000.0 => 10.0,
        Some(gb) if gb >= 1000.0 => 5.0,
        _ => 0.0,
    };

    Some((base + bonus).min(100.0))
}
