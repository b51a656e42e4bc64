//! Component type: one immutable catalog entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::{Availability, Category, Region};

/// Description prefix carried by synthesized placeholder components.
pub const FALLBACK_TAG: &str = "[fallback]";

/// A priced, categorized part as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    // ── Identification ──
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub brand: String,
    pub category: Category,

    // ── Market state ──
    #[serde(default)]
    pub prices: BTreeMap<Region, f64>,
    #[serde(default)]
    pub availability: Availability,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // ── Typed specs (every field optional) ──
    #[serde(default)]
    pub specs: ComponentSpecs,
}

/// Category-specific spec bag.
///
/// Absent fields are unknown. Checks that need a field skip when it is
/// missing; nothing here is ever read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpecs {
    /// CPU / motherboard socket, e.g. `AM5`, `LGA1700`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    /// Typical board power (CPU TDP, GPU TBP) in watts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_draw_w: Option<f64>,
    /// RAM module type, or the memory type a motherboard accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_mhz: Option<u32>,
    /// Storage interface, e.g. `nvme`, `sata`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// Physical GPU length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_mm: Option<f64>,
    /// Longest GPU a case accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gpu_length_mm: Option<f64>,
    /// PSU rated output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wattage_w: Option<f64>,
    /// PSU efficiency tier, e.g. `80+ Gold`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooler_type: Option<CoolerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoolerType {
    Air,
    Liquid,
}

impl Component {
    /// Start a component with no prices, in stock, and empty specs.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: String::new(),
            category,
            prices: BTreeMap::new(),
            availability: Availability::InStock,
            description: None,
            specs: ComponentSpecs::default(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_price(mut self, region: Region, price: f64) -> Self {
        self.prices.insert(region, price);
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_specs(mut self, specs: ComponentSpecs) -> Self {
        self.specs = specs;
        self
    }

    /// Price in `region`, if listed there with a usable value.
    pub fn price(&self, region: Region) -> Option<f64> {
        self.prices
            .get(&region)
            .copied()
            .filter(|p| p.is_finite() && *p >= 0.0)
    }

    pub fn is_in_stock(&self) -> bool {
        self.availability == Availability::InStock
    }

    /// Whether this entry was synthesized rather than listed.
    pub fn is_fallback(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| d.starts_with(FALLBACK_TAG))
    }

    /// Structural validation applied on load.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("component id is empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err(format!("component {} has an empty name", self.id));
        }
        for (region, price) in &self.prices {
            if !price.is_finite() || *price < 0.0 {
                return Err(format!(
                    "component {} has invalid {region} price {price}",
                    self.id
                ));
            }
        }
        Ok(())
    }
}
