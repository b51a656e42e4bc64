//! Closed vocabularies: component categories, pricing regions, stock states.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// One of the eight required build slots.
///
/// Declaration order is the canonical display order; it is also the
/// `Ord` used by every `BTreeMap` keyed on categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Gpu,
    Motherboard,
    Ram,
    Storage,
    Psu,
    Cooler,
    Case,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 8] = [
        Category::Cpu,
        Category::Gpu,
        Category::Motherboard,
        Category::Ram,
        Category::Storage,
        Category::Psu,
        Category::Cooler,
        Category::Case,
    ];

    /// Stable lowercase key (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Gpu => "gpu",
            Category::Motherboard => "motherboard",
            Category::Ram => "ram",
            Category::Storage => "storage",
            Category::Psu => "psu",
            Category::Cooler => "cooler",
            Category::Case => "case",
        }
    }

    /// Human-facing label used in notes and issues.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Gpu => "GPU",
            Category::Motherboard => "motherboard",
            Category::Ram => "RAM",
            Category::Storage => "storage",
            Category::Psu => "PSU",
            Category::Cooler => "cooler",
            Category::Case => "case",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" | "processor" => Ok(Category::Cpu),
            "gpu" | "graphics" => Ok(Category::Gpu),
            "motherboard" | "mobo" => Ok(Category::Motherboard),
            "ram" | "memory" => Ok(Category::Ram),
            "storage" => Ok(Category::Storage),
            "psu" | "power_supply" => Ok(Category::Psu),
            "cooler" => Ok(Category::Cooler),
            "case" => Ok(Category::Case),
            _ => Err(CatalogError::UnknownCategory(s.to_string())),
        }
    }
}

/// Currency region a price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Us,
    Ca,
    Uk,
    De,
    Au,
}

impl Region {
    pub const ALL: [Region; 5] = [Region::Us, Region::Ca, Region::Uk, Region::De, Region::Au];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Ca => "CA",
            Region::Uk => "UK",
            Region::De => "DE",
            Region::Au => "AU",
        }
    }

    /// Symbol prefixed to amounts in rendered notes.
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Region::Us => "$",
            Region::Ca => "C$",
            Region::Uk => "£",
            Region::De => "€",
            Region::Au => "A$",
        }
    }

    /// Render an amount in this region's currency, two decimals.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{amount:.2}", self.currency_symbol())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "US" => Ok(Region::Us),
            "CA" => Ok(Region::Ca),
            "UK" | "GB" => Ok(Region::Uk),
            "DE" => Ok(Region::De),
            "AU" => Ok(Region::Au),
            _ => Err(CatalogError::UnknownRegion(s.to_string())),
        }
    }
}

/// Stock state reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    #[default]
    InStock,
    Limited,
    OutOfStock,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::InStock => "in-stock",
            Availability::Limited => "limited",
            Availability::OutOfStock => "out-of-stock",
        }
    }

    /// Purchase preference: in stock first, out of stock last.
    pub fn rank(&self) -> u8 {
        match self {
            Availability::InStock => 0,
            Availability::Limited => 1,
            Availability::OutOfStock => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parse_is_case_insensitive() {
        assert_eq!("us".parse::<Region>().unwrap(), Region::Us);
        assert_eq!(" De ".parse::<Region>().unwrap(), Region::De);
        assert_eq!("gb".parse::<Region>().unwrap(), Region::Uk);
        assert!(matches!(
            "FR".parse::<Region>(),
            Err(CatalogError::UnknownRegion(code)) if code == "FR"
        ));
    }

    #[test]
    fn category_serde_matches_as_str() {
        for category in Category::ALL {
            let encoded = serde_json::to_value(category).unwrap();
            assert_eq!(encoded, serde_json::json!(category.as_str()));
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn availability_uses_kebab_case() {
        let parsed: Availability = serde_json::from_str("\"out-of-stock\"").unwrap();
        assert_eq!(parsed, Availability::OutOfStock);
        assert_eq!(Availability::default(), Availability::InStock);
        assert!(Availability::InStock.rank() < Availability::Limited.rank());
        assert!(Availability::Limited.rank() < Availability::OutOfStock.rank());
    }

    #[test]
    fn region_formats_amounts() {
        assert_eq!(Region::Uk.format_amount(12.5), "£12.50");
        assert_eq!(Region::Au.format_amount(300.0), "A$300.00");
    }
}
