//! Emergency fallback.
//!
//! Fills every slot still empty with a synthesized placeholder so the
//! build always ends up complete. Placeholders carry conservative specs
//! that agree with whatever is already placed (socket, memory type,
//! clearance, PSU headroom), a nominal price, and a description starting
//! with [`FALLBACK_TAG`].

use rigsmith_catalog::{Category, Component, ComponentSpecs, CoolerType, FALLBACK_TAG, Region};
use tracing::warn;

use crate::build::BuildConfiguration;
use crate::config::Phase;
use crate::notes::{NoteKind, OptimizationNote};
use crate::pipeline::PhaseContext;

const DEFAULT_MEMORY_TYPE: &str = "DDR4";
const DEFAULT_GPU_LENGTH_MM: f64 = 240.0;
const DEFAULT_CASE_CLEARANCE_MM: f64 = 330.0;
const MIN_PSU_WATTAGE_W: f64 = 500.0;
const PSU_STEP_W: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub build: BuildConfiguration,
    /// Categories that received a placeholder, in fill order.
    pub filled: Vec<Category>,
    pub notes: Vec<OptimizationNote>,
}

pub fn fill_missing(mut build: BuildConfiguration, ctx: &PhaseContext<'_>) -> FallbackOutcome {
    let mut filled = Vec::new();
    let mut notes = Vec::new();

    for category in Category::ALL {
        if build.get(category).is_some() {
            continue;
        }
        let placeholder = placeholder(category, &build, ctx);
        let price = placeholder.price(ctx.region).unwrap_or(0.0);
        warn!(%category, region = %ctx.region, price, "filling slot with fallback placeholder");
        notes.push(OptimizationNote::new(
            Phase::Fallback,
            NoteKind::Fallback,
            Some(category),
            format!(
                "Fallback: no catalog {} available; using placeholder {} at nominal {}",
                category.label(),
                placeholder.name,
                ctx.region.format_amount(price),
            ),
        ));
        build.place(placeholder);
        filled.push(category);
    }

    FallbackOutcome {
        build,
        filled,
        notes,
    }
}

/// Nominal placeholder price, in the request region's currency.
pub fn nominal_price(category: Category) -> f64 {
    match category {
        Category::Cpu => 120.0,
        Category::Gpu => 200.0,
        Category::Motherboard => 100.0,
        Category::Ram => 50.0,
        Category::Storage => 45.0,
        Category::Psu => 60.0,
        Category::Cooler => 25.0,
        Category::Case => 60.0,
    }
}

fn placeholder(category: Category, build: &BuildConfiguration, ctx: &PhaseContext<'_>) -> Component {
    let specs = placeholder_specs(category, build, ctx);
    synthesize(category, ctx.region, specs)
}

fn synthesize(category: Category, region: Region, specs: ComponentSpecs) -> Component {
    let label = category.label();
    let mut title = label.to_string();
    if let Some(first) = title.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    Component::new(
        format!("fallback-{}", category.as_str()),
        format!("Generic {title} (fallback)"),
        category,
    )
    .with_brand("Generic")
    .with_price(region, nominal_price(category))
    .with_description(format!(
        "{FALLBACK_TAG} synthesized {label}; no catalog candidate was available"
    ))
    .with_specs(specs)
}

fn placeholder_specs(
    category: Category,
    build: &BuildConfiguration,
    ctx: &PhaseContext<'_>,
) -> ComponentSpecs {
    let spec_of = |slot: Category| build.get(slot).map(|c| &c.specs);
    let draw = &ctx.config.draw;

    match category {
        Category::Cpu => ComponentSpecs {
            socket: spec_of(Category::Motherboard).and_then(|s| s.socket.clone()),
            power_draw_w: Some(draw.cpu_default_w),
            ..ComponentSpecs::default()
        },
        Category::Gpu => {
            let clearance = spec_of(Category::Case).and_then(|s| s.max_gpu_length_mm);
            let length = match clearance {
                Some(clearance) => DEFAULT_GPU_LENGTH_MM.min(clearance),
                None => DEFAULT_GPU_LENGTH_MM,
            };
            ComponentSpecs {
                power_draw_w: Some(draw.gpu_default_w),
                length_mm: Some(length),
                ..ComponentSpecs::default()
            }
        }
        Category::Motherboard => ComponentSpecs {
            socket: spec_of(Category::Cpu).and_then(|s| s.socket.clone()),
            memory_type: Some(
                spec_of(Category::Ram)
                    .and_then(|s| s.memory_type.clone())
                    .unwrap_or_else(|| DEFAULT_MEMORY_TYPE.to_string()),
            ),
            form_factor: Some("ATX".to_string()),
            ..ComponentSpecs::default()
        },
        Category::Ram => ComponentSpecs {
            memory_type: Some(
                spec_of(Category::Motherboard)
                    .and_then(|s| s.memory_type.clone())
                    .unwrap_or_else(|| DEFAULT_MEMORY_TYPE.to_string()),
            ),
            capacity_gb: Some(16),
            ..ComponentSpecs::default()
        },
        Category::Storage => ComponentSpecs {
            interface: Some("sata".to_string()),
            capacity_gb: Some(500),
            ..ComponentSpecs::default()
        },
        Category::Psu => {
            let required = ctx.evaluator().build_draw(build) * ctx.config.repair.psu_headroom;
            let wattage = ((required / PSU_STEP_W).ceil() * PSU_STEP_W).max(MIN_PSU_WATTAGE_W);
            ComponentSpecs {
                wattage_w: Some(wattage),
                efficiency: Some("80+ Bronze".to_string()),
                ..ComponentSpecs::default()
            }
        }
        Category::Cooler => ComponentSpecs {
            cooler_type: Some(CoolerType::Air),
            ..ComponentSpecs::default()
        },
        Category::Case => {
            let gpu_length = spec_of(Category::Gpu).and_then(|s| s.length_mm);
            let clearance = gpu_length.map_or(DEFAULT_CASE_CLEARANCE_MM, |len| {
                len.max(DEFAULT_CASE_CLEARANCE_MM)
            });
            ComponentSpecs {
                max_gpu_length_mm: Some(clearance),
                form_factor: Some("ATX".to_string()),
                ..ComponentSpecs::default()
            }
        }
    }
}
