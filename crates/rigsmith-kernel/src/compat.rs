//! Compatibility evaluation.
//!
//! Four hard constraints link categories:
//!
//! | violation           | categories           | repaired by swapping |
//! |---------------------|----------------------|----------------------|
//! | socket mismatch     | CPU, motherboard     | motherboard          |
//! | memory-type mismatch| RAM, motherboard     | RAM                  |
//! | insufficient PSU    | PSU, CPU, GPU        | PSU                  |
//! | GPU clearance       | GPU, case            | case                 |
//!
//! A check only fires when every spec it compares is known. Unknown specs
//! never count as a mismatch.

use rigsmith_catalog::{Category, Component};
use serde::Serialize;

use crate::build::BuildConfiguration;
use crate::config::AllocatorConfig;

/// A detected hard violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    SocketMismatch,
    MemoryTypeMismatch,
    InsufficientPsu,
    GpuClearance,
}

impl Violation {
    /// Evaluation and repair order.
    pub const ALL: [Violation; 4] = [
        Violation::SocketMismatch,
        Violation::MemoryTypeMismatch,
        Violation::InsufficientPsu,
        Violation::GpuClearance,
    ];

    /// Issue text reported on the finished build.
    pub fn message(&self) -> &'static str {
        match self {
            Violation::SocketMismatch => "CPU socket does not match motherboard",
            Violation::MemoryTypeMismatch => "RAM memory type does not match motherboard",
            Violation::InsufficientPsu => "PSU wattage is insufficient for estimated system draw",
            Violation::GpuClearance => "GPU length exceeds case clearance",
        }
    }

    /// Categories whose parts take part in the check.
    pub fn categories(&self) -> &'static [Category] {
        match self {
            Violation::SocketMismatch => &[Category::Cpu, Category::Motherboard],
            Violation::MemoryTypeMismatch => &[Category::Ram, Category::Motherboard],
            Violation::InsufficientPsu => &[Category::Psu, Category::Cpu, Category::Gpu],
            Violation::GpuClearance => &[Category::Gpu, Category::Case],
        }
    }

    /// The slot the repair pass substitutes.
    pub fn repair_category(&self) -> Category {
        match self {
            Violation::SocketMismatch => Category::Motherboard,
            Violation::MemoryTypeMismatch => Category::Ram,
            Violation::InsufficientPsu => Category::Psu,
            Violation::GpuClearance => Category::Case,
        }
    }

    pub fn involves(&self, category: Category) -> bool {
        self.categories().contains(&category)
    }
}

/// A build seen with one slot optionally overridden by a candidate.
#[derive(Clone, Copy)]
pub struct SlotView<'a> {
    build: &'a BuildConfiguration,
    candidate: Option<&'a Component>,
}

impl<'a> SlotView<'a> {
    pub fn of(build: &'a BuildConfiguration) -> Self {
        Self {
            build,
            candidate: None,
        }
    }

    pub fn with_candidate(build: &'a BuildConfiguration, candidate: &'a Component) -> Self {
        Self {
            build,
            candidate: Some(candidate),
        }
    }

    pub fn get(&self, category: Category) -> Option<&'a Component> {
        match self.candidate {
            Some(candidate) if candidate.category == category => Some(candidate),
            _ => self.build.get(category),
        }
    }
}

/// Penalty and issue computation under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityEvaluator<'a> {
    config: &'a AllocatorConfig,
}

impl<'a> CompatibilityEvaluator<'a> {
    pub fn new(config: &'a AllocatorConfig) -> Self {
        Self { config }
    }

    /// Estimated system draw in watts.
    ///
    /// Empty CPU/GPU slots and unknown draws use the configured defaults.
    pub fn estimated_draw(&self, view: SlotView<'_>) -> f64 {
        let draw = &self.config.draw;
        let cpu = view
            .get(Category::Cpu)
            .and_then(|c| c.specs.power_draw_w)
            .unwrap_or(draw.cpu_default_w);
        let gpu = view
            .get(Category::Gpu)
            .and_then(|c| c.specs.power_draw_w)
            .unwrap_or(draw.gpu_default_w);
        draw.base_w + cpu + gpu + draw.ram_w + draw.storage_w
    }

    pub fn build_draw(&self, build: &BuildConfiguration) -> f64 {
        self.estimated_draw(SlotView::of(build))
    }

    /// Whether `violation` holds in `view`.
    pub fn detects(&self, violation: Violation, view: SlotView<'_>) -> bool {
        match violation {
            Violation::SocketMismatch => specs_differ(
                view.get(Category::Cpu).and_then(|c| c.specs.socket.as_deref()),
                view.get(Category::Motherboard)
                    .and_then(|c| c.specs.socket.as_deref()),
            ),
            Violation::MemoryTypeMismatch => specs_differ(
                view.get(Category::Ram)
                    .and_then(|c| c.specs.memory_type.as_deref()),
                view.get(Category::Motherboard)
                    .and_then(|c| c.specs.memory_type.as_deref()),
            ),
            Violation::InsufficientPsu => {
                match view.get(Category::Psu).and_then(|c| c.specs.wattage_w) {
                    Some(wattage) => {
                        wattage < self.config.penalties.psu_headroom * self.estimated_draw(view)
                    }
                    None => false,
                }
            }
            Violation::GpuClearance => {
                let length = view.get(Category::Gpu).and_then(|c| c.specs.length_mm);
                let clearance = view
                    .get(Category::Case)
                    .and_then(|c| c.specs.max_gpu_length_mm);
                matches!((length, clearance), (Some(length), Some(clearance)) if length > clearance)
            }
        }
    }

    /// Whether `candidate`, placed into `build`, positively satisfies the
    /// constraint behind `violation` (known specs, within limits).
    pub fn resolves(
        &self,
        violation: Violation,
        candidate: &Component,
        build: &BuildConfiguration,
    ) -> bool {
        let view = SlotView::with_candidate(build, candidate);
        match violation {
            Violation::SocketMismatch => specs_match(
                view.get(Category::Cpu).and_then(|c| c.specs.socket.as_deref()),
                view.get(Category::Motherboard)
                    .and_then(|c| c.specs.socket.as_deref()),
            ),
            Violation::MemoryTypeMismatch => specs_match(
                view.get(Category::Ram)
                    .and_then(|c| c.specs.memory_type.as_deref()),
                view.get(Category::Motherboard)
                    .and_then(|c| c.specs.memory_type.as_deref()),
            ),
            Violation::InsufficientPsu => view
                .get(Category::Psu)
                .and_then(|c| c.specs.wattage_w)
                .is_some_and(|w| w >= self.config.repair.psu_headroom * self.estimated_draw(view)),
            Violation::GpuClearance => {
                let length = view.get(Category::Gpu).and_then(|c| c.specs.length_mm);
                let clearance = view
                    .get(Category::Case)
                    .and_then(|c| c.specs.max_gpu_length_mm);
                matches!((length, clearance), (Some(length), Some(clearance)) if length <= clearance)
            }
        }
    }

    /// Violations present in `build`, in evaluation order.
    pub fn violations(&self, build: &BuildConfiguration) -> Vec<Violation> {
        Violation::ALL
            .into_iter()
            .filter(|v| self.detects(*v, SlotView::of(build)))
            .collect()
    }

    fn violation_penalty(&self, violation: Violation) -> f64 {
        let penalties = &self.config.penalties;
        match violation {
            Violation::SocketMismatch => penalties.socket_mismatch,
            Violation::MemoryTypeMismatch => penalties.memory_type_mismatch,
            Violation::InsufficientPsu => penalties.insufficient_psu,
            Violation::GpuClearance => penalties.gpu_clearance,
        }
    }

    /// Compatibility score of placing `candidate` into `partial`.
    ///
    /// Starts at 100 and subtracts the penalty of every violation the
    /// candidate takes part in against what is already placed. Floored at 0.
    pub fn penalty(&self, candidate: &Component, partial: &BuildConfiguration) -> f64 {
        let view = SlotView::with_candidate(partial, candidate);
        let deducted: f64 = Violation::ALL
            .into_iter()
            .filter(|v| v.involves(candidate.category))
            .filter(|v| self.detects(*v, view))
            .map(|v| self.violation_penalty(v))
            .sum();
        (100.0 - deducted).max(0.0)
    }

    /// Textual issues for a build: violations first, then empty slots.
    pub fn issues(&self, build: &BuildConfiguration) -> Vec<String> {
        let mut issues: Vec<String> = self
            .violations(build)
            .into_iter()
            .map(|v| v.message().to_string())
            .collect();
        issues.extend(
            build
                .missing()
                .into_iter()
                .map(|category| format!("No {} selected", category.label())),
        );
        issues
    }
}

fn specs_differ(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if !a.trim().eq_ignore_ascii_case(b.trim()))
}

fn specs_match(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.trim().eq_ignore_ascii_case(b.trim()))
}
