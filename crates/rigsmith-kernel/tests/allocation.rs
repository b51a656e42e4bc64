//! Allocation properties and the classic budget scenarios, end to end
//! through `Optimizer`.

use rigsmith_catalog::{Availability, CatalogSnapshot, Category, Component, ComponentSpecs, Region};
use rigsmith_kernel::{
    AllocationError, AllocatorConfig, HeuristicScorer, NoteKind, OptimizedBuild, Optimizer,
    PerformanceModel, PhaseContext, repair,
};

// ── Catalog builders ──

fn part(id: &str, name: &str, category: Category, price: f64, specs: ComponentSpecs) -> Component {
    Component::new(id, name, category)
        .with_price(Region::Us, price)
        .with_specs(specs)
}

fn cpu(id: &str, name: &str, socket: &str, draw: f64, price: f64) -> Component {
    part(id, name, Category::Cpu, price, ComponentSpecs {
        socket: Some(socket.to_string()),
        power_draw_w: Some(draw),
        ..ComponentSpecs::default()
    })
}

fn board(id: &str, socket: &str, memory: &str, price: f64) -> Component {
    part(id, id, Category::Motherboard, price, ComponentSpecs {
        socket: Some(socket.to_string()),
        memory_type: Some(memory.to_string()),
        ..ComponentSpecs::default()
    })
}

fn gpu(id: &str, name: &str, price: f64) -> Component {
    part(id, name, Category::Gpu, price, ComponentSpecs::default())
}

fn psu(id: &str, watts: f64, price: f64) -> Component {
    part(id, id, Category::Psu, price, ComponentSpecs {
        wattage_w: Some(watts),
        ..ComponentSpecs::default()
    })
}

/// RAM, storage, PSU, cooler and case that suit any DDR5 build.
fn supporting_parts() -> Vec<Component> {
    vec![
        part("ram-16", "16GB DDR5", Category::Ram, 55.0, ComponentSpecs {
            memory_type: Some("DDR5".to_string()),
            capacity_gb: Some(16),
            ..ComponentSpecs::default()
        }),
        part("ssd-1tb", "1TB NVMe", Category::Storage, 69.0, ComponentSpecs {
            interface: Some("nvme".to_string()),
            capacity_gb: Some(1000),
            ..ComponentSpecs::default()
        }),
        psu("psu-650", 650.0, 79.0),
        part("cooler", "Tower Air Cooler", Category::Cooler, 35.0, ComponentSpecs::default()),
        part("case", "Mid Tower", Category::Case, 79.0, ComponentSpecs {
            max_gpu_length_mm: Some(380.0),
            ..ComponentSpecs::default()
        }),
    ]
}

/// AM5 platform with a three-rung GPU ladder. Only the GPU can upgrade.
fn ladder_catalog() -> CatalogSnapshot {
    let mut components = supporting_parts();
    components.extend([
        cpu("cpu-7600", "AMD Ryzen 5 7600", "AM5", 65.0, 199.0),
        board("b650", "AM5", "DDR5", 140.0),
        gpu("gpu-4060", "RTX 4060", 300.0),
        gpu("gpu-4070", "RTX 4070", 600.0),
        gpu("gpu-4080", "RTX 4080", 1200.0),
    ]);
    CatalogSnapshot::from_components(components)
}

fn id_of(build: &OptimizedBuild, category: Category) -> Option<&str> {
    build.configuration.get(category).map(|c| c.id.as_str())
}

// ── Properties ──

#[test]
fn every_build_is_complete() {
    let mut sparse = supporting_parts();
    sparse.push(cpu("cpu-7600", "AMD Ryzen 5 7600", "AM5", 65.0, 199.0));
    let catalogs = [
        ladder_catalog(),
        CatalogSnapshot::from_components(sparse),
        CatalogSnapshot::default(),
    ];

    for snapshot in catalogs {
        let optimizer = Optimizer::new(snapshot);
        for budget in [1.0, 150.0, 700.0, 1500.0, 10_000.0] {
            let build = optimizer.optimize(budget, Region::Us).unwrap();
            assert!(build.is_complete, "incomplete at {budget}");
            assert!(build.configuration.missing().is_empty());
        }
    }
}

#[test]
fn total_cost_is_the_sum_of_slot_prices() {
    let optimizer = Optimizer::new(ladder_catalog());
    for budget in [400.0, 1000.0, 2500.0] {
        let build = optimizer.optimize(budget, Region::Us).unwrap();
        let summed: f64 = build
            .configuration
            .filled()
            .map(|c| c.price(Region::Us).unwrap_or(0.0))
            .sum();
        assert_eq!(build.total_cost, summed);
        assert_eq!(build.budget_utilization, build.total_cost / budget * 100.0);
    }
}

#[test]
fn more_budget_never_lowers_the_score() {
    let optimizer = Optimizer::new(ladder_catalog());
    let scores: Vec<f64> = [600.0, 900.0, 1200.0, 1500.0, 2000.0, 3000.0]
        .into_iter()
        .map(|budget| optimizer.optimize(budget, Region::Us).unwrap().performance_score)
        .collect();

    for pair in scores.windows(2) {
        assert!(pair[1] >= pair[0], "score dropped: {scores:?}");
    }
    assert!(scores[scores.len() - 1] > scores[0]);
}

#[test]
fn upgrades_walk_the_gpu_ladder() {
    let optimizer = Optimizer::new(ladder_catalog());
    let gpu_at = |budget: f64| {
        let build = optimizer.optimize(budget, Region::Us).unwrap();
        id_of(&build, Category::Gpu).map(str::to_string)
    };

    // Base platform plus the 4060 costs 956.
    assert_eq!(gpu_at(1200.0).as_deref(), Some("gpu-4060"));
    assert_eq!(gpu_at(1500.0).as_deref(), Some("gpu-4070"));
    assert_eq!(gpu_at(2000.0).as_deref(), Some("gpu-4080"));
}

#[test]
fn repair_is_idempotent_on_its_own_output() {
    let mut components = supporting_parts();
    components.extend([
        cpu("cpu-7600", "AMD Ryzen 5 7600", "AM5", 65.0, 199.0),
        board("b760", "LGA1700", "DDR5", 100.0),
        board("b650", "AM5", "DDR5", 140.0),
        gpu("gpu-4060", "RTX 4060", 300.0),
    ]);
    let optimizer = Optimizer::new(CatalogSnapshot::from_components(components));
    let build = optimizer.optimize(1500.0, Region::Us).unwrap();
    assert!(build.compatibility_issues.is_empty());

    let scorer = HeuristicScorer::new(Region::Us);
    let ctx = PhaseContext::new(optimizer.snapshot(), Region::Us, optimizer.config(), &scorer);
    let again = repair(build.configuration.clone(), &ctx);
    assert!(again.notes.is_empty());
    assert!(again.issues.is_empty());
    assert_eq!(again.build, build.configuration);
}

#[test]
fn scorer_is_a_replaceable_seam() {
    struct Flat;
    impl PerformanceModel for Flat {
        fn score(&self, _component: &Component) -> f64 {
            50.0
        }
    }

    let optimizer = Optimizer::new(ladder_catalog());
    let build = optimizer.optimize_with(3000.0, Region::Us, &Flat).unwrap();

    // Nothing scores strictly higher, so the cheapest GPU stays.
    assert_eq!(id_of(&build, Category::Gpu), Some("gpu-4060"));
    assert!((build.performance_score - 50.0).abs() < 1e-9);
}

// ── Invalid input ──

#[test]
fn invalid_input_is_the_only_failure() {
    let optimizer = Optimizer::new(ladder_catalog());

    for budget in [0.0, -250.0, f64::NAN, f64::NEG_INFINITY] {
        let err = optimizer.optimize(budget, Region::Us).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidBudget { .. }));
    }

    let err = optimizer.optimize_request(1000.0, "JP").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown region: JP (expected one of US, CA, UK, DE, AU)"
    );

    for code in ["US", "ca", "UK", "de", "AU"] {
        assert!(optimizer.optimize_request(1000.0, code).is_ok(), "{code}");
    }
}

#[test]
fn config_variants_load_from_toml() {
    let config = AllocatorConfig::from_toml_str(
        r#"
        phase_order = ["greedy", "upgrade", "repair", "fallback"]
        max_upgrade_passes = 1

        [minimum_spec]
        ram_capacity_gb = 16
        "#,
    )
    .unwrap();
    let optimizer = Optimizer::with_config(ladder_catalog(), config).unwrap();
    let build = optimizer.optimize(2000.0, Region::Us).unwrap();

    // A single pass climbs one rung only.
    assert_eq!(id_of(&build, Category::Gpu), Some("gpu-4070"));
    assert!(build.is_complete);
}

// ── Scenarios ──

#[test]
fn tight_budget_still_completes_with_over_budget_gpu() {
    let components = vec![
        cpu("cpu-12100f", "Intel Core i3-12100F", "LGA1700", 58.0, 89.0),
        board("h610", "LGA1700", "DDR4", 79.0),
        part("ram-8", "8GB DDR4", Category::Ram, 22.0, ComponentSpecs {
            memory_type: Some("DDR4".to_string()),
            capacity_gb: Some(8),
            ..ComponentSpecs::default()
        }),
        part("ssd-256", "256GB SSD", Category::Storage, 25.0, ComponentSpecs {
            interface: Some("sata".to_string()),
            capacity_gb: Some(256),
            ..ComponentSpecs::default()
        }),
        psu("psu-450", 450.0, 39.0),
        part("cooler", "Stock Cooler", Category::Cooler, 15.0, ComponentSpecs::default()),
        part("case", "Micro Case", Category::Case, 45.0, ComponentSpecs::default()),
        gpu("gpu-4060ti", "RTX 4060 Ti", 399.0),
        gpu("gpu-7700xt", "RX 7700 XT", 449.0),
    ];
    let optimizer = Optimizer::new(CatalogSnapshot::from_components(components));

    let build = optimizer.optimize(300.0, Region::Us).unwrap();
    assert!(build.is_complete);
    assert!(!build.is_reduced_confidence());
    assert_eq!(id_of(&build, Category::Gpu), Some("gpu-4060ti"));
    assert!(!build.is_within_budget());

    let gpu_note = build
        .notes
        .iter()
        .find(|n| n.kind == NoteKind::OverBudget && n.category == Some(Category::Gpu))
        .expect("over-budget GPU note");
    assert!(gpu_note.message.starts_with("Over budget"));
    assert!(build.notes.iter().any(|n| n.kind == NoteKind::Skipped));
}

fn socket_catalog(am5_board_price: f64) -> CatalogSnapshot {
    let mut components = supporting_parts();
    components.extend([
        cpu("cpu-7600", "AMD Ryzen 5 7600", "AM5", 65.0, 199.0),
        board("b760", "LGA1700", "DDR5", 100.0),
        board("b650", "AM5", "DDR5", am5_board_price),
        gpu("gpu-4060", "RTX 4060", 300.0),
    ]);
    CatalogSnapshot::from_components(components)
}

#[test]
fn socket_mismatch_swaps_board_within_band() {
    let build = Optimizer::new(socket_catalog(140.0))
        .optimize(1500.0, Region::Us)
        .unwrap();

    assert_eq!(id_of(&build, Category::Motherboard), Some("b650"));
    assert!(build.compatibility_issues.is_empty());
    let note = build
        .notes
        .iter()
        .find(|n| n.kind == NoteKind::Substituted)
        .expect("substitution note");
    assert_eq!(
        note.message,
        "Replaced motherboard b760 ($100.00) with b650 ($140.00) to fix: CPU socket does not \
         match motherboard; 1.40x the replaced part, above the preferred 1.2x band"
    );
}

#[test]
fn socket_mismatch_without_substitute_is_reported() {
    let build = Optimizer::new(socket_catalog(160.0))
        .optimize(1500.0, Region::Us)
        .unwrap();

    assert_eq!(id_of(&build, Category::Motherboard), Some("b760"));
    assert_eq!(
        build.compatibility_issues,
        vec!["CPU socket does not match motherboard"]
    );
    assert!(build.is_complete);
}

fn power_catalog(with_750: bool) -> CatalogSnapshot {
    let mut components = vec![
        cpu("cpu-13900k", "Intel Core i9-13900K", "LGA1700", 125.0, 549.0),
        board("z790", "LGA1700", "DDR5", 189.0),
        part("gpu-4080", "RTX 4080", Category::Gpu, 1099.0, ComponentSpecs {
            power_draw_w: Some(300.0),
            length_mm: Some(310.0),
            ..ComponentSpecs::default()
        }),
        psu("psu-450", 450.0, 60.0),
        psu("psu-650", 650.0, 75.0),
        psu("psu-1000", 1000.0, 150.0),
    ];
    if with_750 {
        components.push(psu("psu-750", 750.0, 85.0));
    }
    components.extend(
        supporting_parts()
            .into_iter()
            .filter(|c| c.category != Category::Psu),
    );
    CatalogSnapshot::from_components(components)
}

#[test]
fn insufficient_psu_is_replaced_with_headroom() {
    let build = Optimizer::new(power_catalog(true))
        .optimize(2200.0, Region::Us)
        .unwrap();

    // 100 + 125 + 300 + 10 + 5 = 540 W; 540 × 1.3 = 702 W.
    let wattage = build
        .configuration
        .get(Category::Psu)
        .and_then(|c| c.specs.wattage_w);
    assert_eq!(wattage, Some(750.0));
    assert!(wattage.is_some_and(|w| w >= 702.0));
    assert!(build.compatibility_issues.is_empty());
}

#[test]
fn insufficient_psu_without_substitute_is_reported() {
    let build = Optimizer::new(power_catalog(false))
        .optimize(2200.0, Region::Us)
        .unwrap();

    assert_eq!(id_of(&build, Category::Psu), Some("psu-450"));
    assert_eq!(
        build.compatibility_issues,
        vec!["PSU wattage is insufficient for estimated system draw"]
    );
}

#[test]
fn out_of_stock_parts_are_never_picked_in_budget() {
    let mut components = supporting_parts();
    components.extend([
        cpu("cpu-7600", "AMD Ryzen 5 7600", "AM5", 65.0, 199.0),
        board("b650", "AM5", "DDR5", 140.0),
        gpu("gpu-gone", "RTX 4070", 250.0).with_availability(Availability::OutOfStock),
        gpu("gpu-4060", "RTX 4060", 300.0),
    ]);
    let build = Optimizer::new(CatalogSnapshot::from_components(components))
        .optimize(2000.0, Region::Us)
        .unwrap();

    assert_eq!(id_of(&build, Category::Gpu), Some("gpu-4060"));
}

#[test]
fn over_budget_pick_stays_purchasable_and_monotone() {
    let mut components: Vec<Component> = Category::ALL
        .into_iter()
        .filter(|&c| c != Category::Gpu)
        .map(|c| {
            let name = format!("Basic {}", c.label());
            part(&format!("{c}-basic"), &name, c, 50.0, ComponentSpecs::default())
        })
        .collect();
    components.extend([
        gpu("g-4090", "RTX 4090", 150.0).with_availability(Availability::OutOfStock),
        gpu("g-basic", "Basic Card", 600.0),
    ]);
    let optimizer = Optimizer::new(CatalogSnapshot::from_components(components));

    let low = optimizer.optimize(500.0, Region::Us).unwrap();
    let high = optimizer.optimize(1000.0, Region::Us).unwrap();

    assert_eq!(id_of(&low, Category::Gpu), Some("g-basic"));
    assert_eq!(id_of(&high, Category::Gpu), Some("g-basic"));
    assert!(!low.is_within_budget());
    assert!(high.performance_score >= low.performance_score);
    assert!(
        low.configuration
            .filled()
            .all(|c| c.availability != Availability::OutOfStock)
    );
}
