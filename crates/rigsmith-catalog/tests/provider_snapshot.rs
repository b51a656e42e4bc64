//! End-to-end catalog flow: JSONL dump on disk, provider, frozen snapshot.

use async_trait::async_trait;
use rigsmith_catalog::{
    CatalogError, CatalogProvider, CatalogSnapshot, Category, Component, Region,
    StaticCatalogProvider, assemble_snapshot, assemble_snapshot_with_timeout, read_catalog_dir,
    read_components_from_path, write_catalog_dir, write_components_to_path,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!(
        "rigsmith-catalog-{label}-{}-{nanos}",
        std::process::id()
    ))
}

fn dump() -> Vec<Component> {
    vec![
        Component::new("cpu-7600", "AMD Ryzen 5 7600", Category::Cpu)
            .with_brand("AMD")
            .with_price(Region::Us, 199.0)
            .with_price(Region::De, 189.0),
        Component::new("gpu-4060", "RTX 4060", Category::Gpu).with_price(Region::Us, 299.0),
        Component::new("case-a", "Mid Tower", Category::Case)
            .with_price(Region::De, 79.0)
            .with_description("steel, tempered glass"),
    ]
}

#[tokio::test]
async fn dump_on_disk_becomes_a_regional_snapshot() {
    let dir = temp_dir("dump");
    let path = dir.join("catalog.jsonl");
    write_components_to_path(&path, &dump()).unwrap();

    let loaded = read_components_from_path(&path).unwrap();
    assert_eq!(loaded, dump());

    let provider: Arc<dyn CatalogProvider> = Arc::new(StaticCatalogProvider::new(loaded));
    let de = assemble_snapshot(Arc::clone(&provider), Region::De, None).await;
    assert_eq!(de.len(), 2);
    assert!(de.candidates(Category::Gpu).is_empty());
    assert!(de.component(Category::Case, "case-a").is_some());

    let us = assemble_snapshot(provider, Region::Us, None).await;
    assert_eq!(us.len(), 2);
    assert_ne!(us.digest(), de.digest());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn per_category_dumps_feed_the_same_snapshot() {
    let dir = temp_dir("filed");
    write_catalog_dir(&dir, &dump()).unwrap();

    let filed: Arc<dyn CatalogProvider> =
        Arc::new(StaticCatalogProvider::new(read_catalog_dir(&dir).unwrap()));
    let mixed: Arc<dyn CatalogProvider> = Arc::new(StaticCatalogProvider::new(dump()));

    let from_dir = assemble_snapshot(filed, Region::Us, None).await;
    let from_dump = assemble_snapshot(mixed, Region::Us, None).await;
    assert_eq!(from_dir.len(), 2);
    assert_eq!(from_dir.digest(), from_dump.digest());

    let _ = std::fs::remove_dir_all(dir);
}

struct Outage;

#[async_trait]
impl CatalogProvider for Outage {
    fn name(&self) -> &str {
        "outage"
    }

    async fn list_candidates(
        &self,
        category: Category,
        _region: Region,
    ) -> Result<Vec<Component>, CatalogError> {
        Err(CatalogError::Provider {
            category,
            message: "upstream unavailable".to_string(),
        })
    }
}

#[tokio::test]
async fn total_outage_serves_the_cached_snapshot() {
    let cached = CatalogSnapshot::from_components(dump());
    let snapshot = assemble_snapshot_with_timeout(
        Arc::new(Outage),
        Region::Us,
        Some(&cached),
        Duration::from_millis(50),
    )
    .await;

    assert_eq!(snapshot.digest(), cached.digest());
}

#[tokio::test]
async fn total_outage_without_cache_is_empty_not_an_error() {
    let snapshot = assemble_snapshot(Arc::new(Outage), Region::Us, None).await;
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.empty_categories(), Category::ALL.to_vec());
}
