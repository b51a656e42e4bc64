//! Catalog provider seam and concurrent snapshot assembly.
//!
//! Providers are the only place upstream I/O happens. Assembly fans out one
//! fetch per category, waits for all of them, and only then freezes the
//! result into a `CatalogSnapshot`. A category whose fetch fails or times
//! out is served from the cached snapshot instead (or left empty), so the
//! allocator never observes a half-updated catalog.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::category::{Category, Region};
use crate::component::Component;
use crate::error::CatalogError;
use crate::snapshot::CatalogSnapshot;

/// Per-category fetch deadline used by `assemble_snapshot`.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream source of candidate parts.
///
/// Implementations must return a consistent answer for the duration of one
/// assembly; the snapshot built from it is what allocation reads.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Name of this provider (for diagnostics).
    fn name(&self) -> &str;

    /// Candidates for `category` that are sold in `region`.
    async fn list_candidates(
        &self,
        category: Category,
        region: Region,
    ) -> Result<Vec<Component>, CatalogError>;
}

/// Provider over a fixed, in-memory component list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogProvider {
    snapshot: CatalogSnapshot,
}

impl StaticCatalogProvider {
    pub fn new(components: impl IntoIterator<Item = Component>) -> Self {
        Self {
            snapshot: CatalogSnapshot::from_components(components),
        }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalogProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn list_candidates(
        &self,
        category: Category,
        region: Region,
    ) -> Result<Vec<Component>, CatalogError> {
        Ok(self
            .snapshot
            .candidates(category)
            .iter()
            .filter(|component| component.price(region).is_some())
            .cloned()
            .collect())
    }
}

/// Fetch every category concurrently and freeze the result.
pub async fn assemble_snapshot(
    provider: Arc<dyn CatalogProvider>,
    region: Region,
    cached: Option<&CatalogSnapshot>,
) -> CatalogSnapshot {
    assemble_snapshot_with_timeout(provider, region, cached, DEFAULT_FETCH_TIMEOUT).await
}

/// `assemble_snapshot` with an explicit per-category deadline.
pub async fn assemble_snapshot_with_timeout(
    provider: Arc<dyn CatalogProvider>,
    region: Region,
    cached: Option<&CatalogSnapshot>,
    fetch_timeout: Duration,
) -> CatalogSnapshot {
    let mut tasks = JoinSet::new();
    for category in Category::ALL {
        let provider = Arc::clone(&provider);
        tasks.spawn(async move {
            let fetched =
                tokio::time::timeout(fetch_timeout, provider.list_candidates(category, region))
                    .await;
            (category, fetched)
        });
    }

    let mut lists: BTreeMap<Category, Vec<Component>> = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((category, Ok(Ok(list)))) => {
                debug!(%category, count = list.len(), "fetched candidates");
                lists.insert(category, list);
            }
            Ok((category, Ok(Err(error)))) => {
                warn!(%category, %error, provider = provider.name(), "fetch failed");
            }
            Ok((category, Err(_elapsed))) => {
                warn!(%category, provider = provider.name(), "fetch timed out");
            }
            Err(error) => {
                warn!(%error, provider = provider.name(), "fetch task aborted");
            }
        }
    }

    for category in Category::ALL {
        if lists.contains_key(&category) {
            continue;
        }
        let fallback: Vec<Component> = cached
            .map(|snapshot| snapshot.candidates(category).to_vec())
            .unwrap_or_default();
        info!(
            %category,
            cached = fallback.len(),
            "serving category from cached snapshot"
        );
        lists.insert(category, fallback);
    }

    CatalogSnapshot::from_categories(lists)
}
