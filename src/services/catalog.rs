//! Catalog Service
//!
//! Serves fruit and variant listings through the read-through cache.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{keys, ReadThroughCache};
use crate::models::{CatalogKind, Item};
use crate::store::{DocumentStore, StoreResult};

/// Cached read access to one catalog collection.
#[derive(Clone)]
pub struct CatalogService {
    kind: CatalogKind,
    collection: String,
    store: Arc<dyn DocumentStore>,
    cache: Arc<ReadThroughCache>,
}

impl CatalogService {
    pub fn new(
        kind: CatalogKind,
        collection: impl Into<String>,
        store: Arc<dyn DocumentStore>,
        cache: Arc<ReadThroughCache>,
    ) -> Self {
        Self {
            kind,
            collection: collection.into(),
            store,
            cache,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    // == Get All ==
    /// Returns every item of the catalog, from the cache while it is valid.
    pub async fn get_all(&self) -> StoreResult<Arc<Vec<Item>>> {
        let key = keys::all_items(self.kind);
        if let Some(items) = self.cache.get(&key).await {
            return Ok(items);
        }

        debug!(collection = %self.collection, "fetching {} from store", self.kind.plural());
        let items = self
            .store
            .get_all_documents(&self.collection)
            .await?
            .iter()
            .map(Item::from_document)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(self.cache.set(key, items).await)
    }

    // == Search ==
    /// Looks up a single item by its document key.
    ///
    /// Returns an empty list when the item does not exist; absence is not
    /// cached, so every such lookup reaches the store.
    pub async fn search(&self, id: &str) -> StoreResult<Arc<Vec<Item>>> {
        let key = keys::single_item(self.kind, id);
        if let Some(items) = self.cache.get(&key).await {
            return Ok(items);
        }

        debug!(collection = %self.collection, id, "fetching {} from store", self.kind);
        let Some(doc) = self.store.get_document(&self.collection, id).await? else {
            return Ok(Arc::new(Vec::new()));
        };

        let item = Item::from_document(&doc)?;
        Ok(self.cache.set(key, vec![item]).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::store::{MemoryStore, Seed};
    use serde_json::json;

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        fruits: CatalogService,
        variants: CatalogService,
    }

    fn fixture() -> Fixture {
        let seed = Seed::default()
            .document("dev_fruits", "1", json!({"name": "Mango", "imgs": "m.png", "average": 4.5}))
            .document("dev_fruits", "2", json!({"name": "Durian", "imgs": "d.png", "average": 3.0}))
            .document("dev_variants", "1", json!({"name": "Cat Chu", "imgs": "c.png", "average": 4.0}));
        let store = Arc::new(MemoryStore::with_seed(seed));
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = Arc::new(ReadThroughCache::with_clock(clock.clone()));

        Fixture {
            fruits: CatalogService::new(CatalogKind::Fruit, "dev_fruits", store.clone(), cache.clone()),
            variants: CatalogService::new(CatalogKind::Variant, "dev_variants", store.clone(), cache),
            store,
            clock,
        }
    }

    #[tokio::test]
    async fn test_get_all_fetches_once_within_ttl() {
        let f = fixture();

        let first = f.fruits.get_all().await.unwrap();
        let second = f.fruits.get_all().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name, "Mango");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(f.store.calls().get_all, 1);
    }

    #[tokio::test]
    async fn test_get_all_refetches_after_ttl() {
        let f = fixture();

        f.fruits.get_all().await.unwrap();
        f.clock.advance(59_999);
        f.fruits.get_all().await.unwrap();
        assert_eq!(f.store.calls().get_all, 1);

        f.clock.advance(2);
        f.fruits.get_all().await.unwrap();
        assert_eq!(f.store.calls().get_all, 2);
    }

    #[tokio::test]
    async fn test_search_hit_is_cached() {
        let f = fixture();

        let found = f.fruits.search("2").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
        assert_eq!(found[0].name, "Durian");

        f.fruits.search("2").await.unwrap();
        assert_eq!(f.store.calls().get, 1);
    }

    #[tokio::test]
    async fn test_search_absence_is_not_cached() {
        let f = fixture();

        assert!(f.fruits.search("missing-id").await.unwrap().is_empty());
        assert!(f.fruits.search("missing-id").await.unwrap().is_empty());
        assert_eq!(f.store.calls().get, 2);
    }

    #[tokio::test]
    async fn test_kinds_use_separate_keys() {
        let f = fixture();

        let fruit = f.fruits.search("1").await.unwrap();
        let variant = f.variants.search("1").await.unwrap();

        assert_eq!(fruit[0].name, "Mango");
        assert_eq!(variant[0].name, "Cat Chu");
        assert_eq!(f.store.calls().get, 2);
    }

    #[tokio::test]
    async fn test_listing_and_lookup_are_cached_independently() {
        let f = fixture();

        f.fruits.get_all().await.unwrap();
        f.fruits.search("1").await.unwrap();

        let calls = f.store.calls();
        assert_eq!(calls.get_all, 1);
        assert_eq!(calls.get, 1);
    }

    #[tokio::test]
    async fn test_malformed_key_is_reported() {
        let seed = Seed::default().document("dev_fruits", "mango", json!({"name": "Mango"}));
        let store = Arc::new(MemoryStore::with_seed(seed));
        let fruits = CatalogService::new(
            CatalogKind::Fruit,
            "dev_fruits",
            store,
            Arc::new(ReadThroughCache::new()),
        );

        assert!(fruits.get_all().await.is_err());
    }
}
