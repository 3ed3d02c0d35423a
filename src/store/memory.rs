//! In-memory Document Store
//!
//! Collection-organized storage held in process memory. Documents keep their
//! insertion order, which is the order reads return them in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{Document, DocumentStore, Fields, Predicate, Seed, StoreError, StoreResult};

// == Store Calls ==
/// Number of calls served per store operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCalls {
    pub get: u64,
    pub get_all: u64,
    pub query: u64,
    pub insert: u64,
    pub update: u64,
    pub set: u64,
    pub delete: u64,
}

impl StoreCalls {
    /// Calls that read documents.
    pub fn reads(&self) -> u64 {
        self.get + self.get_all + self.query
    }

    /// Calls that wrote or removed documents.
    pub fn writes(&self) -> u64 {
        self.insert + self.update + self.set + self.delete
    }
}

#[derive(Debug, Default)]
struct CallCounters {
    get: AtomicU64,
    get_all: AtomicU64,
    query: AtomicU64,
    insert: AtomicU64,
    update: AtomicU64,
    set: AtomicU64,
    delete: AtomicU64,
}

impl CallCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> StoreCalls {
        StoreCalls {
            get: self.get.load(Ordering::Relaxed),
            get_all: self.get_all.load(Ordering::Relaxed),
            query: self.query.load(Ordering::Relaxed),
            insert: self.insert.load(Ordering::Relaxed),
            update: self.update.load(Ordering::Relaxed),
            set: self.set.load(Ordering::Relaxed),
            delete: self.delete.load(Ordering::Relaxed),
        }
    }
}

// == Memory Store ==
/// Document store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Documents per collection, in insertion order
    collections: RwLock<HashMap<String, Vec<Document>>>,
    calls: CallCounters,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated from seed data.
    pub fn with_seed(seed: Seed) -> Self {
        let mut collections: HashMap<String, Vec<Document>> = HashMap::new();
        for (collection, documents) in seed.into_collections() {
            let docs = documents
                .into_iter()
                .map(|(id, fields)| Document::new(collection.clone(), id, fields))
                .collect();
            collections.insert(collection, docs);
        }

        Self {
            collections: RwLock::new(collections),
            calls: CallCounters::default(),
        }
    }

    /// Returns how many calls each operation has served so far.
    pub fn calls(&self) -> StoreCalls {
        self.calls.snapshot()
    }

    /// Number of documents currently stored in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        CallCounters::bump(&self.calls.get);
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn get_all_documents(&self, collection: &str) -> StoreResult<Vec<Document>> {
        CallCounters::bump(&self.calls.get_all);
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn query(
        &self,
        collection: &str,
        predicates: &[Predicate],
    ) -> StoreResult<Vec<Document>> {
        CallCounters::bump(&self.calls.query);
        let collections = self.collections.read().await;
        let matched: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| predicates.iter().all(|p| p.matches(&doc.fields)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            collection,
            predicates = predicates.len(),
            matched = matched.len(),
            "query served"
        );
        Ok(matched)
    }

    async fn insert_document(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        CallCounters::bump(&self.calls.insert);
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(collection, id.clone(), fields));
        Ok(id)
    }

    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        CallCounters::bump(&self.calls.update);
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        doc.fields.extend(fields);
        Ok(())
    }

    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        CallCounters::bump(&self.calls.set);
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => doc.fields = fields,
            None => docs.push(Document::new(collection, id, fields)),
        }
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<bool> {
        CallCounters::bump(&self.calls.delete);
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok(docs.len() < before)
    }
}
