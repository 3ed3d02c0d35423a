//! Document Store Module
//!
//! The interface the gateway uses to reach its document database, plus an
//! in-process implementation used for local runs and tests.
//!
//! Documents are addressed by `(collection, id)` and carry a JSON object of
//! fields. Queries are conjunctions of equality predicates.

mod memory;
mod seed;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::{MemoryStore, StoreCalls};
pub use seed::Seed;

/// Field map of a stored document.
pub type Fields = Map<String, Value>;

// == Store Error ==
/// Failures reported by a document store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A document exists but its fields do not fit the expected shape
    #[error("Malformed document {collection}/{id}: {reason}")]
    Decode {
        collection: String,
        id: String,
        reason: String,
    },

    /// An update targeted a document that does not exist
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },
}

/// Convenience Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Document ==
/// A single stored document: its key plus its field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Collection the document was read from
    pub collection: String,
    /// Document key, unique within its collection
    pub id: String,
    /// Stored fields
    pub fields: Fields,
}

impl Document {
    pub fn new(collection: impl Into<String>, id: impl Into<String>, fields: Fields) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            fields,
        }
    }

    /// Deserializes the field map into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|err| self.decode_error(err.to_string()))
    }

    /// Builds a decode error pointing at this document.
    pub fn decode_error(&self, reason: impl Into<String>) -> StoreError {
        StoreError::Decode {
            collection: self.collection.clone(),
            id: self.id.clone(),
            reason: reason.into(),
        }
    }
}

// == Predicate ==
/// Equality constraint on a single document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub value: Value,
}

impl Predicate {
    /// `field == value`
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true if the document carries `field` with exactly `value`.
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

// == Document Store ==
/// Operations the gateway needs from its document database.
///
/// Implementations must be safe to share across request tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document by key. `Ok(None)` when absent.
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Reads every document of a collection in store order.
    async fn get_all_documents(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Reads the documents matching all `predicates`, in store order.
    /// An empty predicate list matches every document.
    async fn query(&self, collection: &str, predicates: &[Predicate])
        -> StoreResult<Vec<Document>>;

    /// Inserts a new document under a store-generated key and returns the key.
    async fn insert_document(&self, collection: &str, fields: Fields) -> StoreResult<String>;

    /// Merges `fields` into an existing document.
    async fn update_document(&self, collection: &str, id: &str, fields: Fields)
        -> StoreResult<()>;

    /// Creates or replaces the document stored under `id`.
    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Removes a document. Returns false if nothing was stored under `id`.
    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<bool>;
}
