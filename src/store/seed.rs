//! Seed data for the in-memory store.
//!
//! A seed file maps collection names to documents keyed by id:
//!
//! ```json
//! { "dev_fruits": { "1": { "name": "Mango", "imgs": "mango.png", "average": 4.2 } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::Fields;

/// Documents to load into a [`MemoryStore`](super::MemoryStore) at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Seed(BTreeMap<String, BTreeMap<String, Fields>>);

impl Seed {
    /// Reads and parses a JSON seed file.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing seed file {}", path.display()))
    }

    /// Parses seed data from a JSON string.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Adds one document. Non-object values are skipped.
    pub fn document(mut self, collection: &str, id: &str, value: Value) -> Self {
        match value {
            Value::Object(fields) => {
                self.0
                    .entry(collection.to_string())
                    .or_default()
                    .insert(id.to_string(), fields);
            }
            other => warn!(collection, id, %other, "seed document is not an object, skipping"),
        }
        self
    }

    /// Total number of documents across all collections.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(super) fn into_collections(self) -> BTreeMap<String, BTreeMap<String, Fields>> {
        self.0
    }
}
