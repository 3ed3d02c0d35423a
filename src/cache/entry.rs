//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;

use crate::models::Item;

// == Cache Entry ==
/// A cached listing together with the time it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Key the entry is stored under
    pub key: String,
    /// Items as returned by the store, in store order
    pub payload: Arc<Vec<Item>>,
    /// Fetch timestamp (Unix milliseconds)
    pub fetched_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(key: impl Into<String>, payload: Arc<Vec<Item>>, fetched_at: u64) -> Self {
        Self {
            key: key.into(),
            payload,
            fetched_at,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since the fetch. A fetch time in the future
    /// counts as age zero.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.fetched_at)
    }

    // == Is Valid ==
    /// Checks whether the entry may still be served.
    ///
    /// Boundary condition: an entry is valid only while its age is strictly
    /// less than the TTL. At exactly `fetched_at + ttl` it is stale.
    pub fn is_valid_at(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_ms(now_ms) < ttl_ms
    }
}
