//! Read-Through Cache Module
//!
//! TTL-keyed memory table in front of catalog reads. Callers consult `get`,
//! fetch from the store on a miss, and hand the result to `set`.
//!
//! Stale entries are not swept; they stay in the table until the next `set`
//! for the same key overwrites them.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, Lookup, SystemClock, CACHE_TTL_MS};
use crate::models::Item;

#[derive(Debug, Default)]
struct CacheTable {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

// == Read-Through Cache ==
/// Shared, TTL-checked cache of catalog listings.
#[derive(Debug)]
pub struct ReadThroughCache {
    table: RwLock<CacheTable>,
    clock: Arc<dyn Clock>,
    ttl_ms: u64,
}

impl Default for ReadThroughCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadThroughCache {
    // == Constructor ==
    /// Creates an empty cache driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(CacheTable::default()),
            clock,
            ttl_ms: CACHE_TTL_MS,
        }
    }

    /// How long an entry may be served after it was fetched.
    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    // == Is Valid ==
    /// Returns true if `entry` may still be served at the current time.
    pub fn is_valid(&self, entry: &CacheEntry) -> bool {
        entry.is_valid_at(self.clock.now_ms(), self.ttl_ms)
    }

    // == Get ==
    /// Returns the cached payload for `key` if present and still valid.
    ///
    /// Stale entries are reported as misses but left in place.
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<Item>>> {
        let now = self.clock.now_ms();
        // Write lock: the read updates the lookup counters
        let mut table = self.table.write().await;

        let (lookup, payload) = match table.entries.get(key) {
            None => (Lookup::Cold, None),
            Some(entry) if entry.is_valid_at(now, self.ttl_ms) => {
                (Lookup::Hit, Some(Arc::clone(&entry.payload)))
            }
            Some(entry) => {
                debug!(key, age_ms = now.saturating_sub(entry.fetched_at), "cache entry expired");
                (Lookup::Stale, None)
            }
        };
        table.stats.record(lookup);

        match &payload {
            Some(payload) => debug!(key, items = payload.len(), "cache hit"),
            None => debug!(key, ?lookup, "cache miss"),
        }
        payload
    }

    // == Set ==
    /// Stores `payload` under `key`, replacing whatever was there, and
    /// returns the shared payload now held by the cache.
    pub async fn set(&self, key: impl Into<String>, payload: Vec<Item>) -> Arc<Vec<Item>> {
        let key = key.into();
        let payload = Arc::new(payload);
        let entry = CacheEntry::new(key.clone(), Arc::clone(&payload), self.clock.now_ms());

        let mut table = self.table.write().await;
        table.entries.insert(key, entry);
        table.stats.record_fill();

        payload
    }

    #[cfg(test)]
    async fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.table.read().await.entries.get(key).cloned()
    }

    // == Stats ==
    /// Returns a snapshot of the lookup counters and the table size.
    pub async fn stats(&self) -> CacheStats {
        let table = self.table.read().await;
        CacheStats {
            total_entries: table.entries.len(),
            ..table.stats.clone()
        }
    }

    // == Length ==
    /// Returns the number of entries held, valid or stale.
    pub async fn len(&self) -> usize {
        self.table.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
