//! Cache Statistics Module
//!
//! Counts how catalog lookups resolved. A miss is either cold (the key was
//! never filled) or stale (an entry exists but outlived the TTL and the
//! caller must refetch it).

use serde::Serialize;

/// How a single `get` resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A valid entry was served
    Hit,
    /// No entry under the key
    Cold,
    /// An entry exists but has expired
    Stale,
}

// == Cache Stats ==
/// Lookup counters plus the table size at snapshot time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub cold_misses: u64,
    pub stale_misses: u64,
    /// Number of `set` calls, refreshes included
    pub fills: u64,
    /// Entries held when the snapshot was taken, valid or stale
    pub total_entries: usize,
}

impl CacheStats {
    pub fn record(&mut self, lookup: Lookup) {
        match lookup {
            Lookup::Hit => self.hits += 1,
            Lookup::Cold => self.cold_misses += 1,
            Lookup::Stale => self.stale_misses += 1,
        }
    }

    pub fn record_fill(&mut self) {
        self.fills += 1;
    }

    /// Lookups that fell through to the store.
    pub fn misses(&self) -> u64 {
        self.cold_misses + self.stale_misses
    }

    /// hits / (hits + misses), or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
