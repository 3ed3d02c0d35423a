//! Cache Module
//!
//! In-memory read-through caching of catalog listings with lazy TTL expiry.

mod clock;
mod entry;
pub mod keys;
mod read_through;
mod stats;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use read_through::ReadThroughCache;
pub use stats::{CacheStats, Lookup};

// == Public Constants ==
/// How long a cached listing may be served after it was fetched (1 minute)
pub const CACHE_TTL_MS: u64 = 60_000;
