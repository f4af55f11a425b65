//! In-memory result cache.
//!
//! A fixed-capacity, thread-safe LRU map used by the client to avoid
//! repeating identical lookups.

mod lru;
mod stats;

pub use lru::LruCache;
pub use stats::CacheStats;
