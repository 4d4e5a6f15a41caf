//! Cache Module
//!
//! Read-through cache for listing searches: TTL expiry, LRU eviction and
//! whole-namespace invalidation through a registry of issued keys.

mod entry;
mod key;
mod layer;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use key::{list_cache_key, PROPERTY_LIST_NAMESPACE};
pub use layer::{CacheLayer, MemoryCache, NoopCache};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 4096;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 4 * 1024 * 1024; // 4 MB
