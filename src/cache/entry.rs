//! Cache Entry Module
//!
//! A cached payload together with its namespace, expiry and recency stamp.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: String,
    /// Logical namespace the key was registered under
    pub namespace: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Logical clock value of the last read or write, used for LRU eviction
    pub last_access: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires after `ttl`.
    pub fn new(value: String, namespace: &str, ttl: Duration, tick: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            namespace: namespace.to_string(),
            created_at: now,
            expires_at: now.saturating_add(ttl.as_millis() as u64),
            last_access: tick,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
