//! Cache capability injected into services.
//!
//! [`MemoryCache`] is the in-process backend; [`NoopCache`] stands in when
//! caching is disabled, so callers never branch on reachability themselves.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::CacheError;

/// Advisory cache. Callers treat every error as "no cache".
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Whether a real backend sits behind this layer.
    fn available(&self) -> bool;

    /// Returns the cached payload for `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key` for `ttl`, registering the key in `namespace`.
    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Invalidation generation of `namespace`. Read it before loading the
    /// data to cache and hand it to [`set_if_current`](Self::set_if_current).
    async fn generation(&self, namespace: &str) -> Result<u64, CacheError>;

    /// Stores `value` only if `namespace` has not been invalidated since
    /// `generation` was read. Returns whether the value was stored.
    async fn set_if_current(
        &self,
        namespace: &str,
        key: &str,
        value: String,
        ttl: Duration,
        generation: u64,
    ) -> Result<bool, CacheError>;

    /// Drops every key registered in `namespace`; returns how many were removed.
    async fn invalidate(&self, namespace: &str) -> Result<usize, CacheError>;

    /// Current counters.
    async fn stats(&self) -> CacheStats;

    /// Drops expired entries; returns how many were removed.
    async fn purge_expired(&self) -> usize {
        0
    }
}

// == Memory Cache ==
/// [`CacheStore`] behind a tokio lock, shared between handlers and the
/// cleanup task.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_max_entries)
    }

    /// Number of live keys in `namespace`.
    pub async fn namespace_len(&self, namespace: &str) -> usize {
        self.store.read().await.namespace_len(namespace)
    }
}

#[async_trait]
impl CacheLayer for MemoryCache {
    fn available(&self) -> bool {
        true
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Write lock: a read updates recency and counters
        Ok(self.store.write().await.get(key))
    }

    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.store.write().await.set(namespace, key, value, ttl)
    }

    async fn generation(&self, namespace: &str) -> Result<u64, CacheError> {
        Ok(self.store.read().await.generation(namespace))
    }

    async fn set_if_current(
        &self,
        namespace: &str,
        key: &str,
        value: String,
        ttl: Duration,
        generation: u64,
    ) -> Result<bool, CacheError> {
        self.store
            .write()
            .await
            .set_if_current(namespace, key, value, ttl, generation)
    }

    async fn invalidate(&self, namespace: &str) -> Result<usize, CacheError> {
        Ok(self.store.write().await.invalidate_namespace(namespace))
    }

    async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    async fn purge_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }
}

// == Noop Cache ==
/// Always misses; writes and invalidations succeed without effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl CacheLayer for NoopCache {
    fn available(&self) -> bool {
        false
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _namespace: &str,
        _key: &str,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn generation(&self, _namespace: &str) -> Result<u64, CacheError> {
        Ok(0)
    }

    async fn set_if_current(
        &self,
        _namespace: &str,
        _key: &str,
        _value: String,
        _ttl: Duration,
        _generation: u64,
    ) -> Result<bool, CacheError> {
        Ok(false)
    }

    async fn invalidate(&self, _namespace: &str) -> Result<usize, CacheError> {
        Ok(0)
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_memory_cache_roundtrip_and_invalidate() {
        let cache = MemoryCache::new(10);
        assert!(cache.available());

        cache.set("ns", "k", "v".to_string(), HOUR).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(cache.namespace_len("ns").await, 1);

        assert_eq!(cache.invalidate("ns").await.unwrap(), 1);
        assert_eq!(cache.get("k").await.unwrap(), None);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.invalidations, 1);
    }

    #[tokio::test]
    async fn test_memory_cache_drops_result_read_before_invalidation() {
        let cache = MemoryCache::new(10);
        let before = cache.generation("ns").await.unwrap();

        cache.invalidate("ns").await.unwrap();

        let stored = cache
            .set_if_current("ns", "k", "old".to_string(), HOUR, before)
            .await
            .unwrap();
        assert!(!stored);
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.generation("ns").await.unwrap(), before + 1);
    }

    #[tokio::test]
    async fn test_memory_cache_clones_share_state() {
        let cache = MemoryCache::new(10);
        let other = cache.clone();

        cache.set("ns", "k", "v".to_string(), HOUR).await.unwrap();
        assert!(other.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoopCache;
        assert!(!cache.available());

        cache.set("ns", "k", "v".to_string(), HOUR).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(!cache
            .set_if_current("ns", "k", "v".to_string(), HOUR, 0)
            .await
            .unwrap());
        assert_eq!(cache.invalidate("ns").await.unwrap(), 0);
        assert_eq!(cache.stats().await, CacheStats::default());
        assert_eq!(cache.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_memory_cache_purge_expired() {
        let cache = MemoryCache::new(10);
        cache
            .set("ns", "short", "v".to_string(), Duration::from_millis(20))
            .await
            .unwrap();
        cache.set("ns", "long", "v".to_string(), HOUR).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.namespace_len("ns").await, 1);
    }
}
