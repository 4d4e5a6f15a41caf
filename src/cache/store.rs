//! Cache Store Module
//!
//! In-memory cache engine: TTL expiry, LRU eviction and a registry of issued
//! keys per namespace so a whole namespace can be dropped at once.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Keys issued under each namespace
    namespaces: HashMap<String, HashSet<String>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Logical clock bumped on every read and write
    tick: u64,
    /// Bumped each time a namespace is invalidated
    generations: HashMap<String, u64>,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            namespaces: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
            tick: 0,
            generations: HashMap::new(),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, registering the key in `namespace`.
    ///
    /// Overwriting resets the TTL. At capacity, expired entries are purged
    /// first and then the least recently used entry is evicted.
    pub fn set(
        &mut self,
        namespace: &str,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "key must be 1..={} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge(value.len()));
        }

        if let Some(old) = self.entries.remove(key) {
            self.unregister(&old.namespace, key);
        } else if self.entries.len() >= self.max_entries {
            self.make_room()?;
        }

        self.tick += 1;
        self.entries.insert(
            key.to_string(),
            CacheEntry::new(value, namespace, ttl, self.tick),
        );
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string());

        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Conditional Set ==
    /// Like [`set`](Self::set), but only while `namespace` is still at
    /// `generation`. Returns false and stores nothing once the namespace has
    /// been invalidated since the caller read the generation.
    pub fn set_if_current(
        &mut self,
        namespace: &str,
        key: &str,
        value: String,
        ttl: Duration,
        generation: u64,
    ) -> Result<bool, CacheError> {
        if self.generation(namespace) != generation {
            return Ok(false);
        }
        self.set(namespace, key, value, ttl)?;
        Ok(true)
    }

    /// Current invalidation generation of `namespace`; starts at 0.
    pub fn generation(&self, namespace: &str) -> u64 {
        self.generations.get(namespace).copied().unwrap_or(0)
    }

    // == Get ==
    /// Returns the value if present and not expired. Expired entries are
    /// removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove(key);
            self.stats.record_miss();
            return None;
        }

        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        entry.last_access = tick;
        self.stats.record_hit();
        Some(entry.value.clone())
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.unregister(&entry.namespace, key);
                self.stats.set_total_entries(self.entries.len());
                true
            }
            None => false,
        }
    }

    // == Invalidate Namespace ==
    /// Drops every key registered under `namespace`. Returns how many entries
    /// were removed.
    pub fn invalidate_namespace(&mut self, namespace: &str) -> usize {
        *self.generations.entry(namespace.to_string()).or_default() += 1;

        let keys = self.namespaces.remove(namespace).unwrap_or_default();
        let removed = keys
            .iter()
            .filter(|key| self.entries.remove(key.as_str()).is_some())
            .count();

        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of live keys registered under `namespace`.
    pub fn namespace_len(&self, namespace: &str) -> usize {
        self.namespaces.get(namespace).map_or(0, HashSet::len)
    }

    fn make_room(&mut self) -> Result<(), CacheError> {
        if self.cleanup_expired() > 0 && self.entries.len() < self.max_entries {
            return Ok(());
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());

        match oldest {
            Some(key) => {
                self.remove(&key);
                self.stats.record_eviction();
                Ok(())
            }
            None => Err(CacheError::CacheFull(
                "cache has no capacity for entries".to_string(),
            )),
        }
    }

    fn unregister(&mut self, namespace: &str, key: &str) {
        if let Some(keys) = self.namespaces.get_mut(namespace) {
            keys.remove(key);
            if keys.is_empty() {
                self.namespaces.remove(namespace);
            }
        }
    }
}
