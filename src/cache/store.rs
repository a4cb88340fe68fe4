//! Cache Store Module
//!
//! Bounded key/value storage combining per-entry TTL expiration with LRU eviction.

use std::collections::HashMap;

use crate::cache::{CacheEntry, LruTracker, MAX_KEY_LENGTH};
use crate::error::{ProxyError, Result};

// == Cache Store ==
/// Capacity-bounded store where every entry carries its own TTL.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl<V: Clone> CacheStore<V> {
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Set ==
    /// Stores a value for `ttl_seconds`.
    ///
    /// Overwriting a key resets its TTL. When the store is full the least
    /// recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: V, ttl_seconds: u64) -> Result<()> {
        if key.is_empty() {
            return Err(ProxyError::Cache("Key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(ProxyError::Cache(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                }
                None => {
                    return Err(ProxyError::Cache(
                        "Store is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, ttl_seconds));
        self.lru.touch(&key);

        Ok(())
    }

    // == Get ==
    /// Returns a clone of the value if present and not expired.
    ///
    /// Expired entries are dropped on the way out.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;

        if entry.is_expired() {
            self.entries.remove(key);
            self.lru.remove(key);
            return None;
        }

        let value = entry.value.clone();
        self.lru.touch(key);
        Some(value)
    }

    /// Returns the remaining lifetime of a live entry in seconds.
    pub fn ttl_remaining(&self, key: &str) -> Option<u64> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    // == Delete ==
    /// Removes an entry, returning whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
