//! Durable Cache
//!
//! Key/value store with per-entry expiration, shared by every request.
//! Keys are namespaced by the kind of data they hold (`username:`, `profile:`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::CacheStore;
use crate::error::Result;

/// String key/value store whose writes carry their own lifetime.
#[async_trait]
pub trait DurableCache: Send + Sync {
    /// Returns the live value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_seconds`; last write wins.
    async fn put(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;
}

/// In-process [`DurableCache`] backed by a [`CacheStore`].
#[derive(Clone)]
pub struct MemoryDurableCache {
    store: Arc<RwLock<CacheStore<String>>>,
}

impl MemoryDurableCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    /// Shared handle to the underlying store, used by the expiry sweep.
    pub fn store(&self) -> Arc<RwLock<CacheStore<String>>> {
        self.store.clone()
    }
}

#[async_trait]
impl DurableCache for MemoryDurableCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: reads touch the LRU order and drop expired entries.
        let value = self.store.write().await.get(key);
        debug!(key, hit = value.is_some(), "Durable cache lookup");
        Ok(value)
    }

    async fn put(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        self.store
            .write()
            .await
            .set(key.to_string(), value, ttl_seconds)
    }
}
