//! Edge Cache
//!
//! Short-lived cache of complete responses keyed by request URL.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::CacheStore;

// == Cached Response ==
/// A fully assembled response with its body buffered.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    /// Lifetime granted by the response's own `Cache-Control` header.
    ///
    /// `None` means the response must not be stored.
    pub fn max_age(&self) -> Option<u64> {
        let value = self.headers.get(header::CACHE_CONTROL)?.to_str().ok()?;
        cache_control_max_age(value)
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Extracts a positive `max-age` from a `Cache-Control` value.
///
/// `no-store` and `private` directives disable shared caching.
pub fn cache_control_max_age(value: &str) -> Option<u64> {
    let mut max_age = None;

    for directive in value.split(',').map(str::trim) {
        let lower = directive.to_ascii_lowercase();
        if lower == "no-store" || lower == "private" {
            return None;
        }
        if let Some(seconds) = lower.strip_prefix("max-age=") {
            max_age = seconds.trim_matches('"').parse::<u64>().ok();
        }
    }

    max_age.filter(|seconds| *seconds > 0)
}

// == Edge Cache Trait ==
/// URL-keyed response cache consulted before any resolution work.
#[async_trait]
pub trait EdgeCache: Send + Sync {
    /// Returns the stored response for `url`, if still fresh.
    async fn lookup(&self, url: &str) -> Option<CachedResponse>;

    /// Stores `response` under `url` for its `Cache-Control` lifetime.
    async fn put(&self, url: &str, response: CachedResponse);
}

/// In-process [`EdgeCache`] backed by a [`CacheStore`].
#[derive(Clone)]
pub struct MemoryEdgeCache {
    store: Arc<RwLock<CacheStore<CachedResponse>>>,
}

impl MemoryEdgeCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    /// Shared handle to the underlying store, used by the expiry sweep.
    pub fn store(&self) -> Arc<RwLock<CacheStore<CachedResponse>>> {
        self.store.clone()
    }
}

#[async_trait]
impl EdgeCache for MemoryEdgeCache {
    async fn lookup(&self, url: &str) -> Option<CachedResponse> {
        self.store.write().await.get(url)
    }

    async fn put(&self, url: &str, response: CachedResponse) {
        let Some(ttl) = response.max_age() else {
            debug!(url, "Response not cacheable, skipping edge cache");
            return;
        };

        if let Err(e) = self.store.write().await.set(url.to_string(), response, ttl) {
            warn!(url, error = %e, "Failed to store response in edge cache");
        }
    }
}
