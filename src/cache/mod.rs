//! Cache Module
//!
//! The two cache tiers in front of the upstream identity services: a durable
//! key/value store for lookups and an edge cache for whole responses.

mod durable;
mod edge;
mod entry;
mod lru;
mod store;


// Re-export public types
pub use durable::{DurableCache, MemoryDurableCache};
pub use edge::{cache_control_max_age, CachedResponse, EdgeCache, MemoryEdgeCache};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes (edge keys are full URLs)
pub const MAX_KEY_LENGTH: usize = 2048;

/// Key prefix for username -> UUID entries
pub const USERNAME_NAMESPACE: &str = "username:";

/// Key prefix for UUID -> profile entries
pub const PROFILE_NAMESPACE: &str = "profile:";
