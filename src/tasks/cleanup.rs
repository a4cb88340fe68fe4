//! Expiry Sweep Task
//!
//! Reads already drop expired entries; the sweep reclaims entries nobody asks
//! for again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a task that removes expired entries from `store` every
/// `interval_secs` seconds.
///
/// The returned handle is aborted on shutdown.
pub fn spawn_cleanup_task<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    label: &'static str,
    interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(store = label, "Starting expiry sweep every {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut guard = store.write().await;
                let removed = guard.cleanup_expired();
                (removed, guard.len())
            };

            if removed > 0 {
                info!(store = label, removed, remaining, "Expired entries swept");
            } else {
                debug!(store = label, remaining, "No expired entries");
            }
        }
    })
}
