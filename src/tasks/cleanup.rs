//! Clean Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheEngine;

/// Spawns a background task that periodically cleans expired cache entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between runs.
/// A failed clean is logged and retried on the next tick.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it during
/// shutdown.
///
/// # Example
/// ```ignore
/// let engine = CacheEngine::session("api")?;
/// let clean_handle = spawn_clean_task(engine.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// clean_handle.abort();
/// ```
pub fn spawn_clean_task(cache: CacheEngine, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            namespace = cache.namespace(),
            "Starting cache clean task with interval of {:?}", interval
        );

        loop {
            tokio::time::sleep(interval).await;

            match cache.clean().await {
                Ok(0) => debug!("Cache clean: no expired entries found"),
                Ok(removed) => info!("Cache clean: removed {} expired entries", removed),
                Err(err) => warn!(error = %err, "Cache clean failed"),
            }
        }
    })
}
