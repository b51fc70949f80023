//! Periodic Sweep Task
//!
//! Background task that sweeps expired entries on a fixed interval.
//!
//! The store already sweeps at the end of every `set`. This task closes the
//! gap where no writes arrive: without it an expired file stays on disk, and
//! keeps being served by `get`, until the next `set` on any key.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::DiskCacheStore;

/// Spawns a background task that periodically sweeps the store.
///
/// Each pass runs on the blocking pool since it holds the store lock while
/// deleting files. Sweep errors are logged and the loop carries on.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(DiskCacheStore::new("/var/cache/app")?);
/// let sweep_handle = spawn_sweep_task(store.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(store: Arc<DiskCacheStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting periodic sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.sweep()).await {
                Ok(Ok(removed)) if removed > 0 => {
                    info!("Periodic sweep: removed {} expired entries", removed);
                }
                Ok(Ok(_)) => debug!("Periodic sweep: no expired entries found"),
                Ok(Err(err)) => warn!("Periodic sweep failed: {}", err),
                Err(err) => warn!("Periodic sweep task panicked: {}", err),
            }
        }
    })
}
