//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Shared;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task sleeps for `interval`, runs one sweep pass, and sleeps again, so
/// the effective period is the interval plus the time spent sweeping. It holds
/// only a weak reference to the cache state and exits on its own once the
/// cache is gone.
///
/// # Returns
/// A JoinHandle for the spawned task, used by the cache to abort it on stop
/// or drop.
pub(crate) fn spawn_sweep_task<V>(
    runtime: &Handle,
    shared: Weak<Shared<V>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    runtime.spawn(async move {
        info!(interval = ?interval, "Starting TTL sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let Some(shared) = shared.upgrade() else {
                debug!("Cache dropped, TTL sweep task exiting");
                break;
            };
            let removed = shared.purge_expired().await;
            drop(shared);

            if removed > 0 {
                info!(removed, "TTL sweep: removed expired entries");
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
