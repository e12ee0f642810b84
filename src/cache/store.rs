//! Cache Store Module
//!
//! Main cache engine: a lock-guarded HashMap with lazy expiration on read and a
//! background sweep that reclaims expired entries.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

// == Shared State ==
/// State shared between the cache handle and its sweep task.
#[derive(Debug)]
pub(crate) struct Shared<V> {
    pub(crate) entries: RwLock<HashMap<String, CacheEntry<V>>>,
    pub(crate) stats: StatsCounters,
}

impl<V> Shared<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: StatsCounters::default(),
        }
    }

    // == Purge Expired ==
    /// Removes every expired entry and returns how many were removed.
    ///
    /// Keys are snapshotted under the shared lock, then each key is checked
    /// and removed under its own short exclusive lock. Expiration is checked
    /// again at removal time so an entry refreshed after the snapshot survives.
    pub(crate) async fn purge_expired(&self) -> usize {
        let keys: Vec<String> = {
            let entries = self.entries.read().await;
            entries.keys().cloned().collect()
        };

        let mut removed = 0;
        for key in keys {
            let mut entries = self.entries.write().await;
            if entries.get(&key).is_some_and(|entry| entry.is_expired()) {
                entries.remove(&key);
                removed += 1;
            }
        }

        self.stats.record_sweep(removed);
        removed
    }
}

// == Cache ==
/// Thread-safe key/value cache with per-entry TTL.
///
/// Expired entries are never returned: reads check expiration themselves, and a
/// background task started with the cache removes expired entries every
/// sweep interval. The task stops on [`stop`](Self::stop) or when the cache is
/// dropped.
///
/// Share a cache between tasks by wrapping it in an `Arc`.
pub struct Cache<V> {
    shared: Arc<Shared<V>>,
    sweeper: JoinHandle<()>,
    stopped: AtomicBool,
    sweep_interval: Duration,
}

#[allow(clippy::new_without_default)]
impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates an empty cache sweeping every
    /// [`DEFAULT_SWEEP_INTERVAL`](crate::config::DEFAULT_SWEEP_INTERVAL).
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime. Use
    /// [`with_config`](Self::with_config) to get an error instead.
    pub fn new() -> Self {
        Self::start(CacheConfig::default(), &Handle::current())
    }

    /// Creates an empty cache from a configuration.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|e| CacheError::NoRuntime(e.to_string()))?;
        Ok(Self::start(config, &runtime))
    }

    /// Creates an empty cache sweeping every `interval`.
    pub fn with_sweep_interval(interval: Duration) -> Result<Self> {
        Self::with_config(CacheConfig::default().with_sweep_interval(interval))
    }

    fn start(config: CacheConfig, runtime: &Handle) -> Self {
        let shared = Arc::new(Shared::new());
        let sweeper = spawn_sweep_task(runtime, Arc::downgrade(&shared), config.sweep_interval);
        debug!(sweep_interval = ?config.sweep_interval, "Cache created");

        Self {
            shared,
            sweeper,
            stopped: AtomicBool::new(false),
            sweep_interval: config.sweep_interval,
        }
    }

    // == Set ==
    /// Stores a value that expires `ttl` from now.
    ///
    /// Overwrites any existing entry for the key, resetting its TTL. A zero
    /// TTL stores an entry that is already expired.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry::new(value, ttl);
        self.shared.entries.write().await.insert(key.into(), entry);
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Returns None if the key is absent or expired. An expired entry found
    /// here is removed. Reading never extends an entry's TTL.
    pub async fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.shared.entries.read().await;
            match entries.get(key) {
                None => {
                    self.shared.stats.record_miss();
                    return None;
                }
                Some(entry) if !entry.is_expired() => {
                    self.shared.stats.record_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Expired: escalate to the exclusive lock. The key may have been
        // refreshed or removed while no lock was held.
        let mut entries = self.shared.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired()) {
            entries.remove(key);
            self.shared.stats.record_expiration();
            trace!(key, "Removed expired entry on read");
        }
        self.shared.stats.record_miss();
        None
    }

    // == Get Or Set ==
    /// Returns the cached value, or computes, stores and returns a new one.
    ///
    /// The boolean is true when the value came from the cache. `compute` runs
    /// with no lock held, so concurrent misses on the same key may each
    /// compute; the last store wins.
    pub async fn get_or_set<F>(&self, key: &str, compute: F) -> (V, bool)
    where
        F: FnOnce() -> (V, Duration),
    {
        if let Some(value) = self.get(key).await {
            return (value, true);
        }
        let (value, ttl) = compute();
        self.set(key, value.clone(), ttl).await;
        (value, false)
    }

    /// Like [`get_or_set`](Self::get_or_set) for an asynchronous computation.
    pub async fn get_or_set_async<F, Fut>(&self, key: &str, compute: F) -> (V, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = (V, Duration)>,
    {
        if let Some(value) = self.get(key).await {
            return (value, true);
        }
        let (value, ttl) = compute().await;
        self.set(key, value.clone(), ttl).await;
        (value, false)
    }

    // == Delete ==
    /// Removes the entry for `key`, expired or not, returning its value.
    pub async fn delete(&self, key: &str) -> Option<V> {
        self.shared
            .entries
            .write()
            .await
            .remove(key)
            .map(|entry| entry.value)
    }

    /// Returns true if `key` holds an unexpired entry.
    pub async fn contains_key(&self, key: &str) -> bool {
        let entries = self.shared.entries.read().await;
        entries.get(key).is_some_and(|entry| !entry.is_expired())
    }

    /// Returns the remaining lifetime of a live entry.
    ///
    /// Entries whose TTL was too large to represent report `Duration::MAX`.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.shared.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining().unwrap_or(Duration::MAX))
    }

    // == Maintenance ==
    /// Runs one sweep pass now and returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        self.shared.purge_expired().await
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        self.shared.entries.write().await.clear();
    }

    // == Length ==
    /// Returns the number of stored entries, including expired entries not
    /// yet reclaimed.
    pub async fn len(&self) -> usize {
        self.shared.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.shared.entries.read().await.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.len().await;
        self.shared.stats.snapshot(total_entries)
    }
}

impl<V> Cache<V> {
    // == Sweep Lifecycle ==
    /// Stops the background sweep task.
    ///
    /// Does not wait for or block cache operations. A sweep pass in progress
    /// is abandoned at its next lock acquisition. Returns true for the call
    /// that stopped the task; later calls are no-ops returning false.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.sweeper.abort();
        info!("Sweep task stopped");
        true
    }

    /// Returns true until the sweep task is stopped.
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire) && !self.sweeper.is_finished()
    }

    /// Returns the configured sweep interval.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("sweep_interval", &self.sweep_interval)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
