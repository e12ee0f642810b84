//! Memoizes a slow lookup behind the TTL cache.
//!
//! Run with `cargo run --example memoize_lookup`. Set `RUST_LOG` to change the
//! log level and `CACHE_SWEEP_INTERVAL_MS` to change the sweep interval.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ttl_cache::{Cache, CacheConfig};

/// Stand-in for a remote call.
async fn lookup_user(id: u32) -> (String, Duration) {
    tokio::time::sleep(Duration::from_millis(200)).await;
    (format!("user-{id}"), Duration::from_secs(1))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=debug,memoize_lookup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    let cache: Cache<String> = Cache::with_config(config)?;
    info!(sweep_interval = ?cache.sweep_interval(), "Cache ready");

    for attempt in 1..=3 {
        let (user, cached) = cache.get_or_set_async("user:42", || lookup_user(42)).await;
        info!(attempt, user = %user, cached, "Lookup finished");
    }

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (user, cached) = cache.get_or_set_async("user:42", || lookup_user(42)).await;
    info!(user = %user, cached, "Lookup after expiry");

    for id in 0..100 {
        cache
            .set(format!("user:{id}"), format!("user-{id}"), Duration::from_millis(100))
            .await;
    }
    info!(entries = cache.len().await, "Filled cache with short-lived entries");

    tokio::time::sleep(cache.sweep_interval() * 2).await;
    info!(stats = ?cache.stats().await, "After sweeping");

    cache.stop();
    Ok(())
}
