//! TTL Cache - a thread-safe in-process key/value cache
//!
//! Values expire a fixed time after they are stored. Reads never return an
//! expired value, and a background sweep task reclaims expired entries even
//! when nobody reads them.
//!
//! ```no_run
//! use std::time::Duration;
//! use ttl_cache::Cache;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache: Cache<String> = Cache::new();
//!
//!     cache.set("user:42", "Ada".to_string(), Duration::from_secs(30)).await;
//!     assert_eq!(cache.get("user:42").await.as_deref(), Some("Ada"));
//!
//!     let (value, cached) = cache
//!         .get_or_set("user:7", || ("Grace".to_string(), Duration::from_secs(30)))
//!         .await;
//!     assert_eq!(value, "Grace");
//!     assert!(!cached);
//!
//!     cache.stop();
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::{CacheConfig, DEFAULT_SWEEP_INTERVAL};
pub use error::{CacheError, Result};
