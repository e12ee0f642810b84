//! Cache Module
//!
//! Provides an in-memory cache with per-entry TTL expiration and a background
//! sweep.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::Cache;

pub(crate) use store::Shared;
