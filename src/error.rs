//! Error types for the cache
//!
//! Cache operations themselves never fail; only construction does.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while building a [`Cache`](crate::cache::Cache).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Configuration values that cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No Tokio runtime is available to host the sweep task
    #[error("No runtime: {0}")]
    NoRuntime(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
