//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Durable string-to-text map holding partition snapshots.
///
/// A `put` replaces the whole value for its key atomically; there are no
/// transactions across keys. Unlike a read-through cache, errors are
/// reported to the caller: the refresh cycle must abort on a failed write.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed store
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process map for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` when the key is populated
    /// - `Ok(None)` when it has never been written
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend cannot be reached.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the write was not acknowledged.
    async fn put(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
