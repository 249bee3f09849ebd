//! Durable key-value store for partition snapshots.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed store
//! - [`MemoryCache`] - In-process map for development and testing

mod memory_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
