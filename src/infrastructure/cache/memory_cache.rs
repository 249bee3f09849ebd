//! In-process cache implementation for development and tests.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// A cache backed by a `HashMap` living in process memory.
///
/// Used when Redis is not configured. Contents are lost on restart, so the
/// first refresh cycle after startup repopulates everything.
///
/// # Use Cases
///
/// - Local development without Redis
/// - Handler and service tests
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    /// Creates an empty MemoryCache.
    pub fn new() -> Self {
        debug!("Using MemoryCache (snapshots are not persisted)");
        Self::default()
    }

    /// Creates a MemoryCache pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }

    /// Number of populated keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let map = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> CacheResult<()> {
        let mut map = self.entries.write().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
