//! Read path for cached partition snapshots.

use std::sync::Arc;
use tracing::debug;

use crate::domain::partition::Partition;
use crate::domain::snapshot::Snapshot;
use crate::infrastructure::cache::{CacheResult, CacheService};

/// Service for reading the current snapshot of a partition.
///
/// Read-only: the refresh cycle is the sole writer of every key.
pub struct SnapshotService {
    cache: Arc<dyn CacheService>,
}

impl SnapshotService {
    /// Creates a new snapshot service.
    pub fn new(cache: Arc<dyn CacheService>) -> Self {
        Self { cache }
    }

    /// Returns the cached snapshot for `partition`, or `None` if it was never populated.
    ///
    /// # Errors
    ///
    /// Returns [`crate::infrastructure::cache::CacheError`] if the cache backend fails.
    pub async fn get(&self, partition: Partition) -> CacheResult<Option<Snapshot>> {
        let key = partition.cache_key();
        let value = self.cache.get(&key).await?;

        let result = if value.is_some() { "hit" } else { "miss" };
        debug!(%partition, key = %key, result, "Snapshot read");
        metrics::counter!("snapshot_reads_total", "result" => result).increment(1);

        Ok(value.map(Snapshot::from))
    }

    /// Checks if the cache backend is reachable.
    pub async fn health_check(&self) -> bool {
        self.cache.health_check().await
    }
}
