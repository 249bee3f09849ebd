//! Refresh cycle: repopulates every partition snapshot from upstream.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::partition::Partition;
use crate::domain::report_source::{ReportSource, UpstreamError};
use crate::infrastructure::cache::{CacheError, CacheService};

/// Outcome of a refresh cycle that wrote every partition.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    /// Partitions written, in write order.
    pub written: Vec<Partition>,
    /// Total payload bytes written across all partitions.
    pub bytes_written: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Why a refresh cycle stopped at a given partition.
#[derive(Debug, thiserror::Error)]
pub enum RefreshFailure {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// A refresh cycle aborted part-way.
///
/// Partitions in `written` hold fresh values. The failing partition and every
/// partition after it kept whatever they held before the cycle started.
#[derive(Debug, thiserror::Error)]
#[error("refresh aborted at {partition} after {} partitions written: {cause}", written.len())]
pub struct RefreshError {
    pub partition: Partition,
    pub cause: RefreshFailure,
    pub written: Vec<Partition>,
}

/// Fetches each partition's report and stores it under the partition's cache key.
///
/// Steps run sequentially in a fixed order (nation, provinces in table order,
/// summary). The first failing step aborts the cycle; nothing is cleared.
pub struct RefreshService {
    source: Arc<dyn ReportSource>,
    cache: Arc<dyn CacheService>,
    partitions: Vec<Partition>,
}

impl RefreshService {
    /// Creates a refresh service covering every partition.
    pub fn new(source: Arc<dyn ReportSource>, cache: Arc<dyn CacheService>) -> Self {
        Self::with_partitions(source, cache, Partition::refresh_order())
    }

    /// Creates a refresh service covering `partitions`, refreshed in the given order.
    pub fn with_partitions(
        source: Arc<dyn ReportSource>,
        cache: Arc<dyn CacheService>,
        partitions: Vec<Partition>,
    ) -> Self {
        Self {
            source,
            cache,
            partitions,
        }
    }

    /// Partitions refreshed by each cycle, in order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Runs one refresh cycle.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError`] naming the first partition whose fetch or
    /// write failed. Earlier partitions in the cycle keep their new values.
    pub async fn run_cycle(&self) -> Result<RefreshReport, RefreshError> {
        let started_at = Utc::now();
        let timer = Instant::now();
        info!(partitions = self.partitions.len(), "Refresh cycle started");

        let mut written = Vec::with_capacity(self.partitions.len());
        let mut bytes_written = 0;

        for &partition in &self.partitions {
            match self.refresh_partition(partition).await {
                Ok(bytes) => {
                    bytes_written += bytes;
                    written.push(partition);
                }
                Err(cause) => {
                    debug!(
                        %partition,
                        written = written.len(),
                        "Refresh cycle aborted: {}",
                        cause
                    );
                    metrics::counter!("refresh_cycles_total", "outcome" => "failed").increment(1);
                    return Err(RefreshError {
                        partition,
                        cause,
                        written,
                    });
                }
            }
        }

        info!(
            partitions = written.len(),
            bytes = bytes_written,
            elapsed_ms = timer.elapsed().as_millis() as u64,
            "Refresh cycle finished"
        );
        metrics::counter!("refresh_cycles_total", "outcome" => "ok").increment(1);

        Ok(RefreshReport {
            written,
            bytes_written,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Fetches and stores a single partition, returning the bytes written.
    async fn refresh_partition(&self, partition: Partition) -> Result<usize, RefreshFailure> {
        let body = self.source.fetch(partition).await?;
        let key = partition.cache_key();
        self.cache.put(&key, &body).await?;

        debug!(%partition, key = %key, bytes = body.len(), "Partition refreshed");
        metrics::counter!("partition_writes_total").increment(1);
        Ok(body.len())
    }
}
