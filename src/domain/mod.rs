//! Domain layer: partitions, snapshots and the upstream seam.
//!
//! This module has no dependencies on infrastructure or presentation layers.
//!
//! # Architecture
//!
//! - [`partition`] - The fixed partition table and the cache key scheme
//! - [`snapshot`] - Opaque cached report payloads
//! - [`report_source`] - Trait for fetching raw reports from upstream
//!
//! # Data Flow
//!
//! 1. The scheduler ticks and calls [`crate::application::services::RefreshService`]
//! 2. Each [`partition::Partition`] is fetched through a [`report_source::ReportSource`]
//! 3. The body is stored verbatim under [`partition::Partition::cache_key`]
//! 4. The router reads it back as a [`snapshot::Snapshot`]

pub mod partition;
pub mod report_source;
pub mod snapshot;

pub use partition::{Partition, Province};
pub use snapshot::Snapshot;
