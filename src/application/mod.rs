//! Application layer services implementing business logic.
//!
//! Services orchestrate the report source and the cache behind their traits
//! and provide a small API for HTTP handlers, the scheduler and the CLI.
//!
//! # Available Services
//!
//! - [`services::refresh_service::RefreshService`] - Refresh cycle over every partition
//! - [`services::snapshot_service::SnapshotService`] - Snapshot reads for the router

pub mod services;
pub mod scheduler;
