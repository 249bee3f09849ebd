//! Business logic services for the application layer.

pub mod refresh_service;
pub mod snapshot_service;

pub use refresh_service::{RefreshError, RefreshFailure, RefreshReport, RefreshService};
pub use snapshot_service::SnapshotService;
