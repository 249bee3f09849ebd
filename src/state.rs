//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{RefreshService, SnapshotService};
use crate::config::RouterSettings;
use crate::domain::report_source::ReportSource;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub snapshot_service: Arc<SnapshotService>,
    /// Used by the development-only `?refresh` escape hatch.
    pub refresh_service: Arc<RefreshService>,
    pub settings: Arc<RouterSettings>,
}

impl AppState {
    /// Wires the services around one cache and one report source.
    pub fn new(
        cache: Arc<dyn CacheService>,
        source: Arc<dyn ReportSource>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            snapshot_service: Arc::new(SnapshotService::new(cache.clone())),
            refresh_service: Arc::new(RefreshService::new(source, cache)),
            settings: Arc::new(settings),
        }
    }
}
