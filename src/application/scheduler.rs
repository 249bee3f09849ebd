//! Timer adapter driving the refresh cycle.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::application::services::RefreshService;

/// Runs a refresh cycle every `period`, forever.
///
/// This is the only place refresh failures are swallowed: each failure is
/// logged and the next tick acts as the retry. A cycle that overruns the
/// period delays the following tick instead of triggering a catch-up burst.
///
/// When `run_on_startup` is false the first cycle starts one full period
/// after the scheduler is spawned.
pub async fn run_refresh_scheduler(
    service: Arc<RefreshService>,
    period: Duration,
    run_on_startup: bool,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    if !run_on_startup {
        ticker.tick().await;
    }

    info!(period_secs = period.as_secs(), "Refresh scheduler started");

    loop {
        ticker.tick().await;

        match service.run_cycle().await {
            Ok(report) => info!(
                partitions = report.written.len(),
                bytes = report.bytes_written,
                "Scheduled refresh succeeded"
            ),
            Err(e) => error!(
                failed_partition = %e.partition,
                "Scheduled refresh failed, keeping previous snapshots: {}",
                e
            ),
        }
    }
}
