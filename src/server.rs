//! HTTP server initialization and runtime setup.
//!
//! Handles cache and upstream setup, scheduler spawning, and the Axum server
//! lifecycle.

use crate::application::scheduler::run_refresh_scheduler;
use crate::config::Config;
use crate::domain::report_source::ReportSource;
use crate::infrastructure::cache::{CacheService, MemoryCache, RedisCache};
use crate::infrastructure::upstream::HttpReportSource;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Opens the configured snapshot store.
///
/// Redis when configured, otherwise an in-process [`MemoryCache`].
///
/// # Errors
///
/// Returns an error if Redis is configured but unreachable.
pub async fn connect_cache(config: &Config) -> Result<Arc<dyn CacheService>> {
    match &config.redis_url {
        Some(redis_url) => {
            let redis = RedisCache::connect(redis_url, &config.cache_key_prefix)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Snapshot store: Redis");
            Ok(Arc::new(redis))
        }
        None => {
            tracing::warn!("REDIS_URL not set, snapshots are kept in memory only");
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}

/// Builds the upstream report client.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the HTTP client cannot be built.
pub fn build_report_source(config: &Config) -> Result<Arc<dyn ReportSource>> {
    let source = HttpReportSource::new(&config.upstream_base_url, config.upstream_timeout())
        .context("Failed to build upstream client")?;
    Ok(Arc::new(source))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Snapshot store (Redis or in-memory)
/// - Upstream report client
/// - Background refresh scheduler
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Redis is configured but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let cache = connect_cache(&config).await?;
    let source = build_report_source(&config)?;

    let state = AppState::new(cache, source, config.router_settings());

    let scheduler = tokio::spawn(run_refresh_scheduler(
        state.refresh_service.clone(),
        config.refresh_interval(),
        config.refresh_on_startup,
    ));

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.abort();
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
