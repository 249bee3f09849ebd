//! Report route configuration.

use crate::api::handlers::report_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// Public report routes. No authentication.
///
/// # Endpoints
///
/// - `GET /`                   - National snapshot
/// - `GET /?province={code}`   - Province snapshot (404 for unknown codes)
/// - `GET /summary`            - Summary snapshot (any path containing `summary`)
/// - `GET /?refresh`           - On-demand refresh cycle (development only)
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(report_handler))
        .route("/{*path}", get(report_handler))
}
