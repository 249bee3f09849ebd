//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /`                 - National snapshot
//! - `GET /?province={code}` - Province snapshot
//! - `GET /summary`          - Summary snapshot
//!
//! # Middleware
//!
//! - **Panic catching** - Panics become `500 text/plain`
//! - **CORS** - `Access-Control-Allow-Origin` + `Vary: Origin` on every response
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{catch_panic, cors, rate_limit, tracing};
use crate::state::AppState;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Report routes with the layers that shape every response.
///
/// Used directly by tests; [`app_router`] adds the network-facing layers.
pub fn report_router(state: AppState) -> Router {
    api::routes::report_routes()
        .with_state(state.clone())
        .layer(catch_panic::layer())
        .layer(middleware::from_fn_with_state(state, cors::layer))
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = report_router(state)
        .layer(rate_limit::layer(behind_proxy))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
