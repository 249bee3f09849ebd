//! Cross-origin headers for the charting frontend.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::state::AppState;

/// Attaches `Access-Control-Allow-Origin` and `Vary: Origin` to every response.
///
/// The origin is not negotiated per request: it is `*` in development and
/// the configured production origin otherwise, whatever `Origin` the client
/// sent. `Vary: Origin` keeps shared caches from mixing responses across
/// deployments that serve different origins.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/", get(report_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), cors::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    match HeaderValue::from_str(st.settings.allow_origin()) {
        Ok(origin) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        Err(e) => warn!("Allowed origin is not a valid header value: {}", e),
    }
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));

    response
}
