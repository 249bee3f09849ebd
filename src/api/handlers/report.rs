//! Handler serving cached report snapshots.

use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::api::dto::ReportQuery;
use crate::domain::partition::{Partition, Province};
use crate::error::{AppError, TEXT_PLAIN_UTF8};
use crate::state::AppState;

/// Serves the snapshot selected by the query string and path.
///
/// # Endpoint
///
/// `GET /`, `GET /{*path}`
///
/// # Resolution
///
/// 1. `province` present but unknown → 404, empty body, no cache access
/// 2. `province` present and known → `{code}_report`
/// 3. path mentions `summary` → `summary`
/// 4. otherwise → `canada_report`
///
/// A repeated parameter resolves to its first value.
///
/// The cached text is returned byte-for-byte as `application/json`. A
/// never-populated key yields 200 with an empty body.
///
/// # Development Mode
///
/// With `?refresh`, a full refresh cycle runs before responding and the
/// response is a plain-text acknowledgement. Ignored in production.
///
/// # Errors
///
/// Returns 500 (`text/plain`) if the cache read or manual refresh fails.
pub async fn report_handler(
    State(state): State<AppState>,
    uri: Uri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let query = ReportQuery::from_pairs(pairs);
    let partition = resolve_partition(query.province.as_deref(), uri.path())?;

    if query.refresh_requested() && state.settings.manual_refresh_enabled() {
        info!("Manual refresh requested");
        let report = state.refresh_service.run_cycle().await?;

        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8))],
            format!("refreshed {} partitions", report.written.len()),
        )
            .into_response());
    }

    let body = state
        .snapshot_service
        .get(partition)
        .await?
        .map(|s| s.into_inner())
        .unwrap_or_default();

    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response())
}

/// Maps the request's `province` parameter and path to a partition.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] for a province code outside the fixed set.
pub fn resolve_partition(province: Option<&str>, path: &str) -> Result<Partition, AppError> {
    if let Some(code) = province {
        return match Province::from_code(code) {
            Some(p) => Ok(Partition::Province(p)),
            None => {
                debug!(code, "Unknown province requested");
                Err(AppError::NotFound)
            }
        };
    }

    if path.contains("summary") {
        Ok(Partition::Summary)
    } else {
        Ok(Partition::Nation)
    }
}
