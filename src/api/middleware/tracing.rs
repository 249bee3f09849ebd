//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// Spans carry method, URI (including the `province` / `refresh` query) and
/// HTTP version. Responses are logged at `INFO` with status and latency;
/// 5xx responses are additionally logged at `ERROR`.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET uri=/?province=bc version=HTTP/1.1}: finished processing request latency=2 ms status=200
/// INFO request{method=GET uri=/summary version=HTTP/1.1}: finished processing request latency=1 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}
