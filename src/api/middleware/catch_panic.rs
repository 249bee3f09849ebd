//! Converts handler panics into plain-text 500 responses.

use axum::response::Response;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::error::internal_error_response;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Creates the outermost safety net for request handling.
///
/// A panic is logged once and answered with status 500 and the panic
/// message as a `text/plain` body, the same shape as [`crate::AppError`].
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unhandled panic during request handling".to_string()
    };

    error!("Uncaught panic: {}", message);
    internal_error_response(message)
}
