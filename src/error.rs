//! Router-facing error type.
//!
//! Every failure on the request path ends here and becomes an HTTP response;
//! nothing propagates to the hosting runtime.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::application::services::RefreshError;
use crate::infrastructure::cache::CacheError;

/// `Content-Type` of every error body.
pub const TEXT_PLAIN_UTF8: &str = "text/plain;charset=UTF-8";

#[derive(Debug)]
pub enum AppError {
    /// Expected condition (e.g. an unknown province code): 404 with an empty body.
    NotFound,
    /// Anything unexpected: 500 with the diagnostic text as body.
    Internal { message: String },
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::internal(e.to_string())
    }
}

impl From<RefreshError> for AppError {
    fn from(e: RefreshError) -> Self {
        AppError::internal(e.to_string())
    }
}

/// Builds the 500 plain-text response carrying `message`.
pub fn internal_error_response(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8))],
        message,
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND.into_response(),
            AppError::Internal { message } => {
                error!("Request failed: {}", message);
                internal_error_response(message)
            }
        }
    }
}
