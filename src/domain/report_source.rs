//! Upstream report source abstraction.

use async_trait::async_trait;

use crate::domain::partition::Partition;

/// Errors raised while fetching a report from upstream.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Base URL plus partition path did not form a valid URL.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Request did not complete within the client timeout.
    #[error("upstream request timed out: {0}")]
    Timeout(String),

    /// Connection, TLS or body read failure.
    #[error("upstream network error: {0}")]
    Network(String),
}

/// Source of raw report payloads, one per partition.
///
/// The returned text is never parsed; it is cached verbatim.
///
/// # Implementations
///
/// - [`crate::infrastructure::upstream::HttpReportSource`] - reqwest client against the upstream API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetches the current report body for `partition`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on network failure or a non-success response.
    async fn fetch(&self, partition: Partition) -> Result<String, UpstreamError>;
}
