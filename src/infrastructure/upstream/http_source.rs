//! reqwest-backed upstream report client.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::domain::partition::Partition;
use crate::domain::report_source::{ReportSource, UpstreamError};

/// Default user agent sent with every upstream request.
const DEFAULT_USER_AGENT: &str = concat!("covid-report-worker/", env!("CARGO_PKG_VERSION"));

/// Fetches report bodies with `GET {base_url}{partition path}`.
///
/// Bodies are returned as text without any parsing. Any non-2xx status is
/// an error, so a failing upstream never overwrites a good snapshot.
#[derive(Debug, Clone)]
pub struct HttpReportSource {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpReportSource {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidUrl`] if `base_url` does not parse, and
    /// [`UpstreamError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// Full URL for a partition's report.
    ///
    /// A path component on the base URL is kept (`https://host/v1` +
    /// `/reports` gives `https://host/v1/reports`).
    pub fn report_url(&self, partition: Partition) -> Result<Url, UpstreamError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = format!("{}{}", base, partition.upstream_path());
        Url::parse(&joined).map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", joined, e)))
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err.to_string())
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch(&self, partition: Partition) -> Result<String, UpstreamError> {
        let url = self.report_url(partition)?;
        debug!(%partition, %url, "Fetching upstream report");

        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(%partition, bytes = body.len(), "Fetched upstream report");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::partition::Province;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(base: &str) -> HttpReportSource {
        HttpReportSource::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_report_url_joins_paths() {
        let src = source("https://api.covid19tracker.ca");
        assert_eq!(
            src.report_url(Partition::Nation).unwrap().as_str(),
            "https://api.covid19tracker.ca/reports"
        );
        assert_eq!(
            src.report_url(Partition::Province(Province::Bc))
                .unwrap()
                .as_str(),
            "https://api.covid19tracker.ca/reports/province/bc"
        );
    }

    #[test]
    fn test_report_url_keeps_base_path() {
        let src = source("http://localhost:8787/v1/");
        assert_eq!(
            src.report_url(Partition::Summary).unwrap().as_str(),
            "http://localhost:8787/v1/summary"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpReportSource::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(UpstreamError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_returns_body_verbatim() {
        let server = MockServer::start().await;
        let body = "{\"data\":[{\"date\":\"2021-01-01\",\"change_cases\":5}]}";

        Mock::given(method("GET"))
            .and(path("/reports/province/on"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let src = source(&server.uri());
        let fetched = src
            .fetch(Partition::Province(Province::On))
            .await
            .unwrap();

        assert_eq!(fetched, body);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/summary"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let src = source(&server.uri());
        let err = src.fetch(Partition::Summary).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        // Nothing listens on port 9 in the test environment.
        let src = source("http://127.0.0.1:9");
        let err = src.fetch(Partition::Nation).await.unwrap_err();

        assert!(matches!(
            err,
            UpstreamError::Network(_) | UpstreamError::Timeout(_)
        ));
    }
}
