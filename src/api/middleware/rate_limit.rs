//! Rate limiting middleware using token bucket algorithm.

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Client IP key, read from the socket or from proxy headers.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    behind_proxy: bool,
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.behind_proxy {
            SmartIpKeyExtractor.extract(req)
        } else {
            PeerIpKeyExtractor.extract(req)
        }
    }
}

/// Creates a rate limiter for the report endpoints.
///
/// # Limits
///
/// - **Rate**: 5 requests per second
/// - **Burst**: 200 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// - `behind_proxy = false` - peer socket address (requires `ConnectInfo`)
/// - `behind_proxy = true` - `X-Forwarded-For` / `X-Real-IP`, falling back to the peer
pub fn layer(
    behind_proxy: bool,
) -> GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor { behind_proxy })
            .per_second(5)
            .burst_size(200)
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
