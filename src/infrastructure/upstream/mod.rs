//! Client for the upstream reporting API.

mod http_source;

pub use http_source::HttpReportSource;
