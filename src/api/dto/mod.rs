//! Data Transfer Objects for API requests.

pub mod report_query;

pub use report_query::ReportQuery;
