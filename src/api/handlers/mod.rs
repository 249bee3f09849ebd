//! HTTP request handlers for API endpoints.

pub mod report;

pub use report::report_handler;
