//! HTTP middleware for request processing and protection.
//!
//! Provides CORS headers, panic conversion, rate limiting, and observability.

pub mod catch_panic;
pub mod cors;
pub mod rate_limit;
pub mod tracing;
