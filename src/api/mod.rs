//! REST API layer for HTTP request/response handling.
//!
//! Translates inbound read requests into snapshot lookups and formats the
//! responses the charting frontend consumes.
//!
//! # Modules
//!
//! - [`dto`] - Query parameter types
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - CORS, panic conversion, rate limiting and tracing
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
