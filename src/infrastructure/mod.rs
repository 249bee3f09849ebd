//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for snapshot storage and upstream access.
//!
//! # Modules
//!
//! - [`cache`] - Key-value store abstractions (Redis and in-memory implementations)
//! - [`upstream`] - HTTP client for the reporting API

pub mod cache;
pub mod upstream;
