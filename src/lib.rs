//! # COVID Report Worker
//!
//! Ingests the COVID-19 Tracker Canada reporting API on a timer, stores each
//! report verbatim in a key-value store, and serves the stored snapshots over
//! HTTP to a charting frontend.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Partition table, cache key scheme, upstream trait
//! - **Application Layer** ([`application`]) - Refresh cycle, snapshot reads, scheduler
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis / in-memory store, upstream HTTP client
//! - **API Layer** ([`api`]) - Report handler, query DTO, middleware
//!
//! ## Two Paths, One Cache
//!
//! - **Refresher** - every tick fetches the national report, each province
//!   and the summary, writing each to its own key. The first failure aborts
//!   the cycle; keys not yet reached keep their previous value.
//! - **Router** - resolves a key from `?province=` and the path, and returns
//!   the stored text as JSON with CORS headers.
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"  # Optional in development
//! export ENVIRONMENT=development
//!
//! cargo run
//! curl 'http://localhost:3000/?refresh'
//! curl 'http://localhost:3000/?province=bc'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{RefreshReport, RefreshService, SnapshotService};
    pub use crate::config::{Environment, RouterSettings};
    pub use crate::domain::{Partition, Province, Snapshot};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{CacheService, MemoryCache};
    pub use crate::state::AppState;
}
