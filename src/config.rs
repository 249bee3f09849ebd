//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and then passed down
//! as plain values. Nothing reads the environment after startup.
//!
//! ## Key-value store
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! # or
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! Without either, snapshots are kept in process memory (development only).
//!
//! ## Optional Variables
//!
//! - `ENVIRONMENT` - `development` or `production` (default: `production`)
//! - `ALLOWED_ORIGIN` - CORS origin served in production (default: `https://covid-r9aa.pages.dev`)
//! - `UPSTREAM_BASE_URL` - Reporting API base (default: `https://api.covid19tracker.ca`)
//! - `UPSTREAM_TIMEOUT_SECONDS` - Per-request timeout (default: 30)
//! - `REFRESH_INTERVAL_SECONDS` - Scheduler period (default: 3600, min: 60)
//! - `REFRESH_ON_STARTUP` - Refresh as soon as the scheduler starts (default: `true`)
//! - `CACHE_KEY_PREFIX` - Namespace for Redis keys (default: empty)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - Read client IPs from forwarded headers (default: `false`)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://covid-r9aa.pages.dev";
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.covid19tracker.ca";

/// Deployment mode, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => anyhow::bail!(
                "ENVIRONMENT must be 'development' or 'production', got '{}'",
                other
            ),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Settings the request router needs, derived from [`Config`].
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub environment: Environment,
    /// Origin allowed in production mode.
    pub production_origin: String,
}

impl RouterSettings {
    pub fn new(environment: Environment, production_origin: impl Into<String>) -> Self {
        Self {
            environment,
            production_origin: production_origin.into(),
        }
    }

    /// Value of `Access-Control-Allow-Origin`: `*` in development, the fixed origin otherwise.
    pub fn allow_origin(&self) -> &str {
        if self.environment.is_development() {
            "*"
        } else {
            &self.production_origin
        }
    }

    /// Whether `?refresh` triggers an on-demand refresh cycle.
    pub fn manual_refresh_enabled(&self) -> bool {
        self.environment.is_development()
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub allowed_origin: String,
    pub upstream_base_url: String,
    pub upstream_timeout_seconds: u64,
    pub refresh_interval_seconds: u64,
    pub refresh_on_startup: bool,
    pub redis_url: Option<String>,
    pub cache_key_prefix: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENVIRONMENT` holds an unknown mode.
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("ENVIRONMENT") {
            Ok(v) => v.parse::<Environment>().context("Failed to load ENVIRONMENT")?,
            Err(_) => Environment::default(),
        };

        let allowed_origin =
            env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string());
        let upstream_base_url = env::var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string());

        let upstream_timeout_seconds = env::var("UPSTREAM_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let refresh_interval_seconds = env::var("REFRESH_INTERVAL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let refresh_on_startup = env::var("REFRESH_ON_STARTUP")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(true);

        let redis_url = Self::load_redis_url();
        let cache_key_prefix = env::var("CACHE_KEY_PREFIX").unwrap_or_default();

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            environment,
            allowed_origin,
            upstream_base_url,
            upstream_timeout_seconds,
            refresh_interval_seconds,
            refresh_on_startup,
            redis_url,
            cache_key_prefix,
            listen_addr,
            log_level,
            log_format,
            behind_proxy,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `upstream_base_url` or `allowed_origin` is not an http(s) URL
    /// - `refresh_interval_seconds` is below 60
    /// - `upstream_timeout_seconds` is 0
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `redis_url` has the wrong scheme
    pub fn validate(&self) -> Result<()> {
        let upstream = Url::parse(&self.upstream_base_url).with_context(|| {
            format!(
                "UPSTREAM_BASE_URL is not a valid URL: '{}'",
                self.upstream_base_url
            )
        })?;
        if upstream.scheme() != "http" && upstream.scheme() != "https" {
            anyhow::bail!(
                "UPSTREAM_BASE_URL must use http or https, got '{}'",
                self.upstream_base_url
            );
        }

        if !self.allowed_origin.starts_with("https://")
            && !self.allowed_origin.starts_with("http://")
        {
            anyhow::bail!(
                "ALLOWED_ORIGIN must be an http(s) origin, got '{}'",
                self.allowed_origin
            );
        }

        if self.refresh_interval_seconds < 60 {
            anyhow::bail!(
                "REFRESH_INTERVAL_SECONDS must be at least 60, got {}",
                self.refresh_interval_seconds
            );
        }

        if self.upstream_timeout_seconds == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECONDS must be greater than 0");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                redis_url
            );
        }

        Ok(())
    }

    /// Settings handed to the request router.
    pub fn router_settings(&self) -> RouterSettings {
        // Origins never carry a trailing slash.
        RouterSettings::new(
            self.environment,
            self.allowed_origin.trim_end_matches('/'),
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Environment: {}", self.environment);
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Allowed origin: {}", self.router_settings().allow_origin());
        tracing::info!("  Upstream: {}", self.upstream_base_url);
        tracing::info!(
            "  Refresh interval: {}s (on startup: {})",
            self.refresh_interval_seconds,
            self.refresh_on_startup
        );

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Redis: {}", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Redis: not configured (in-memory store)");
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable holds an unusable value or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn valid_config() -> Config {
        Config {
            environment: Environment::Production,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout_seconds: 30,
            refresh_interval_seconds: 3600,
            refresh_on_startup: true,
            redis_url: None,
            cache_key_prefix: String::new(),
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
        }
    }

    #[test]
    fn test_mask_connection_string() {
        assert_eq!(
            mask_connection_string("redis://:password@localhost:6379/0"),
            "redis://:***@localhost:6379/0"
        );
        assert_eq!(
            mask_connection_string("redis://localhost:6379/0"),
            "redis://localhost:6379/0"
        );
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            "PRODUCTION".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_router_settings_origin() {
        let mut config = valid_config();
        config.allowed_origin = "https://charts.example.org/".to_string();

        let settings = config.router_settings();
        assert_eq!(settings.allow_origin(), "https://charts.example.org");
        assert!(!settings.manual_refresh_enabled());

        config.environment = Environment::Development;
        let settings = config.router_settings();
        assert_eq!(settings.allow_origin(), "*");
        assert!(settings.manual_refresh_enabled());
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.refresh_interval_seconds = 10;
        assert!(config.validate().is_err());
        config.refresh_interval_seconds = 3600;

        config.upstream_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.upstream_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
        config.upstream_base_url = DEFAULT_UPSTREAM_BASE_URL.to_string();

        config.allowed_origin = "covid.example.org".to_string();
        assert!(config.validate().is_err());
        config.allowed_origin = DEFAULT_ALLOWED_ORIGIN.to_string();

        config.upstream_timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.upstream_timeout_seconds = 30;

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.redis_url = Some("http://localhost:6379".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_load_redis_url_from_components() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("REDIS_HOST", "redis-host");
            env::set_var("REDIS_PORT", "6380");
            env::set_var("REDIS_DB", "1");
        }

        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::set_var("REDIS_PASSWORD", "secret");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://:secret@redis-host:6380/1");

        unsafe {
            env::set_var("REDIS_PASSWORD", "");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::remove_var("REDIS_HOST");
            env::remove_var("REDIS_PORT");
            env::remove_var("REDIS_DB");
            env::remove_var("REDIS_PASSWORD");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_and_overrides() {
        // SAFETY: Tests are run serially
        unsafe {
            env::remove_var("ENVIRONMENT");
            env::remove_var("REFRESH_INTERVAL_SECONDS");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.refresh_interval(), Duration::from_secs(3600));

        unsafe {
            env::set_var("ENVIRONMENT", "development");
            env::set_var("REFRESH_INTERVAL_SECONDS", "900");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.refresh_interval_seconds, 900);

        unsafe {
            env::set_var("ENVIRONMENT", "qa");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("ENVIRONMENT");
            env::remove_var("REFRESH_INTERVAL_SECONDS");
        }
    }
}
