//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info};

/// Redis store for partition snapshots.
///
/// Uses `ConnectionManager` for automatic reconnection. Keys are written
/// without expiry: a snapshot lives until the next successful refresh
/// overwrites it.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `key_prefix` - Namespace prepended to every key (may be empty)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&full_key).await {
            Ok(Some(value)) => {
                debug!("Cache HIT: {} ({} bytes)", key, value.len());
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", key, e);
                Err(CacheError::OperationError(format!("GET {}: {}", key, e)))
            }
        }
    }

    async fn put(&self, key: &str, value: &str) -> CacheResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&full_key, value).await.map_err(|e| {
            error!("Redis SET error for {}: {}", key, e);
            CacheError::OperationError(format!("SET {}: {}", key, e))
        })?;

        debug!("Cache SET: {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
