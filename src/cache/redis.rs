use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use tracing::debug;

use crate::cache::gateway::TokenStore;

/// Token store backed by a shared Redis instance.
///
/// Expiry is delegated to Redis (`SETEX`), so entries vanish on their own.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a connection pool for `redis://host:port/db`. No connection is
    /// opened until the first command.
    pub fn from_url(url: &str) -> Result<Self> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| anyhow!("invalid redis cache url '{}': {}", url, e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TokenStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.get(key).await?;
        debug!(key = %key, found = value.is_some(), "redis GET");
        Ok(value)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let ttl_secs = ttl.as_secs();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        debug!(key = %key, ttl_secs = %ttl_secs, "redis SETEX");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        assert!(RedisStore::from_url("definitely not a url").is_err());
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error_not_a_panic() {
        // port 1 is never a redis server
        let store = RedisStore::from_url("redis://127.0.0.1:1/0").unwrap();
        assert!(store.get("APP_TOKEN_X").await.is_err());
        assert!(store.set_with_expiry("APP_TOKEN_X", "v", Duration::from_secs(1)).await.is_err());
    }
}
