use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

/// Key/value backend able to hold token payloads with an expiry.
///
/// Implementations guarantee atomicity of single `get`/`set_with_expiry`
/// calls; nothing else is synchronized on top of them.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` for a missing or expired key.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// Optional token cache. `Disabled` means no backend was wired up and every
/// cache interaction is skipped.
#[derive(Clone, Default)]
pub enum TokenCacheGateway {
    #[default]
    Disabled,
    Configured(Arc<dyn TokenStore>),
}

impl std::fmt::Debug for TokenCacheGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenCacheGateway::Disabled => f.write_str("Disabled"),
            TokenCacheGateway::Configured(_) => f.write_str("Configured"),
        }
    }
}

impl TokenCacheGateway {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        TokenCacheGateway::Configured(Arc::new(store))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, TokenCacheGateway::Configured(_))
    }

    /// Look up a cached payload. Backend errors are logged and read as a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self {
            TokenCacheGateway::Disabled => None,
            TokenCacheGateway::Configured(store) => store
                .get(key)
                .await
                .inspect_err(|e| warn!(key = %key, error = %e, "token cache read failed, treating as miss"))
                .ok()
                .flatten(),
        }
    }

    /// Store a payload. Writing to a disabled gateway is a no-op.
    pub async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        match self {
            TokenCacheGateway::Disabled => Ok(()),
            TokenCacheGateway::Configured(store) => store.set_with_expiry(key, value, ttl).await,
        }
    }
}
