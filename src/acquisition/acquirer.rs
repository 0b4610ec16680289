use std::sync::Arc;

use anyhow::Result;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::acquisition::bypass::CacheBypass;
use crate::cache::{MemoryStore, RedisStore, TokenCacheGateway};
use crate::config::TokenSettings;
use crate::observability::metrics::{get_metrics, BYPASS, DISABLED, ERROR, HIT, MISS, OK, REJECTED, TRANSPORT};
use crate::parser::ttl::extract_ttl;
use crate::sources::{HttpIssuer, IssuerRejection, TokenIssuer, TokenRequest, ISSUER_SUCCESS_CODE};

/// Cache-aside token acquisition.
///
/// Holds no mutable state of its own: cloning is cheap and every clone can be
/// used concurrently. Concurrent misses for the same identity each reach the
/// issuer and each write the cache.
#[derive(Clone)]
pub struct TokenAcquirer {
    issuer: Arc<dyn TokenIssuer>,
    cache: TokenCacheGateway,
    bypass: CacheBypass,
}

impl TokenAcquirer {
    /// Acquirer without a cache, bypass read from `SC_SKIP_TOKEN_CACHE`.
    pub fn new(issuer: impl TokenIssuer + 'static) -> Self {
        Self {
            issuer: Arc::new(issuer),
            cache: TokenCacheGateway::Disabled,
            bypass: CacheBypass::default(),
        }
    }

    pub fn with_cache(mut self, cache: TokenCacheGateway) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_bypass(mut self, bypass: CacheBypass) -> Self {
        self.bypass = bypass;
        self
    }

    /// HTTP issuer from `settings.issuer`; Redis cache when a url is
    /// configured, memory cache for a cache section without one, no cache
    /// when the section is absent.
    pub fn from_settings(settings: &TokenSettings) -> Result<Self> {
        let issuer = HttpIssuer::new(
            settings.issuer.service_addr.clone(),
            settings.issuer.api_path.clone(),
            settings.issuer.request.clone(),
        )?;
        let mut acquirer = Self::new(issuer);

        if let Some(cache_config) = &settings.cache {
            let cache = match &cache_config.redis_url {
                Some(url) => TokenCacheGateway::new(RedisStore::from_url(url)?),
                None => TokenCacheGateway::new(MemoryStore::new()),
            };
            acquirer = acquirer
                .with_cache(cache)
                .with_bypass(CacheBypass::env(cache_config.skip_env.clone()));
        }
        Ok(acquirer)
    }

    pub fn cache(&self) -> &TokenCacheGateway {
        &self.cache
    }

    /// Token of the calling service itself.
    pub async fn get_app_token(&self, service_name: &str, service_secret: &str) -> Result<String> {
        self.acquire(&TokenRequest::app(service_name, service_secret)).await
    }

    /// Token of the calling service acting for `user_id`.
    pub async fn get_user_token(&self, service_name: &str, service_secret: &str, user_id: &str) -> Result<String> {
        self.acquire(&TokenRequest::user(service_name, service_secret, user_id)).await
    }

    /// Returns the issuer payload verbatim, from cache when possible.
    ///
    /// Only issuer failures are errors: a transport error is returned as is,
    /// a non-200 answer becomes an [`IssuerRejection`] carrying the raw body.
    /// Cache failures are logged and otherwise ignored.
    pub async fn acquire(&self, request: &TokenRequest) -> Result<String> {
        let metrics = get_metrics().await;
        let kind = request.kind().as_str();
        let key = request.cache_key();

        // -------------------------------
        // 1. Cache read
        // -------------------------------

        if !self.cache.is_configured() {
            metrics.cache_lookups.with_label_values(&[kind, DISABLED]).inc();
        } else if self.bypass.is_enabled() {
            debug!(key = %key, "skipping {} token cache read", kind);
            metrics.cache_lookups.with_label_values(&[kind, BYPASS]).inc();
        } else if let Some(cached) = self.cache.get(&key).await {
            debug!(key = %key, "{} token served from cache", kind);
            metrics.cache_lookups.with_label_values(&[kind, HIT]).inc();
            return Ok(cached);
        } else {
            debug!(key = %key, "{} token not in cache, set it later", kind);
            metrics.cache_lookups.with_label_values(&[kind, MISS]).inc();
        }

        // -------------------------------
        // 2. Issuer call
        // -------------------------------

        info!(service = %request.service_name(), "requesting {} token", kind);
        metrics.issuer_requests.with_label_values(&[kind]).inc();
        let start = Instant::now();
        let response = self.issuer.issue(request).await.inspect_err(|e| {
            error!("get {} token occur error {}", kind, e);
            metrics.issuer_failures.with_label_values(&[kind, TRANSPORT]).inc();
        })?;
        metrics.issuer_duration.with_label_values(&[kind]).observe(start.elapsed().as_secs_f64());

        if response.code != ISSUER_SUCCESS_CODE {
            error!(code = response.code, body = %response.body, "get {} token occur error", kind);
            metrics.issuer_failures.with_label_values(&[kind, REJECTED]).inc();
            return Err(IssuerRejection { status: response.code, body: response.body }.into());
        }

        // -------------------------------
        // 3. Cache write, also after a bypassed read
        // -------------------------------

        if self.cache.is_configured() {
            let ttl = extract_ttl(response.body.as_bytes());
            match self.cache.set_with_expiry(&key, &response.body, ttl).await {
                Ok(()) => {
                    debug!(key = %key, ttl_secs = ttl.as_secs(), "{} token cached", kind);
                    metrics.cache_writes.with_label_values(&[kind, OK]).inc();
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "setex {} token to cache err", kind);
                    metrics.cache_writes.with_label_values(&[kind, ERROR]).inc();
                }
            }
        }

        Ok(response.body)
    }
}
