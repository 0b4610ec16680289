use std::path::Path;

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::acquisition::bypass::DEFAULT_SKIP_CACHE_ENV;
use crate::config::settings::{CacheConfig, IssuerConfig, LogFormat, LoggingConfig, TokenSettings, DEFAULT_MANAGE_API};
use crate::restclient::RequestOptions;

pub const ENV_MANAGE_SVC: &str = "SC_MANAGE_SVC";
pub const ENV_MANAGE_API: &str = "SC_MANAGE_API";
pub const ENV_CACHE_URL: &str = "SC_TOKEN_CACHE_URL";

/// Load and validate settings from a YAML file, expanding `${VAR}` and
/// `${VAR:default}` from the environment first.
pub async fn file_to_settings(path: &Path) -> Result<TokenSettings> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("cannot read config '{}': {}", path.display(), e))?;
    parse_settings(&expand_env_vars(&content))
}

pub fn parse_settings(content: &str) -> Result<TokenSettings> {
    let settings: TokenSettings = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;
    debug!("validation config ...");
    validate(&settings)?;
    Ok(settings)
}

/// Settings taken straight from the environment:
/// `SC_MANAGE_SVC` (required), `SC_MANAGE_API`, `SC_TOKEN_CACHE_URL`.
/// Without a cache url no cache is used.
pub fn settings_from_env() -> Result<TokenSettings> {
    let service_addr = std::env::var(ENV_MANAGE_SVC)
        .map_err(|_| anyhow!("{} is not set", ENV_MANAGE_SVC))?;
    let api_path = std::env::var(ENV_MANAGE_API).unwrap_or_else(|_| DEFAULT_MANAGE_API.to_owned());
    let redis_url = std::env::var(ENV_CACHE_URL).ok().filter(|url| !url.is_empty());

    let settings = TokenSettings {
        issuer: IssuerConfig { service_addr, api_path, request: RequestOptions::default() },
        cache: redis_url.map(|url| CacheConfig { redis_url: Some(url), skip_env: DEFAULT_SKIP_CACHE_ENV.to_owned() }),
        logging: LoggingConfig::new(
            std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned()),
            LogFormat::from_env(),
        ),
    };
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &TokenSettings) -> Result<()> {
    if settings.issuer.service_addr.trim().is_empty() {
        bail!("config is not valid: issuer.service_addr is empty");
    }
    if settings.issuer.request.timeout_seconds == 0 {
        bail!("config is not valid: issuer.request.timeout_seconds must be positive");
    }
    if let Some(url) = settings.cache.as_ref().and_then(|c| c.redis_url.as_ref()) {
        if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
            bail!("config is not valid: cache.redis_url '{}' is not a redis url", url);
        }
    }
    Ok(())
}

fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("env placeholder regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
