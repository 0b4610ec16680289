use serde::Deserialize;

use crate::acquisition::bypass::DEFAULT_SKIP_CACHE_ENV;
use crate::restclient::RequestOptions;

pub const DEFAULT_MANAGE_API: &str = "/api/sparrow_app/token/";

/// ================================
/// Full client configuration
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TokenSettings {
    pub issuer: IssuerConfig,
    /// absent => no token cache
    pub cache: Option<CacheConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// ================================
/// Token issuer
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IssuerConfig {
    /// host[:port] of the issuing service
    pub service_addr: String,
    #[serde(default = "default_manage_api")]
    pub api_path: String,
    #[serde(default)]
    pub request: RequestOptions,
}

/// ================================
/// Token cache
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// `redis://` url; without one tokens are cached in process memory
    pub redis_url: Option<String>,
    /// variable that, set to `true`, skips cache reads
    #[serde(default = "default_skip_env")]
    pub skip_env: String,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: LogFormat::Compact }
    }
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "compact".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

fn default_manage_api() -> String {
    DEFAULT_MANAGE_API.to_string()
}

fn default_skip_env() -> String {
    DEFAULT_SKIP_CACHE_ENV.to_string()
}
