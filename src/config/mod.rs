//! Client configuration: YAML file or environment.

pub mod loader;
pub mod settings;

pub use loader::{file_to_settings, parse_settings, settings_from_env};
pub use settings::{CacheConfig, IssuerConfig, LogFormat, LoggingConfig, TokenSettings};
