use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::settings::{LogFormat, LoggingConfig};

/// `--log-level` of the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Filter directive to log with: the command line level wins over the
/// configured one.
pub fn filter_directive(config: &LoggingConfig, arg_log_level: Option<LogLevel>) -> String {
    arg_log_level
        .map(|level| Level::from(level).to_string().to_lowercase())
        .unwrap_or_else(|| config.level.to_owned())
}

/// Install the global subscriber, writing to stderr so stdout carries only
/// the token. A second call is a no-op.
pub fn init(config: &LoggingConfig, arg_log_level: Option<LogLevel>) {
    let env_filter = EnvFilter::try_new(filter_directive(config, arg_log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stderr);
    let _ = match config.format {
        LogFormat::Json => registry
            .with(layer.json().flatten_event(true).with_ansi(false))
            .try_init(),
        LogFormat::Compact => registry.with(layer.compact().with_ansi(true)).try_init(),
    };
}
