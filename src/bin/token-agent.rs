use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use token_cache_client::config::{file_to_settings, settings_from_env};
use token_cache_client::observability::metrics::get_metrics;
use token_cache_client::utils::logging::{self, LogLevel};
use token_cache_client::TokenAcquirer;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config; settings are read from SC_* variables when omitted
    #[arg(short, long, env = "CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// print prometheus metrics to stderr when done
    #[arg(long)]
    metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Token of the service itself
    App {
        #[arg(long, env = "SC_SVC_NAME")]
        name: String,
        #[arg(long, env = "SC_SVC_SECRET")]
        secret: String,
    },
    /// Token of the service acting for a user
    User {
        #[arg(long, env = "SC_SVC_NAME")]
        name: String,
        #[arg(long, env = "SC_SVC_SECRET")]
        secret: String,
        #[arg(long)]
        uid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load config, init logging
    // -------------------------------

    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => file_to_settings(path).await?,
        None => settings_from_env()?,
    };
    logging::init(&settings.logging, args.log_level);

    // -------------------------------
    // 2. Acquire token
    // -------------------------------

    let acquirer = TokenAcquirer::from_settings(&settings)?;
    info!(cache = ?acquirer.cache(), issuer = %settings.issuer.service_addr, "acquiring token");
    let token = match &args.command {
        Command::App { name, secret } => acquirer.get_app_token(name, secret).await?,
        Command::User { name, secret, uid } => acquirer.get_user_token(name, secret, uid).await?,
    };
    println!("{}", token);

    // -------------------------------
    // 3. Metrics
    // -------------------------------

    if args.metrics {
        eprintln!("{}", get_metrics().await.render()?);
    }
    Ok(())
}
