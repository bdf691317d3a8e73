//! tumorbot: command-line front end for the brain-tumor chat engine.
//!
//! Loads `.env`, the TOML config and the provider key, then runs one
//! subcommand. Replies go to stdout; logs and prompts go to stderr.

mod cli;
mod commands;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use tumorbot_config::TumorbotConfig;

/// `RUST_LOG` wins, then `--log-level`, then the config file.
fn init_logging(log_level: Option<&str>, config: Option<&TumorbotConfig>) {
    let directive = match log_level {
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("tumorbot={level}"),
        None => config
            .map(|c| c.logging.level.directive())
            .unwrap_or("tumorbot=info")
            .to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = cli::parse();

    let config = match tumorbot_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(args.log_level.as_deref(), None);
            tracing::error!("Config load failed: {e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(args.log_level.as_deref(), Some(&config));

    tracing::info!("tumorbot v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        model = %config.provider.model,
        sources = config.references.sources.len(),
        "Config loaded"
    );

    match commands::run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
