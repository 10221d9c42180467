//! DentAssist Daemon - prediction proxy in front of the ML service
//!
//! Validates uploads, forwards them, and renames the ML service's fields
//! into the shape the assessment clients consume.

use anyhow::Result;
use clap::Parser;
use dentassistd::config::Config;
use dentassistd::server::{self, AppState};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dentassistd")]
#[command(about = "DentAssist prediction proxy", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to load instead of the default locations
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the listen address (host:port)
    #[arg(long, short)]
    listen: Option<String>,

    /// Write a default config to the given path and exit
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(path) = cli.init_config {
        return Config::save_default(path);
    }

    let mut config = match cli.config {
        Some(path) => {
            let mut config = Config::load_from_path(&path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => Config::load(),
    };
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    info!("DentAssist Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config)?;
    server::run(state).await
}
