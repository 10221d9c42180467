//! DentAssist Control - CLI client for dental health triage
//!
//! Runs the assessment wizard against dentassistd, falling back to demo
//! results when the proxy or the model is unavailable.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dentassistctl::commands::{self, CliContext};
use dentassistctl::config::{ClientConfig, Preferences};
use dentassistctl::errors::{exit_code_for, EXIT_SUCCESS};
use dentassist_shared::ui;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// Version is embedded at build time
const VERSION: &str = env!("DENTASSIST_VERSION");

#[derive(Parser)]
#[command(name = "dentassistctl")]
#[command(about = "DentAssist - dental health self-assessment", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Proxy base URL (overrides config)
    #[arg(long, global = true)]
    proxy: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full assessment from arguments
    Assess {
        /// Pain level, 1 (none) to 5 (extreme)
        #[arg(long)]
        pain: u8,

        /// Symptom to report (repeatable)
        #[arg(long = "symptom")]
        symptoms: Vec<String>,

        /// Free-text note; known symptoms in it are selected
        #[arg(long)]
        transcript: Option<String>,

        /// Photo of the teeth
        #[arg(long)]
        image: PathBuf,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Step through the assessment interactively
    Wizard,

    /// Show ML model status
    ModelInfo,

    /// Check that the proxy is reachable
    Health,

    /// Show or set the display language
    Language {
        /// Language code (en, hi, te, mr, gu, bn, pa, mai, ur, or)
        code: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match run(cli).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            ui::print_err(&format!("{:#}", e));
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let prefs_path = Preferences::path();

    if let Commands::Language { code } = &cli.command {
        return commands::language(code.as_deref(), &prefs_path);
    }

    let mut config = ClientConfig::load();
    if let Some(proxy) = cli.proxy {
        config.proxy_url = proxy;
    }
    let localizer = Preferences::load_from_path(&prefs_path).localizer();
    let ctx = CliContext::new(&config, localizer)?;

    match cli.command {
        Commands::Assess {
            pain,
            symptoms,
            transcript,
            image,
            json,
        } => commands::assess(&ctx, pain, &symptoms, transcript.as_deref(), &image, json).await,
        Commands::Wizard => commands::wizard(&ctx).await,
        Commands::ModelInfo => commands::model_info(&ctx).await,
        Commands::Health => commands::health(&ctx).await,
        Commands::Language { .. } => Ok(()),
    }
}
