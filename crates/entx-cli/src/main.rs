//! entx CLI
//!
//! Offline inspection of exported entity histories

use clap::{Parser, Subcommand};
use entx_core::logging_facility;
use entx_core::EngineConfig;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "entx")]
#[command(about = "entx - entity version history and conflict inspection", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify every version of a history as none/soft/hard
    Classify(commands::classify::ClassifyArgs),
    /// Show property changes between consecutive versions
    Diff(commands::diff::DiffArgs),
    /// Render the read view of the current version
    Project(commands::project::ProjectArgs),
    /// Check a mutation without storing it
    Validate(commands::validate::ValidateArgs),
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;
    logging_facility::init(config.logging.profile);
    tracing::debug!(profile = ?config.logging.profile, "configuration loaded");

    match cli.command {
        Commands::Classify(args) => commands::classify::execute(args, &config),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Project(args) => commands::project::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
