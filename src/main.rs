//! Chorder CLI
//!
//! Turns GKOS chords read from stdin into key events on a virtual keyboard.

use anyhow::Result;
use clap::Parser;
use tracing::info;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(chorder::ChorderConfig::default_path);

    match cli.command {
        Commands::Run { dry_run, contacts } => {
            info!("Loading keymap from {:?}", config_path);
            commands::run::run(&config_path, dry_run, contacts).await
        }
        Commands::Check => commands::keymap::check(&config_path),
        Commands::Show { map } => commands::keymap::show(&config_path, map.as_deref()),
        Commands::Layout { file, output } => commands::layout::generate(&file, output.as_deref()),
        Commands::Symname { name, code } => commands::symname::symname(&name, code),
    }
}
