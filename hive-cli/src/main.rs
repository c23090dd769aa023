//! Hive CLI - Command-line interface
//!
//! Commands:
//! - uhp (default): serve the engine protocol on stdin/stdout
//! - selfplay: play one engine-vs-engine game and print the final board
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hive_core::{Engine, EngineConfig};
use hive_cli::{selfplay, uhp};

#[derive(Parser)]
#[command(name = "hive")]
#[command(about = "Hive game engine", version)]
struct Cli {
    /// Engine config JSON file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the engine protocol on stdin/stdout
    Uhp,
    /// Play the engine against itself
    Selfplay(selfplay::SelfPlayArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut engine = Engine::new(config).context("Invalid engine config")?;

    let mut output = std::io::stdout();
    match cli.command.unwrap_or(Commands::Uhp) {
        Commands::Uhp => uhp::run(&mut engine, std::io::stdin().lock(), &mut output),
        Commands::Selfplay(args) => selfplay::run(&mut engine, &args, &mut output),
    }
}
