//! qgrid CLI - Command line interface for the grid-world Q-learning engine
//!
//! Trains a caller-owned session and renders the learned values, the greedy
//! policy and the learning curve as text.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod render;

use commands::{config as config_cmd, shell, train};

#[derive(Parser)]
#[command(name = "qgrid")]
#[command(author, version, about = "qgrid - Q-learning on a 5x5 grid world", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a fresh session and print the result
    Train(train::TrainArgs),

    /// Interactive session: train, reset and inspect repeatedly
    Shell(shell::ShellArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("qgrid={log_level},qgrid_rl={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config::Config::load()?;

    match cli.command {
        Commands::Train(args) => train::run(args, config).await,
        Commands::Shell(args) => shell::run(args, config).await,
        Commands::Config(cmd) => config_cmd::run(cmd, config).await,
    }
}
