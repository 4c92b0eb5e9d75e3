//! CLI command modules

pub mod config;
pub mod shell;
pub mod train;

use anyhow::Result;
use qgrid_rl::TrainingSession;

use crate::config::TrainingConfig;

/// Build a session from the training section of the config
pub fn new_session(training: &TrainingConfig) -> TrainingSession {
    let session = match training.seed {
        Some(seed) => TrainingSession::with_seed(seed),
        None => TrainingSession::new(),
    };
    session.with_max_steps(training.max_steps)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
