//! Configuration management commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run(cmd: ConfigCommands, config: Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(&config).await,
        ConfigCommands::Init { force } => init(Path::new("qgrid.toml"), force).await,
    }
}

async fn show(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    match Config::find_config_file() {
        Some(path) => println!("Config file: {}\n", path.display()),
        None => println!("No configuration file found. Using defaults.\n"),
    }

    print!("{}", config.to_toml()?);
    Ok(())
}

async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let contents = Config::default().to_toml()?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Configuration file created: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qgrid.toml");

        init(&path, false).await.unwrap();

        let parsed: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[tokio::test]
    async fn test_init_keeps_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qgrid.toml");
        std::fs::write(&path, "[training]\nepsilon = 0.5\n").unwrap();

        init(&path, false).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("0.5"));

        init(&path, true).await.unwrap();
        assert!(!std::fs::read_to_string(&path).unwrap().contains("0.5"));
    }
}
