//! Configuration loading for the qgrid CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use qgrid_core::Hyperparameters;
use qgrid_rl::MAX_STEPS;

/// Prefix for environment overrides, e.g. `QGRID__TRAINING__EPSILON=0.2`
pub const ENV_PREFIX: &str = "QGRID";

/// Configuration for the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub training: TrainingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon: f64,
    pub episodes: usize,
    pub max_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub fn params(&self) -> Hyperparameters {
        Hyperparameters::new(self.learning_rate, self.discount, self.epsilon)
            .with_episodes(self.episodes)
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let params = Hyperparameters::default();
        Self {
            learning_rate: params.learning_rate,
            discount: params.discount,
            epsilon: params.epsilon,
            episodes: params.episodes,
            max_steps: MAX_STEPS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub moving_average_window: usize,
    pub show_policy: bool,
    /// Decimal places in heatmap cells
    pub precision: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            moving_average_window: 10,
            show_policy: true,
            precision: 1,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        Self::load_with(Self::find_config_file().as_deref(), ENV_PREFIX)
    }

    /// Load from an explicit file (if any) plus environment variables under `prefix`
    pub fn load_with(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = path {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        } else {
            tracing::debug!("No config file found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Find the configuration file
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order: QGRID_CONFIG env, ./qgrid.toml, ~/.config/qgrid/qgrid.toml
        if let Ok(path) = std::env::var("QGRID_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("qgrid.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("qgrid").join("qgrid.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
