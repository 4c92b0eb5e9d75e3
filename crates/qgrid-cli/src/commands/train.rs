//! One-shot training command

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::{Config, TrainingConfig};
use crate::render;

#[derive(Args, Debug, Default)]
pub struct TrainArgs {
    /// Episodes per training round
    #[arg(short = 'n', long)]
    pub episodes: Option<usize>,

    /// Learning rate (alpha), in (0, 1]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor (gamma), in (0, 1]
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate (epsilon), in [0, 1]
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of training calls made on the same session
    #[arg(long, default_value_t = 1)]
    pub rounds: usize,

    /// Print the session snapshot as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl TrainArgs {
    /// Command-line flags win over file and environment values
    pub fn apply(&self, training: &mut TrainingConfig) {
        if let Some(episodes) = self.episodes {
            training.episodes = episodes;
        }
        if let Some(alpha) = self.alpha {
            training.learning_rate = alpha;
        }
        if let Some(gamma) = self.gamma {
            training.discount = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            training.epsilon = epsilon;
        }
        if self.seed.is_some() {
            training.seed = self.seed;
        }
    }
}

pub async fn run(args: TrainArgs, mut config: Config) -> Result<()> {
    args.apply(&mut config.training);
    let params = config.training.params();
    params.validate().context("Invalid training parameters")?;

    let mut session = super::new_session(&config.training);
    info!(
        "Training {} round(s) of {} episodes (alpha={}, gamma={}, epsilon={})",
        args.rounds, params.episodes, params.learning_rate, params.discount, params.epsilon
    );

    for _ in 0..args.rounds {
        session.train_with(&params);
    }

    if args.json {
        super::print_json(&session.snapshot())
    } else {
        print!("{}", render::session_report(&session, &config.display));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = TrainArgs {
            episodes: Some(5),
            alpha: Some(0.3),
            epsilon: Some(0.0),
            seed: Some(9),
            ..TrainArgs::default()
        };
        let mut training = TrainingConfig::default();
        args.apply(&mut training);

        assert_eq!(training.episodes, 5);
        assert_eq!(training.learning_rate, 0.3);
        assert_eq!(training.discount, 0.95);
        assert_eq!(training.epsilon, 0.0);
        assert_eq!(training.seed, Some(9));
    }

    #[test]
    fn test_missing_seed_keeps_configured_seed() {
        let mut training = TrainingConfig {
            seed: Some(4),
            ..TrainingConfig::default()
        };
        TrainArgs::default().apply(&mut training);
        assert_eq!(training.seed, Some(4));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_alpha() {
        let args = TrainArgs {
            alpha: Some(1.5),
            rounds: 1,
            ..TrainArgs::default()
        };
        assert!(run(args, Config::default()).await.is_err());
    }
}
