//! Training hyperparameters
//!
//! The engine assumes these are already in range; callers that accept
//! user input run [`Hyperparameters::validate`] first.

use serde::{Deserialize, Serialize};

use crate::error::{QGridError, Result};

/// Most episodes a single validated training call may request
pub const MAX_EPISODES: usize = 1000;

/// Learning rate, discount factor, exploration rate and episodes per call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Step size alpha of the Bellman update, in (0, 1]
    pub learning_rate: f64,

    /// Discount gamma applied to the best next-state value, in (0, 1]
    pub discount: f64,

    /// Probability epsilon of taking a random action, in [0, 1]
    pub epsilon: f64,

    /// Episodes run by a single training call
    pub episodes: usize,
}

impl Hyperparameters {
    pub fn new(learning_rate: f64, discount: f64, epsilon: f64) -> Self {
        Self {
            learning_rate,
            discount,
            epsilon,
            ..Self::default()
        }
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(QGridError::invalid_parameter(
                "learning_rate",
                format!("must be within (0, 1], got {}", self.learning_rate),
            ));
        }
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return Err(QGridError::invalid_parameter(
                "discount",
                format!("must be within (0, 1], got {}", self.discount),
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(QGridError::invalid_parameter(
                "epsilon",
                format!("must be within [0, 1], got {}", self.epsilon),
            ));
        }
        if !(1..=MAX_EPISODES).contains(&self.episodes) {
            return Err(QGridError::invalid_parameter(
                "episodes",
                format!("must be within [1, {MAX_EPISODES}], got {}", self.episodes),
            ));
        }
        Ok(())
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.8,
            discount: 0.95,
            epsilon: 0.1,
            episodes: 100,
        }
    }
}
