//! Episode runner - simulates one trial from START and learns along the way

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::algorithm::QLearning;
use crate::environment::GridWorld;
use crate::policy::{choose_action, greedy_action, ExplorationSource};
use crate::qtable::QTable;
use crate::state::{GridPos, Reward, MAX_STEPS, START};

/// Result of a single episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub total_reward: Reward,
    pub steps: usize,
    /// False when the step cap cut the episode short
    pub reached_goal: bool,
}

/// Drives the agent through the grid world, updating the Q-table each step
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRunner {
    env: GridWorld,
    max_steps: usize,
}

impl EpisodeRunner {
    pub fn new() -> Self {
        Self {
            env: GridWorld::new(),
            max_steps: MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn environment(&self) -> &GridWorld {
        &self.env
    }

    /// Run one episode and return its total reward
    pub fn run_episode<S>(
        &self,
        table: &mut QTable,
        learning_rate: f64,
        discount: f64,
        epsilon: f64,
        source: &mut S,
    ) -> Reward
    where
        S: ExplorationSource + ?Sized,
    {
        self.run_episode_detailed(table, learning_rate, discount, epsilon, source)
            .total_reward
    }

    /// Run one episode and report reward, step count and whether the goal was hit.
    ///
    /// Hitting the step cap is a normal outcome, not an error.
    pub fn run_episode_detailed<S>(
        &self,
        table: &mut QTable,
        learning_rate: f64,
        discount: f64,
        epsilon: f64,
        source: &mut S,
    ) -> EpisodeOutcome
    where
        S: ExplorationSource + ?Sized,
    {
        let learner = QLearning::new(learning_rate, discount);
        let mut state = START;
        let mut total_reward = 0.0;
        let mut steps = 0;

        while !self.env.is_terminal(state) && steps < self.max_steps {
            let action = choose_action(table, state, epsilon, source);
            let transition = self.env.step(state, action);
            total_reward += transition.reward;

            let td_error = learner.update(table, &transition);
            trace!(
                "step {}: {} {} -> {} (r={}, td={:.3})",
                steps,
                state,
                action,
                transition.next_state,
                transition.reward,
                td_error
            );

            state = transition.next_state;
            steps += 1;
        }

        EpisodeOutcome {
            total_reward,
            steps,
            reached_goal: self.env.is_terminal(state),
        }
    }

    /// Follow the greedy policy from START without learning.
    ///
    /// Stops at the goal, at the step cap, or when a cell repeats
    /// (a deterministic policy that revisits a cell loops forever).
    pub fn greedy_path(&self, table: &QTable) -> Vec<GridPos> {
        let mut path = vec![START];
        let mut state = START;

        while !self.env.is_terminal(state) && path.len() <= self.max_steps {
            let next = self.env.transition(state, greedy_action(table, state));
            if path.contains(&next) {
                break;
            }
            path.push(next);
            state = next;
        }

        path
    }
}

impl Default for EpisodeRunner {
    fn default() -> Self {
        Self::new()
    }
}
