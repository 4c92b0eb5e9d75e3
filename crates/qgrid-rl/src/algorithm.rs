//! Tabular Q-learning update (Bellman / TD(0))

use serde::{Deserialize, Serialize};

use qgrid_core::Hyperparameters;

use crate::qtable::QTable;
use crate::state::{Reward, Transition, GOAL};

/// Learning rate and discount for the one-step Bellman update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QLearning {
    pub learning_rate: f64,
    pub discount_factor: f64,
}

impl QLearning {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
        }
    }

    pub fn from_params(params: &Hyperparameters) -> Self {
        Self::new(params.learning_rate, params.discount)
    }

    /// Bootstrapped target r + gamma * max_a Q(s', a); the goal has no future value
    pub fn target(&self, table: &QTable, transition: &Transition) -> Reward {
        let next_max = if transition.next_state == GOAL {
            0.0
        } else {
            table.max_value(transition.next_state)
        };
        transition.reward + self.discount_factor * next_max
    }

    /// Move Q(s, a) toward the target in place. Returns the TD error.
    pub fn update(&self, table: &mut QTable, transition: &Transition) -> f64 {
        let current_q = table.get(transition.state, transition.action);
        let td_error = self.target(table, transition) - current_q;
        table.set(
            transition.state,
            transition.action,
            current_q + self.learning_rate * td_error,
        );
        td_error
    }
}

impl Default for QLearning {
    fn default() -> Self {
        Self::from_params(&Hyperparameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::GridWorld;
    use crate::state::{Action, GridPos};

    #[test]
    fn test_step_penalty_update_from_zero() {
        let env = GridWorld::new();
        let mut table = QTable::new();
        let q = QLearning::new(0.5, 0.9);

        let t = env.step(GridPos::new(0, 0), Action::Right);
        let td = q.update(&mut table, &t);

        assert_eq!(td, -1.0);
        assert_eq!(table.get(GridPos::new(0, 0), Action::Right), -0.5);
    }

    #[test]
    fn test_goal_transition_ignores_goal_row() {
        let env = GridWorld::new();
        let mut table = QTable::new();
        // Values stored at the goal must not leak into the target
        table.set(GOAL, Action::Up, 1000.0);
        let q = QLearning::new(1.0, 1.0);

        let t = env.step(GridPos::new(3, 4), Action::Down);
        q.update(&mut table, &t);

        assert_eq!(table.get(GridPos::new(3, 4), Action::Down), 100.0);
    }

    #[test]
    fn test_bootstraps_from_next_state_max() {
        let env = GridWorld::new();
        let mut table = QTable::new();
        table.set(GridPos::new(1, 1), Action::Down, 10.0);
        table.set(GridPos::new(1, 1), Action::Left, 4.0);
        let q = QLearning::new(1.0, 0.5);

        let t = env.step(GridPos::new(1, 0), Action::Right);
        assert_eq!(q.target(&table, &t), -1.0 + 0.5 * 10.0);
        q.update(&mut table, &t);
        assert_eq!(table.get(GridPos::new(1, 0), Action::Right), 4.0);
    }

    #[test]
    fn test_zero_learning_rate_is_noop() {
        let env = GridWorld::new();
        let mut table = QTable::new();
        table.set(GridPos::new(2, 2), Action::Up, 3.0);
        let before = table.clone();
        let q = QLearning::new(0.0, 0.95);

        for cell in GridPos::all() {
            for action in Action::ALL {
                q.update(&mut table, &env.step(cell, action));
            }
        }

        assert_eq!(table, before);
    }

    #[test]
    fn test_from_params() {
        let params = Hyperparameters::new(0.3, 0.7, 0.2);
        let q = QLearning::from_params(&params);
        assert_eq!(q.learning_rate, 0.3);
        assert_eq!(q.discount_factor, 0.7);
    }
}
