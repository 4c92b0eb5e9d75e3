//! Epsilon-greedy action selection
//!
//! Selection is a pure function of the Q-table, the state, epsilon, and an
//! injected [`ExplorationSource`]. Every `rand::Rng` is a source; tests plug
//! in scripted sources to pin down the draws.

use rand::Rng;

use crate::qtable::QTable;
use crate::state::{Action, GridPos};

/// Randomness consumed by the policy
pub trait ExplorationSource {
    /// Uniform value in [0, 1)
    fn draw_unit(&mut self) -> f64;

    /// Uniformly chosen action
    fn random_action(&mut self) -> Action;
}

impl<R: Rng + ?Sized> ExplorationSource for R {
    fn draw_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn random_action(&mut self) -> Action {
        Action::ALL[self.gen_range(0..Action::ALL.len())]
    }
}

/// Explore with probability `epsilon`, otherwise take the greedy action.
///
/// One unit draw is made per call; a second draw happens only when exploring.
pub fn choose_action<S>(table: &QTable, state: GridPos, epsilon: f64, source: &mut S) -> Action
where
    S: ExplorationSource + ?Sized,
{
    if source.draw_unit() < epsilon {
        source.random_action()
    } else {
        greedy_action(table, state)
    }
}

/// Highest-valued action at `state`; ties go to the lowest action index.
pub fn greedy_action(table: &QTable, state: GridPos) -> Action {
    let row = table.row(state);
    let mut best = Action::ALL[0];
    let mut best_value = row[0];

    for action in &Action::ALL[1..] {
        let value = row[action.to_index()];
        // Strict comparison keeps the earlier action on ties
        if value > best_value {
            best = *action;
            best_value = value;
        }
    }

    best
}
