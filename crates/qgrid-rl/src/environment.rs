//! Deterministic grid-world environment

use serde::{Deserialize, Serialize};

use crate::state::{Action, GridPos, Reward, Transition, GOAL, GRID_SIZE};

/// Reward for stepping onto the goal cell
pub const GOAL_REWARD: Reward = 100.0;

/// Reward for every other step
pub const STEP_PENALTY: Reward = -1.0;

/// 5x5 navigation task from the top-left to the bottom-right corner.
///
/// Moving into a wall leaves that coordinate unchanged; positions never wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWorld;

impl GridWorld {
    pub fn new() -> Self {
        Self
    }

    /// Apply an action, clamping each coordinate to the grid
    pub fn transition(&self, state: GridPos, action: Action) -> GridPos {
        let (dr, dc) = action.delta();
        GridPos::new(clamp_axis(state.row, dr), clamp_axis(state.col, dc))
    }

    /// Reward depends only on the destination cell
    pub fn reward(&self, next_state: GridPos) -> Reward {
        if next_state == GOAL {
            GOAL_REWARD
        } else {
            STEP_PENALTY
        }
    }

    pub fn is_terminal(&self, state: GridPos) -> bool {
        state == GOAL
    }

    /// Transition, reward and termination for one move
    pub fn step(&self, state: GridPos, action: Action) -> Transition {
        let next_state = self.transition(state, action);
        Transition {
            state,
            action,
            reward: self.reward(next_state),
            next_state,
            done: self.is_terminal(next_state),
        }
    }
}

fn clamp_axis(value: usize, delta: isize) -> usize {
    (value as isize + delta).clamp(0, GRID_SIZE as isize - 1) as usize
}
