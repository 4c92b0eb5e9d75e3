//! qgrid RL - Tabular Q-learning for a grid-world navigation task
//!
//! This crate provides the deterministic 5x5 grid world, the Q-table,
//! the epsilon-greedy policy, the Bellman update, and a caller-owned
//! training session that keeps learning state across repeated calls.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithm;
pub mod environment;
pub mod episode;
pub mod policy;
pub mod qtable;
pub mod session;
pub mod state;

pub use algorithm::QLearning;
pub use environment::GridWorld;
pub use episode::{EpisodeOutcome, EpisodeRunner};
pub use policy::{choose_action, greedy_action, ExplorationSource};
pub use qtable::QTable;
pub use session::{SessionPhase, SessionSnapshot, SessionStats, TrainingSession};
pub use state::{Action, GridPos, Reward, Transition, GOAL, GRID_SIZE, MAX_STEPS, START};
