//! Training session - owns the Q-table, the reward history and the RNG
//!
//! A session is created by its caller and lives as long as the caller
//! keeps it. Nothing is shared between sessions: each user of a process
//! holds its own.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use qgrid_core::{Hyperparameters, SessionId, MAX_EPISODES};

use crate::episode::EpisodeRunner;
use crate::policy::greedy_action;
use crate::qtable::QTable;
use crate::state::{Action, GridPos, Reward, GOAL, GRID_SIZE};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Zero table, no history
    Fresh,
    /// At least one training call has run since creation or the last reset
    Trained,
}

/// Persistent Q-learning state across repeated training calls
pub struct TrainingSession {
    id: SessionId,
    q_table: QTable,
    episodes_run: u64,
    rewards_history: Vec<Reward>,
    goals_reached: u64,
    phase: SessionPhase,
    runner: EpisodeRunner,
    rng: StdRng,
    seed: Option<u64>,
    created_at: DateTime<Utc>,
    last_trained_at: Option<DateTime<Utc>>,
}

impl TrainingSession {
    /// Create a session whose RNG is seeded from OS entropy
    pub fn new() -> Self {
        Self::build(StdRng::from_entropy(), None)
    }

    /// Create a session with a reproducible random stream
    pub fn with_seed(seed: u64) -> Self {
        Self::build(StdRng::seed_from_u64(seed), Some(seed))
    }

    fn build(rng: StdRng, seed: Option<u64>) -> Self {
        let session = Self {
            id: SessionId::new(),
            q_table: QTable::new(),
            episodes_run: 0,
            rewards_history: Vec::new(),
            goals_reached: 0,
            phase: SessionPhase::Fresh,
            runner: EpisodeRunner::new(),
            rng,
            seed,
            created_at: Utc::now(),
            last_trained_at: None,
        };
        debug!("Created training session {} (seed: {:?})", session.id, seed);
        session
    }

    /// Override the per-episode step cap
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.runner = self.runner.with_max_steps(max_steps);
        self
    }

    /// Run `episodes` episodes against this session's table and RNG.
    ///
    /// Parameters are assumed valid; see [`Hyperparameters::validate`].
    pub fn train(&mut self, episodes: usize, params: &Hyperparameters) {
        if episodes == 0 {
            return;
        }

        let start = self.rewards_history.len();
        self.reserve_history(episodes);

        for _ in 0..episodes {
            let outcome = self.runner.run_episode_detailed(
                &mut self.q_table,
                params.learning_rate,
                params.discount,
                params.epsilon,
                &mut self.rng,
            );
            self.rewards_history.push(outcome.total_reward);
            self.episodes_run += 1;
            if outcome.reached_goal {
                self.goals_reached += 1;
            }
            debug!(
                "Episode {} finished: reward={}, steps={}, reached_goal={}",
                self.episodes_run, outcome.total_reward, outcome.steps, outcome.reached_goal
            );
        }

        self.phase = SessionPhase::Trained;
        self.last_trained_at = Some(Utc::now());

        let batch = &self.rewards_history[start..];
        info!(
            "Session {} trained {} episodes (total {}), mean reward {:.2}",
            self.id,
            episodes,
            self.episodes_run,
            mean(batch)
        );
    }

    /// Pre-grow the history for one call, bounded so huge counts never allocate up front
    fn reserve_history(&mut self, episodes: usize) {
        self.rewards_history.reserve(episodes.min(MAX_EPISODES));
    }

    /// Train with the episode count carried in `params`
    pub fn train_with(&mut self, params: &Hyperparameters) {
        self.train(params.episodes, params);
    }

    /// Forget everything learned. The RNG stream continues where it was.
    pub fn reset(&mut self) {
        self.q_table.reset();
        self.episodes_run = 0;
        self.rewards_history.clear();
        self.goals_reached = 0;
        self.phase = SessionPhase::Fresh;
        self.last_trained_at = None;
        info!("Session {} reset", self.id);
    }

    /// Restart the random stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = Some(seed);
        debug!("Session {} reseeded with {}", self.id, seed);
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn max_steps(&self) -> usize {
        self.runner.max_steps()
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Mutable access for callers that pre-seed values
    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn episodes_run(&self) -> u64 {
        self.episodes_run
    }

    /// Per-episode total rewards in chronological order
    pub fn rewards_history(&self) -> &[Reward] {
        &self.rewards_history
    }

    /// Max over actions for every cell
    pub fn max_q_grid(&self) -> Array2<f64> {
        self.q_table.max_grid()
    }

    /// Max projection with the goal cell shown at the goal reward once training has run.
    ///
    /// The goal row itself is never updated, so without the override it stays at zero.
    pub fn heatmap_values(&self) -> Array2<f64> {
        let mut grid = self.max_q_grid();
        if self.episodes_run > 0 {
            grid[[GOAL.row, GOAL.col]] = 100.0;
        }
        grid
    }

    /// Greedy action per cell; `None` at the goal
    pub fn policy_grid(&self) -> Vec<Vec<Option<Action>>> {
        (0..GRID_SIZE)
            .map(|row| {
                (0..GRID_SIZE)
                    .map(|col| {
                        let cell = GridPos::new(row, col);
                        (cell != GOAL).then(|| greedy_action(&self.q_table, cell))
                    })
                    .collect()
            })
            .collect()
    }

    /// Cells visited by the greedy policy from START
    pub fn greedy_path(&self) -> Vec<GridPos> {
        self.runner.greedy_path(&self.q_table)
    }

    /// Trailing-window average; only full windows produce a value
    pub fn moving_average(&self, window: usize) -> Vec<f64> {
        moving_average(&self.rewards_history, window)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            episodes_run: self.episodes_run,
            mean_reward: mean(&self.rewards_history),
            best_reward: self.rewards_history.iter().copied().reduce(f64::max),
            last_reward: self.rewards_history.last().copied(),
            success_rate: if self.episodes_run > 0 {
                self.goals_reached as f64 / self.episodes_run as f64
            } else {
                0.0
            },
        }
    }

    /// Everything a presentation layer needs to render the session
    pub fn snapshot(&self) -> SessionSnapshot {
        let heatmap = self.heatmap_values();
        SessionSnapshot {
            session_id: self.id,
            phase: self.phase,
            episodes_run: self.episodes_run,
            rewards_history: self.rewards_history.clone(),
            q_table: self.q_table.to_nested(),
            heatmap: heatmap.rows().into_iter().map(|r| r.to_vec()).collect(),
            policy: self.policy_grid(),
            greedy_path: self.greedy_path(),
            stats: self.stats(),
            created_at: self.created_at,
            last_trained_at: self.last_trained_at,
        }
    }
}

impl Default for TrainingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics over the reward history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub episodes_run: u64,
    pub mean_reward: f64,
    pub best_reward: Option<Reward>,
    pub last_reward: Option<Reward>,
    /// Fraction of episodes that reached the goal
    pub success_rate: f64,
}

/// Serializable view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub phase: SessionPhase,
    pub episodes_run: u64,
    pub rewards_history: Vec<Reward>,
    /// `[row][col][action]`
    pub q_table: Vec<Vec<Vec<f64>>>,
    /// `[row][col]`
    pub heatmap: Vec<Vec<f64>>,
    pub policy: Vec<Vec<Option<Action>>>,
    pub greedy_path: Vec<GridPos>,
    pub stats: SessionStats,
    pub created_at: DateTime<Utc>,
    pub last_trained_at: Option<DateTime<Utc>>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Valid-mode moving average: `values.len() - window + 1` entries
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    values.windows(window).map(mean).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(learning_rate: f64, epsilon: f64) -> Hyperparameters {
        Hyperparameters::new(learning_rate, 0.95, epsilon)
    }

    #[test]
    fn test_new_session_is_fresh() {
        let session = TrainingSession::with_seed(1);
        assert_eq!(session.phase(), SessionPhase::Fresh);
        assert_eq!(session.episodes_run(), 0);
        assert!(session.rewards_history().is_empty());
        assert!(session.q_table().is_zero());
        assert_eq!(session.seed(), Some(1));
    }

    #[test]
    fn test_train_appends_exactly_n() {
        let mut session = TrainingSession::with_seed(42);
        session.train(10, &params(0.8, 0.1));
        assert_eq!(session.episodes_run(), 10);
        assert_eq!(session.rewards_history().len(), 10);
        assert_eq!(session.phase(), SessionPhase::Trained);

        let first_ten = session.rewards_history().to_vec();
        session.train(5, &params(0.8, 0.1));
        assert_eq!(session.episodes_run(), 15);
        assert_eq!(session.rewards_history().len(), 15);
        assert_eq!(&session.rewards_history()[..10], first_ten.as_slice());
    }

    #[test]
    fn test_train_zero_is_noop() {
        let mut session = TrainingSession::with_seed(42);
        session.train(0, &params(0.8, 0.1));
        assert_eq!(session.phase(), SessionPhase::Fresh);
        assert_eq!(session.episodes_run(), 0);
    }

    #[test]
    fn test_reserve_is_bounded_for_huge_counts() {
        let mut session = TrainingSession::with_seed(42);
        session.reserve_history(usize::MAX);
        assert!(session.rewards_history.capacity() >= MAX_EPISODES);

        // Training still appends one reward per episode after the bounded reserve
        session.train(MAX_EPISODES + 5, &params(0.8, 0.1));
        assert_eq!(session.rewards_history().len(), MAX_EPISODES + 5);
        assert_eq!(session.episodes_run(), (MAX_EPISODES + 5) as u64);
    }

    #[test]
    fn test_zero_learning_rate_keeps_table() {
        let mut session = TrainingSession::with_seed(9);
        session.train(50, &params(0.0, 0.5));
        assert!(session.q_table().is_zero());
        assert_eq!(session.episodes_run(), 50);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = TrainingSession::with_seed(3);
        session.train(25, &params(0.8, 0.2));
        assert!(!session.q_table().is_zero());

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Fresh);
        assert_eq!(session.episodes_run(), 0);
        assert!(session.rewards_history().is_empty());
        assert!(session.q_table().is_zero());
        assert_eq!(session.stats().success_rate, 0.0);
    }

    #[test]
    fn test_reset_on_fresh_session() {
        let mut session = TrainingSession::with_seed(3);
        session.reset();
        assert_eq!(session.phase(), SessionPhase::Fresh);
        assert!(session.q_table().is_zero());
    }

    #[test]
    fn test_heatmap_goal_override() {
        let mut session = TrainingSession::with_seed(5);
        assert_eq!(session.heatmap_values()[[4, 4]], 0.0);

        session.train(1, &params(0.8, 0.1));
        assert_eq!(session.heatmap_values()[[4, 4]], 100.0);
        assert_eq!(session.max_q_grid()[[4, 4]], 0.0);
    }

    #[test]
    fn test_policy_grid_blank_at_goal() {
        let session = TrainingSession::with_seed(5);
        let policy = session.policy_grid();
        assert_eq!(policy[4][4], None);
        assert_eq!(policy[0][0], Some(Action::Right));
    }

    #[test]
    fn test_moving_average() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_average(&values, 2), vec![1.5, 2.5, 3.5, 4.5]);
        assert_eq!(moving_average(&values, 5), vec![3.0]);
        assert!(moving_average(&values, 6).is_empty());
        assert!(moving_average(&values, 0).is_empty());
    }

    #[test]
    fn test_stats_on_empty_history() {
        let stats = TrainingSession::with_seed(0).stats();
        assert_eq!(stats.episodes_run, 0);
        assert_eq!(stats.mean_reward, 0.0);
        assert_eq!(stats.best_reward, None);
        assert_eq!(stats.last_reward, None);
    }

    #[test]
    fn test_stats_track_history() {
        let mut session = TrainingSession::with_seed(21);
        session.train(30, &params(0.8, 0.1));
        let stats = session.stats();
        let history = session.rewards_history();

        assert_eq!(stats.last_reward, history.last().copied());
        assert!(stats.best_reward.unwrap() >= stats.mean_reward);
        assert!((0.0..=1.0).contains(&stats.success_rate));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = TrainingSession::with_seed(8);
        session.train(3, &params(0.8, 0.1));

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["episodes_run"], 3);
        assert_eq!(json["phase"], "trained");
        assert_eq!(json["rewards_history"].as_array().unwrap().len(), 3);
        assert_eq!(json["heatmap"][4][4], 100.0);
        assert!(json["policy"][4][4].is_null());
    }
}
