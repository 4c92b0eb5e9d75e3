//! Q-table: value estimate per (row, col, action)

use ndarray::{s, Array2, Array3, ArrayView1};

use qgrid_core::{QGridError, Result};

use crate::state::{Action, GridPos, GRID_SIZE};

/// Dense table of Q-values with a fixed 5x5x4 shape
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Array3<f64>,
}

impl QTable {
    /// Number of entries in the table
    pub const LEN: usize = GRID_SIZE * GRID_SIZE * Action::action_space_size();

    /// Create an all-zero table
    pub fn new() -> Self {
        Self {
            values: Array3::zeros(Self::shape()),
        }
    }

    /// Build a table from row-major values laid out as (row, col, action)
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        let actual = values.len();
        let values = Array3::from_shape_vec(Self::shape(), values).map_err(|_| {
            QGridError::ShapeMismatch {
                expected: Self::LEN,
                actual,
            }
        })?;
        Ok(Self { values })
    }

    /// (rows, cols, actions)
    pub const fn shape() -> (usize, usize, usize) {
        (GRID_SIZE, GRID_SIZE, Action::action_space_size())
    }

    pub fn get(&self, state: GridPos, action: Action) -> f64 {
        self.values[[state.row, state.col, action.to_index()]]
    }

    pub fn set(&mut self, state: GridPos, action: Action, value: f64) {
        self.values[[state.row, state.col, action.to_index()]] = value;
    }

    /// Q-values of every action at a state, in action index order
    pub fn row(&self, state: GridPos) -> ArrayView1<'_, f64> {
        self.values.slice(s![state.row, state.col, ..])
    }

    /// Best value over all actions at a state
    pub fn max_value(&self, state: GridPos) -> f64 {
        self.row(state).iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Per-state maximum over actions (the heatmap projection)
    pub fn max_grid(&self) -> Array2<f64> {
        Array2::from_shape_fn((GRID_SIZE, GRID_SIZE), |(row, col)| {
            self.max_value(GridPos::new(row, col))
        })
    }

    /// Zero every entry in place
    pub fn reset(&mut self) {
        self.values.fill(0.0);
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    pub fn as_array(&self) -> &Array3<f64> {
        &self.values
    }

    /// Nested `[row][col][action]` copy for serialization
    pub fn to_nested(&self) -> Vec<Vec<Vec<f64>>> {
        (0..GRID_SIZE)
            .map(|row| {
                (0..GRID_SIZE)
                    .map(|col| self.row(GridPos::new(row, col)).to_vec())
                    .collect()
            })
            .collect()
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}
