//! State, Action, and Reward types for the grid world

use serde::{Deserialize, Serialize};

use qgrid_core::QGridError;

/// Reward value from environment
pub type Reward = f64;

/// Side length of the square grid
pub const GRID_SIZE: usize = 5;

/// Step cap for a single episode
pub const MAX_STEPS: usize = 50;

/// Every episode starts here
pub const START: GridPos = GridPos::new(0, 0);

/// Reaching this cell ends the episode
pub const GOAL: GridPos = GridPos::new(GRID_SIZE - 1, GRID_SIZE - 1);

/// A cell of the grid, 0-indexed from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Iterate over every cell in row-major order
    pub fn all() -> impl Iterator<Item = GridPos> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| GridPos::new(row, col)))
    }

    /// Manhattan distance to another cell
    pub fn distance(&self, other: GridPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Directional move. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Right,
    Down,
    Left,
    Up,
}

impl Action {
    /// All actions in index order
    pub const ALL: [Action; 4] = [Action::Right, Action::Down, Action::Left, Action::Up];

    /// (row, col) offset applied by this move
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Right => (0, 1),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Up => (-1, 0),
        }
    }

    /// Convert action to index for the Q-table's action axis
    pub fn to_index(self) -> usize {
        match self {
            Action::Right => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Up => 3,
        }
    }

    /// Create action from index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Arrow used when rendering a policy map
    pub fn symbol(self) -> char {
        match self {
            Action::Right => '→',
            Action::Down => '↓',
            Action::Left => '←',
            Action::Up => '↑',
        }
    }

    /// Number of discrete actions
    pub const fn action_space_size() -> usize {
        4
    }
}

impl TryFrom<usize> for Action {
    type Error = QGridError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(QGridError::InvalidAction(index))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Right => "right",
            Action::Down => "down",
            Action::Left => "left",
            Action::Up => "up",
        };
        write!(f, "{name}")
    }
}

/// A single step (s, a, r, s', done)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: GridPos,
    pub action: Action,
    pub reward: Reward,
    pub next_state: GridPos,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index_order() {
        assert_eq!(Action::Right.to_index(), 0);
        assert_eq!(Action::Down.to_index(), 1);
        assert_eq!(Action::Left.to_index(), 2);
        assert_eq!(Action::Up.to_index(), 3);
    }

    #[test]
    fn test_action_from_index() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert!(Action::from_index(4).is_none());
    }

    #[test]
    fn test_action_try_from_out_of_range() {
        let err = Action::try_from(7).unwrap_err();
        assert!(matches!(err, QGridError::InvalidAction(7)));
    }

    #[test]
    fn test_action_deltas() {
        assert_eq!(Action::Right.delta(), (0, 1));
        assert_eq!(Action::Down.delta(), (1, 0));
        assert_eq!(Action::Left.delta(), (0, -1));
        assert_eq!(Action::Up.delta(), (-1, 0));
    }

    #[test]
    fn test_action_space_size() {
        assert_eq!(Action::action_space_size(), Action::ALL.len());
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&Action::Left).unwrap();
        assert_eq!(json, "\"left\"");
        let parsed: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Action::Left);
    }

    #[test]
    fn test_grid_constants() {
        assert_eq!(START, GridPos::new(0, 0));
        assert_eq!(GOAL, GridPos::new(4, 4));
        assert_eq!(START.distance(GOAL), 8);
    }

    #[test]
    fn test_all_cells_row_major() {
        let cells: Vec<_> = GridPos::all().collect();
        assert_eq!(cells.len(), GRID_SIZE * GRID_SIZE);
        assert_eq!(cells[0], START);
        assert_eq!(cells[1], GridPos::new(0, 1));
        assert_eq!(cells[24], GOAL);
    }
}
