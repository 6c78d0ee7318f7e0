//! State representations

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use crate::RLError;

/// Trait for states in a tabular RL environment
pub trait State: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T> State for T where T: Clone + Eq + Hash + Debug + Send + Sync {}

/// A grid cell, identified by row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row index, 0 at the top
    pub row: usize,
    /// Column index, 0 at the left
    pub col: usize,
}

impl Cell {
    /// Create a new cell
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the cell lies inside a `rows` x `cols` grid
    #[must_use]
    pub fn within(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `"row,col"`
impl FromStr for Cell {
    type Err = RLError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RLError::InvalidState(format!("expected \"row,col\", got {s:?}"));
        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        Ok(Self {
            row: row.trim().parse().map_err(|_| invalid())?,
            col: col.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminal {
    /// Not a terminal state
    No,
    /// Terminal state (episode ends)
    Yes,
    /// Truncated (step limit reached)
    Truncated,
}

impl Terminal {
    /// Check if the state is terminal (either Yes or Truncated)
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::No)
    }
}
