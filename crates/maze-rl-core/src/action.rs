//! Action representations and action spaces

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use crate::RLError;

/// Trait for actions in a tabular RL environment
///
/// Actions key the action-value table together with a state, so they must
/// be cheap to copy and hashable.
pub trait Action: Copy + Eq + Hash + Debug + Send + Sync {}

impl<T> Action for T where T: Copy + Eq + Hash + Debug + Send + Sync {}

/// Trait for defining the actions available in a state
pub trait ActionSpace: Send + Sync {
    /// The type of states the space is queried with
    type State;
    /// The type of actions in this space
    type Action: Action;

    /// Actions offered in `state`
    ///
    /// Offered does not mean unblocked: legality is decided by the
    /// environment's step function.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Sample an action uniformly from those offered in `state`
    fn sample<R: Rng + ?Sized>(&self, state: &Self::State, rng: &mut R) -> Option<Self::Action> {
        self.actions(state).choose(rng).copied()
    }
}

/// One of the four grid moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAction {
    /// Towards row 0
    Up,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// Towards the last column
    Right,
}

impl MoveAction {
    /// All moves in canonical order
    pub const ALL: [MoveAction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Canonical lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Row and column offsets of the move
    #[must_use]
    pub fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

impl Display for MoveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveAction {
    type Err = RLError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(RLError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        for action in MoveAction::ALL {
            assert_eq!(action.as_str().parse::<MoveAction>().unwrap(), action);
        }
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "jump".parse::<MoveAction>().unwrap_err();
        assert!(matches!(err, RLError::UnknownAction(name) if name == "jump"));
        // Matching is exact, no case folding
        assert!("Up".parse::<MoveAction>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&MoveAction::Left).unwrap();
        assert_eq!(json, "\"left\"");
    }
}
