//! Error types for the maze RL libraries

use thiserror::Error;

/// Core error type for maze RL operations
#[derive(Error, Debug)]
pub enum RLError {
    /// The maze description text could not be parsed
    #[error("Malformed maze description at line {line}: {reason}")]
    MalformedMaze {
        /// 1-based line number among the non-blank lines
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// An action name outside the four canonical moves
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Grid dimensions that cannot hold a maze
    #[error("Invalid maze dimensions: {rows} rows x {cols} cols")]
    InvalidDimensions {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },

    /// A state outside the grid
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Border auto-detection found no opening and strict detection was requested
    #[error("No open segment on the {0} border")]
    NoBorderOpening(String),

    /// An action space returned no actions for a state
    #[error("Action space is empty")]
    EmptyActionSpace,

    /// A configuration value out of its allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RLError {
    /// Shorthand for a [`RLError::MalformedMaze`] error
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedMaze {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type alias for maze RL operations
pub type Result<T> = std::result::Result<T, RLError>;
