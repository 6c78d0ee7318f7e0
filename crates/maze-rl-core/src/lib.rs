//! Core reinforcement learning traits and types for grid mazes
//!
//! This crate provides the shared vocabulary of the maze RL workspace:
//! states, actions, rewards, the environment and agent contracts, and the
//! tabular action-value store the learning agents write into.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod agent;
pub mod environment;
pub mod error;
pub mod reward;
pub mod state;
pub mod trajectory;
pub mod value;

// Re-export core traits and types
pub use action::{Action, ActionSpace, MoveAction};
pub use agent::{Agent, AgentMetrics};
pub use environment::{Environment, Episode, Step};
pub use error::{RLError, Result};
pub use reward::Reward;
pub use state::{Cell, State, Terminal};
pub use trajectory::{Trajectory, Transition};
pub use value::QTable;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, ActionSpace, Agent, Cell, Environment, MoveAction, QTable, Result, Reward,
        State, Step, Transition,
    };
}
