//! Perfect maze generation and the maze navigation environment
//!
//! This crate provides:
//! - A randomized Kruskal generator producing perfect mazes
//! - The wall-segment text format shared by generator and environment
//! - [`MazeEnv`], the grid world the learning agents train against

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod disjoint_set;
pub mod format;
pub mod generator;
pub mod geometry;
pub mod maze_env;

pub use disjoint_set::DisjointSet;
pub use format::MazeDescription;
pub use generator::{Maze, MazeGenerator};
pub use geometry::{RowCol, Segment, Xy};
pub use maze_env::{Endpoint, MazeActions, MazeEnv, MazeEnvConfig, MazeRewards};

// Re-export core types
pub use maze_rl_core::{Cell, Environment, MoveAction, Reward, Step};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Maze, MazeDescription, MazeEnv, MazeEnvConfig, MazeGenerator};
    pub use maze_rl_core::prelude::*;
}
