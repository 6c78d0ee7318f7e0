//! Tabular reinforcement learning agents for maze environments
//!
//! This crate provides:
//! - [`QLearningAgent`]: epsilon-greedy tabular Q-learning
//! - Exploration schedules
//! - [`Trainer`]: the episode loop driving an agent against an environment
//! - [`evaluate_greedy`]: exploration-free rollouts of a trained agent

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod q_learning;
pub mod training;
pub mod utils;

// Re-export agents
pub use q_learning::{QLearningAgent, QLearningConfig};

// Re-export the training driver
pub use training::{evaluate_greedy, Rollout, Trainer, TrainingConfig, TrainingReport};

// Re-export utilities
pub use utils::{ExponentialSchedule, Schedule};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        evaluate_greedy, QLearningAgent, QLearningConfig, Trainer, TrainingConfig,
        TrainingReport,
    };
    pub use maze_rl_core::prelude::*;
}
