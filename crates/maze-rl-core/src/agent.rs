//! Agent traits and types

use serde::{Deserialize, Serialize};

use crate::{Action, State, Transition};

/// Core agent trait
///
/// A training driver calls [`Agent::act`] before every step,
/// [`Agent::observe`] after every step, and [`Agent::end_episode`] once per
/// completed episode.
pub trait Agent {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// Select an action for training (may explore)
    fn act(&mut self, state: &Self::State) -> crate::Result<Self::Action>;

    /// Select the best known action (never explores)
    fn greedy_action(&mut self, state: &Self::State) -> crate::Result<Self::Action>;

    /// Learn from one transition
    fn observe(&mut self, transition: &Transition<Self::State, Self::Action>) -> crate::Result<()>;

    /// Hook called once after every episode
    fn end_episode(&mut self) {}

    /// Get agent metrics
    fn metrics(&self) -> AgentMetrics {
        AgentMetrics::default()
    }
}

/// Agent metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    /// Total transitions observed
    pub total_steps: usize,
    /// Total episodes completed
    pub total_episodes: usize,
    /// Current exploration rate
    pub exploration_rate: f64,
    /// Number of entries in the value table
    pub table_size: usize,
}
