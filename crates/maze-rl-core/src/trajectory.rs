//! Transitions and trajectories

use serde::{Deserialize, Serialize};

use crate::Reward;

/// Single transition in a trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S, A> {
    /// State the action was taken in
    pub state: S,
    /// Action taken
    pub action: A,
    /// Reward received
    pub reward: Reward,
    /// State after the action
    pub next_state: S,
    /// Whether the episode ended
    pub done: bool,
}

/// Ordered transitions of one episode
#[derive(Debug, Clone)]
pub struct Trajectory<S, A> {
    /// Sequence of transitions
    pub transitions: Vec<Transition<S, A>>,
    /// Total reward
    pub total_reward: f64,
}

impl<S, A> Trajectory<S, A> {
    /// Create a new empty trajectory
    #[must_use]
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            total_reward: 0.0,
        }
    }

    /// Add a transition to the trajectory
    pub fn push(&mut self, transition: Transition<S, A>) {
        self.total_reward += transition.reward.0;
        self.transitions.push(transition);
    }

    /// Get the length of the trajectory
    #[must_use]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if trajectory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Whether the last transition ended the episode
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.transitions.last().is_some_and(|t| t.done)
    }
}

impl<S: Clone, A> Trajectory<S, A> {
    /// States visited, starting with the first transition's origin
    #[must_use]
    pub fn path(&self) -> Vec<S> {
        let mut path = Vec::with_capacity(self.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.state.clone());
        }
        path.extend(self.transitions.iter().map(|t| t.next_state.clone()));
        path
    }
}

impl<S, A> Default for Trajectory<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
