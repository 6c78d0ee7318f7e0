//! Environment traits and types

use serde::{Deserialize, Serialize};

use crate::{Action, ActionSpace, Reward, State, Terminal};

/// Result of a single environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    /// State after the step
    pub state: S,
    /// Reward signal
    pub reward: Reward,
    /// Whether the episode reached a terminal state
    pub done: bool,
}

impl<S> Step<S> {
    /// Create a new step result
    pub fn new(state: S, reward: impl Into<Reward>, done: bool) -> Self {
        Self {
            state,
            reward: reward.into(),
            done,
        }
    }
}

/// Episode information recorded by a training driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode ID
    pub id: String,
    /// Zero-based position of the episode in its run
    pub index: usize,
    /// Total reward
    pub total_reward: f64,
    /// Number of steps
    pub steps: usize,
    /// How the episode ended
    pub outcome: Terminal,
    /// Start time
    pub start_time: chrono::DateTime<chrono::Utc>,
    /// End time
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl Episode {
    /// Open a new episode record
    #[must_use]
    pub fn begin(index: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            index,
            total_reward: 0.0,
            steps: 0,
            outcome: Terminal::No,
            start_time: chrono::Utc::now(),
            end_time: None,
        }
    }

    /// Account for one transition
    pub fn record(&mut self, reward: Reward) {
        self.total_reward += reward.0;
        self.steps += 1;
    }

    /// Close the record with its outcome
    pub fn finish(&mut self, outcome: Terminal) {
        self.outcome = outcome;
        self.end_time = Some(chrono::Utc::now());
    }

    /// Whether the episode ended in a terminal state rather than a truncation
    #[must_use]
    pub fn reached_terminal(&self) -> bool {
        self.outcome == Terminal::Yes
    }
}

/// Core environment trait
///
/// Environments are synchronous state machines: `reset` puts the current
/// state back to the start, `step` applies one action and mutates the
/// current state before returning it.
pub trait Environment {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;
    /// Action space type
    type Space: ActionSpace<State = Self::State, Action = Self::Action>;

    /// Get the action space
    fn action_space(&self) -> Self::Space;

    /// Reset the environment and return the initial state
    fn reset(&mut self) -> crate::Result<Self::State>;

    /// Take a step in the environment
    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::State>>;

    /// The current state
    fn state(&self) -> &Self::State;

    /// Whether `state` is terminal
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Actions offered in `state`
    fn actions(&self, state: &Self::State) -> Vec<Self::Action> {
        self.action_space().actions(state)
    }

    /// Number of distinct states, if finite and known
    fn state_count(&self) -> Option<usize> {
        None
    }
}
