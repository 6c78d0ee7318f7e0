//! Tabular Q-learning with epsilon-greedy exploration

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use maze_rl_core::{ActionSpace, Agent, AgentMetrics, QTable, RLError, Result, State, Transition};

use crate::utils::ExponentialSchedule;

/// Q-learning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Exploration floor
    pub epsilon_min: f64,
    /// Exploration decay per episode
    pub epsilon_decay: f64,
    /// Random seed for exploration and tie-breaking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.99,
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.999,
            seed: None,
        }
    }
}

impl QLearningConfig {
    /// Check every parameter lies in its range
    ///
    /// # Errors
    ///
    /// [`RLError::InvalidConfig`] naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(RLError::InvalidConfig(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !unit.contains(&self.gamma) {
            return Err(RLError::InvalidConfig(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if !unit.contains(&self.epsilon) {
            return Err(RLError::InvalidConfig(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !unit.contains(&self.epsilon_min) {
            return Err(RLError::InvalidConfig(format!(
                "epsilon_min must be in [0, 1], got {}",
                self.epsilon_min
            )));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(RLError::InvalidConfig(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            )));
        }
        Ok(())
    }

    /// Exploration rate as a function of completed episodes
    #[must_use]
    pub fn epsilon_schedule(&self) -> ExponentialSchedule {
        ExponentialSchedule::new(self.epsilon, self.epsilon_min, self.epsilon_decay)
    }
}

/// Tabular Q-learning agent
///
/// Owns its Q-table; one agent belongs to exactly one training run.
pub struct QLearningAgent<S: ActionSpace> {
    config: QLearningConfig,
    epsilon: f64,
    action_space: S,
    table: QTable<S::State, S::Action>,
    rng: StdRng,
    metrics: AgentMetrics,
}

impl<S> QLearningAgent<S>
where
    S: ActionSpace,
    S::State: State,
{
    /// Create a new agent over `action_space`
    ///
    /// # Errors
    ///
    /// [`RLError::InvalidConfig`] when the configuration fails validation.
    pub fn new(action_space: S, config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Ok(Self {
            epsilon: config.epsilon,
            config,
            action_space,
            table: QTable::new(),
            rng,
            metrics: AgentMetrics::default(),
        })
    }

    /// Q(state, action), 0.0 if never written
    #[must_use]
    pub fn get_q(&self, state: &S::State, action: &S::Action) -> f64 {
        self.table.get(state, action)
    }

    /// Highest-valued action in `state`, ties broken uniformly at random
    ///
    /// # Errors
    ///
    /// [`RLError::EmptyActionSpace`] when no action is offered in `state`.
    pub fn best_action(&mut self, state: &S::State) -> Result<S::Action> {
        let actions = self.action_space.actions(state);
        let best = self.table.argmax(state, &actions);
        best.choose(&mut self.rng)
            .copied()
            .ok_or(RLError::EmptyActionSpace)
    }

    /// Epsilon-greedy action selection
    ///
    /// # Errors
    ///
    /// [`RLError::EmptyActionSpace`] when no action is offered in `state`.
    pub fn choose_action(&mut self, state: &S::State) -> Result<S::Action> {
        if self.rng.gen::<f64>() < self.epsilon {
            return self
                .action_space
                .sample(state, &mut self.rng)
                .ok_or(RLError::EmptyActionSpace);
        }
        self.best_action(state)
    }

    /// One-step Q-learning update
    ///
    /// `Q(s,a) += alpha * (target - Q(s,a))` where the target is `reward`
    /// for a terminal transition and `reward + gamma * max_a' Q(s',a')`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// [`RLError::EmptyActionSpace`] when a non-terminal `next_state` offers
    /// no action.
    pub fn update(
        &mut self,
        state: &S::State,
        action: S::Action,
        reward: f64,
        next_state: &S::State,
        done: bool,
    ) -> Result<()> {
        let current = self.table.get(state, &action);
        let target = if done {
            reward
        } else {
            let next_actions = self.action_space.actions(next_state);
            let max_next = self
                .table
                .max_value(next_state, &next_actions)
                .ok_or(RLError::EmptyActionSpace)?;
            reward + self.config.gamma * max_next
        };

        let updated = current + self.config.alpha * (target - current);
        self.table.set(state.clone(), action, updated);
        Ok(())
    }

    /// Multiply epsilon by the decay factor, not going below the floor
    pub fn decay_epsilon(&mut self) {
        if self.epsilon > self.config.epsilon_min {
            self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);
        }
    }

    /// Current exploration rate
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration rate, clamped to [0, 1]
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// Configuration the agent was built with
    #[must_use]
    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// The learned action-value table
    #[must_use]
    pub fn table(&self) -> &QTable<S::State, S::Action> {
        &self.table
    }
}

impl<S> Agent for QLearningAgent<S>
where
    S: ActionSpace,
    S::State: State,
{
    type State = S::State;
    type Action = S::Action;

    fn act(&mut self, state: &Self::State) -> Result<Self::Action> {
        self.choose_action(state)
    }

    fn greedy_action(&mut self, state: &Self::State) -> Result<Self::Action> {
        self.best_action(state)
    }

    fn observe(&mut self, transition: &Transition<Self::State, Self::Action>) -> Result<()> {
        self.metrics.total_steps += 1;
        self.update(
            &transition.state,
            transition.action,
            transition.reward.value(),
            &transition.next_state,
            transition.done,
        )
    }

    fn end_episode(&mut self) {
        self.metrics.total_episodes += 1;
        self.decay_epsilon();
    }

    fn metrics(&self) -> AgentMetrics {
        AgentMetrics {
            exploration_rate: self.epsilon,
            table_size: self.table.len(),
            ..self.metrics.clone()
        }
    }
}
