//! Episode loop and greedy evaluation

use std::ops::ControlFlow;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use maze_rl_core::{Agent, Environment, Episode, RLError, Result, Terminal, Trajectory, Transition};

/// Step limit used when the environment cannot report its size
const FALLBACK_STATE_COUNT: usize = 200;
/// Training episodes never get fewer steps than this
const MIN_TRAINING_STEPS: usize = 200;

/// Training loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,
    /// Step cap per training episode; `max(200, state count)` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_steps_per_episode: Option<usize>,
    /// Step cap for greedy evaluation; twice the state count when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_max_steps: Option<usize>,
    /// Episodes between progress logs; a tenth of the run when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_interval: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 2000,
            max_steps_per_episode: None,
            eval_max_steps: None,
            log_interval: None,
        }
    }
}

impl TrainingConfig {
    /// Reject explicit zero limits
    ///
    /// # Errors
    ///
    /// [`RLError::InvalidConfig`] for a zero step cap or log interval.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max_steps_per_episode", self.max_steps_per_episode),
            ("eval_max_steps", self.eval_max_steps),
            ("log_interval", self.log_interval),
        ] {
            if value == Some(0) {
                return Err(RLError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    /// Step cap per training episode for an environment with `state_count` states
    #[must_use]
    pub fn step_limit(&self, state_count: Option<usize>) -> usize {
        self.max_steps_per_episode.unwrap_or_else(|| {
            state_count.map_or(FALLBACK_STATE_COUNT, |n| n.max(MIN_TRAINING_STEPS))
        })
    }

    /// Step cap for greedy evaluation
    #[must_use]
    pub fn eval_limit(&self, state_count: Option<usize>) -> usize {
        self.eval_max_steps
            .unwrap_or_else(|| state_count.unwrap_or(FALLBACK_STATE_COUNT) * 2)
    }

    /// Episodes between progress logs, at least 1
    #[must_use]
    pub fn log_every(&self) -> usize {
        self.log_interval.unwrap_or(self.episodes / 10).max(1)
    }
}

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Episodes actually run
    pub episodes: usize,
    /// Episodes that reached a terminal state
    pub successes: usize,
    /// Mean undiscounted return per episode
    pub mean_reward: f64,
    /// Mean episode length
    pub mean_steps: f64,
    /// Exploration rate after the last episode
    pub final_epsilon: f64,
    /// Entries in the agent's value table
    pub table_size: usize,
    /// Environment steps across the run
    pub total_steps: usize,
    /// Wall-clock duration in seconds
    pub elapsed_secs: f64,
    /// Whether the episode callback stopped the run early
    pub interrupted: bool,
}

impl TrainingReport {
    /// Fraction of episodes that reached a terminal state
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successes as f64 / self.episodes as f64
        }
    }
}

/// Drives an agent through training episodes
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    /// Create a trainer
    ///
    /// # Errors
    ///
    /// [`RLError::InvalidConfig`] when the configuration fails validation.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The training configuration
    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every configured episode
    ///
    /// # Errors
    ///
    /// Propagates agent and environment errors.
    pub fn run<E, A>(&self, env: &mut E, agent: &mut A) -> Result<TrainingReport>
    where
        E: Environment,
        A: Agent<State = E::State, Action = E::Action>,
    {
        self.run_with(env, agent, |_| ControlFlow::Continue(()))
    }

    /// Run the configured episodes, handing each finished record to
    /// `on_episode`; returning [`ControlFlow::Break`] ends the run early
    ///
    /// # Errors
    ///
    /// Propagates agent and environment errors.
    #[allow(clippy::cast_precision_loss)]
    pub fn run_with<E, A, F>(
        &self,
        env: &mut E,
        agent: &mut A,
        mut on_episode: F,
    ) -> Result<TrainingReport>
    where
        E: Environment,
        A: Agent<State = E::State, Action = E::Action>,
        F: FnMut(&Episode) -> ControlFlow<()>,
    {
        let total = self.config.episodes;
        let max_steps = self.step_limit(env);
        let log_every = self.config.log_every();
        let started = Instant::now();

        info!(episodes = total, max_steps, "Starting training");

        let mut episodes = 0;
        let mut successes = 0;
        let mut reward_sum = 0.0;
        let mut total_steps = 0;
        let mut interrupted = false;

        for index in 0..total {
            let episode = self.run_episode(env, agent, index, max_steps)?;
            episodes += 1;
            total_steps += episode.steps;
            reward_sum += episode.total_reward;
            if episode.reached_terminal() {
                successes += 1;
            }

            debug!(
                episode = index,
                reward = episode.total_reward,
                steps = episode.steps,
                outcome = ?episode.outcome,
                "Episode finished"
            );
            if index > 0 && index % log_every == 0 {
                info!(
                    "Episode {}/{}, epsilon={:.3}",
                    index,
                    total,
                    agent.metrics().exploration_rate
                );
            }

            if on_episode(&episode).is_break() {
                interrupted = true;
                info!(episode = index, "Training stopped early");
                break;
            }
        }

        let metrics = agent.metrics();
        let (mean_reward, mean_steps) = if episodes == 0 {
            (0.0, 0.0)
        } else {
            (
                reward_sum / episodes as f64,
                total_steps as f64 / episodes as f64,
            )
        };
        let report = TrainingReport {
            episodes,
            successes,
            mean_reward,
            mean_steps,
            final_epsilon: metrics.exploration_rate,
            table_size: metrics.table_size,
            total_steps,
            elapsed_secs: started.elapsed().as_secs_f64(),
            interrupted,
        };

        info!(
            episodes = report.episodes,
            successes = report.successes,
            mean_reward = report.mean_reward,
            final_epsilon = report.final_epsilon,
            table_size = report.table_size,
            "Training complete"
        );
        Ok(report)
    }

    /// One episode: reset, then act, step and learn until the episode ends
    /// or `max_steps` transitions have been taken
    ///
    /// # Errors
    ///
    /// Propagates agent and environment errors.
    pub fn run_episode<E, A>(
        &self,
        env: &mut E,
        agent: &mut A,
        index: usize,
        max_steps: usize,
    ) -> Result<Episode>
    where
        E: Environment,
        A: Agent<State = E::State, Action = E::Action>,
    {
        let mut episode = Episode::begin(index);
        let mut state = env.reset()?;
        let mut outcome = Terminal::Truncated;

        for _ in 0..max_steps {
            let action = agent.act(&state)?;
            let step = env.step(action)?;
            let transition = Transition {
                state,
                action,
                reward: step.reward,
                next_state: step.state,
                done: step.done,
            };
            agent.observe(&transition)?;
            episode.record(transition.reward);

            state = transition.next_state;
            if transition.done {
                outcome = Terminal::Yes;
                break;
            }
        }

        agent.end_episode();
        episode.finish(outcome);
        Ok(episode)
    }

    /// Step cap for training episodes in `env`
    #[must_use]
    pub fn step_limit<E: Environment>(&self, env: &E) -> usize {
        self.config.step_limit(env.state_count())
    }

    /// Step cap for greedy evaluation in `env`
    #[must_use]
    pub fn eval_limit<E: Environment>(&self, env: &E) -> usize {
        self.config.eval_limit(env.state_count())
    }
}

/// Outcome of a greedy rollout
#[derive(Debug, Clone)]
pub struct Rollout<S, A> {
    /// State the rollout started from
    pub start: S,
    /// Transitions taken
    pub trajectory: Trajectory<S, A>,
    /// Whether a terminal state was reached within the step cap
    pub solved: bool,
}

impl<S: Clone, A> Rollout<S, A> {
    /// Visited states, starting state included
    #[must_use]
    pub fn path(&self) -> Vec<S> {
        if self.trajectory.is_empty() {
            vec![self.start.clone()]
        } else {
            self.trajectory.path()
        }
    }

    /// Number of transitions taken
    #[must_use]
    pub fn steps(&self) -> usize {
        self.trajectory.len()
    }
}

/// Follow the agent's greedy policy from a fresh reset without learning
///
/// # Errors
///
/// Propagates agent and environment errors.
pub fn evaluate_greedy<E, A>(
    env: &mut E,
    agent: &mut A,
    max_steps: usize,
) -> Result<Rollout<E::State, E::Action>>
where
    E: Environment,
    A: Agent<State = E::State, Action = E::Action>,
{
    let start = env.reset()?;
    let mut trajectory = Trajectory::new();
    let mut state = start.clone();
    let mut solved = false;

    for _ in 0..max_steps {
        let action = agent.greedy_action(&state)?;
        let step = env.step(action)?;
        let done = step.done;
        trajectory.push(Transition {
            state,
            action,
            reward: step.reward,
            next_state: step.state.clone(),
            done,
        });
        state = step.state;
        if done {
            solved = true;
            break;
        }
    }

    debug!(steps = trajectory.len(), solved, "Greedy rollout finished");
    Ok(Rollout {
        start,
        trajectory,
        solved,
    })
}
