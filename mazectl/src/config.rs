// Run configuration file for mazectl

use anyhow::{Context, Result};
use maze_rl_agent::{QLearningConfig, TrainingConfig};
use maze_rl_core::Cell;
use maze_rl_env::MazeEnvConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a training run needs besides the maze itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Agent hyperparameters
    pub agent: QLearningConfig,
    /// Episode loop settings
    pub training: TrainingConfig,
    /// Endpoints and rewards
    pub environment: MazeEnvConfig,
}

impl RunConfig {
    /// Read a JSON run config, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.agent.validate()?;
        config.training.validate()?;
        Ok(config)
    }

    /// Command line flags win over file values
    pub fn apply_overrides(
        &mut self,
        episodes: Option<usize>,
        seed: Option<u64>,
        start: Option<Cell>,
        goal: Option<Cell>,
    ) {
        if let Some(episodes) = episodes {
            self.training.episodes = episodes;
        }
        if seed.is_some() {
            self.agent.seed = seed;
        }
        if start.is_some() {
            self.environment.start = start;
        }
        if goal.is_some() {
            self.environment.goal = goal;
        }
    }

    /// Copy of this config with a different agent seed
    pub fn with_seed(&self, seed: u64) -> Self {
        let mut config = self.clone();
        config.agent.seed = Some(seed);
        config
    }
}
