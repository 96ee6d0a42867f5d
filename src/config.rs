use std::path::Path;

use crate::common::defs::*;
use crate::envs::grid_world::GridWorld;
use crate::error::ConfigError;
use crate::mdps::mdp_simulator::MAX_EPISODE_STEPS;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: Discrete,
    pub terminal_states: Vec<State>,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            size: 6,
            terminal_states: vec![State::new(0, 1), State::new(5, 5)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    pub sweeps: usize,
    pub discount: Continous,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        ValueIterationConfig {
            sweeps: 10,
            discount: 1.,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PolicyIterationConfig {
    pub rounds: usize,
    pub evaluation_sweeps: usize,
    pub discount: Continous,
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        PolicyIterationConfig {
            rounds: 10,
            evaluation_sweeps: 10,
            discount: 1.,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub iterations: usize,
    pub discount: Continous,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        MonteCarloConfig {
            iterations: 1000,
            discount: 1.,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TdConfig {
    pub step_size: Continous,
    pub iterations: usize,
    pub discount: Continous,
}

impl Default for TdConfig {
    fn default() -> Self {
        TdConfig {
            step_size: 0.5,
            iterations: 500,
            discount: 1.,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub max_episode_steps: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            max_episode_steps: MAX_EPISODE_STEPS,
        }
    }
}

/// Top-level configuration, loadable from JSON.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub grid: GridConfig,
    pub value_iteration: ValueIterationConfig,
    pub policy_iteration: PolicyIterationConfig,
    pub monte_carlo: MonteCarloConfig,
    pub td: TdConfig,
    pub sampling: SamplingConfig,
    pub seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            grid: GridConfig::default(),
            value_iteration: ValueIterationConfig::default(),
            policy_iteration: PolicyIterationConfig::default(),
            monte_carlo: MonteCarloConfig::default(),
            td: TdConfig::default(),
            sampling: SamplingConfig::default(),
            seed: 2718,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        GridWorld::new(self.grid.size, &self.grid.terminal_states)?;

        for (name, discount) in [
            ("value_iteration.discount", self.value_iteration.discount),
            ("policy_iteration.discount", self.policy_iteration.discount),
            ("monte_carlo.discount", self.monte_carlo.discount),
            ("td.discount", self.td.discount),
        ] {
            if !(0.0..=1.0).contains(&discount) {
                return Err(ConfigError::Validation(format!("{name} must be in [0, 1]")));
            }
        }

        if !(self.td.step_size > 0.0 && self.td.step_size <= 1.0) {
            return Err(ConfigError::Validation(
                "td.step_size must be in (0, 1]".into(),
            ));
        }

        for (name, count) in [
            ("value_iteration.sweeps", self.value_iteration.sweeps),
            ("policy_iteration.rounds", self.policy_iteration.rounds),
            (
                "policy_iteration.evaluation_sweeps",
                self.policy_iteration.evaluation_sweeps,
            ),
            ("monte_carlo.iterations", self.monte_carlo.iterations),
            ("td.iterations", self.td.iterations),
            ("sampling.max_episode_steps", self.sampling.max_episode_steps),
        ] {
            if count == 0 {
                return Err(ConfigError::Validation(format!("{name} must be > 0")));
            }
        }

        Ok(())
    }

    pub fn grid_world(&self) -> Result<GridWorld, ConfigError> {
        Ok(GridWorld::new(self.grid.size, &self.grid.terminal_states)?)
    }
}
