//! Run configuration.
//!
//! Every knob of a training run is collected in [`TrainingConfig`]. All sections
//! are `#[serde(default)]`, so a TOML file only needs to name the values it
//! changes:
//!
//! ```
//! use autopark_training::config::TrainingConfig;
//!
//! let config: TrainingConfig = toml::from_str(
//!     r#"
//!     [genetic]
//!     population_size = 20
//!
//!     [schedule]
//!     generation_count = 5
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.genetic.population_size, 20);
//! assert_eq!(config.genetic.mutation_rate, 0.15);
//! assert_eq!(config.schedule.tick_budget(), 480);
//! config.validate().unwrap();
//! ```

use autopark_engine::{CarParams, ScenarioError};
use autopark_evaluator::{
    agent::AgentParams,
    network::NetworkShape,
    reward::{ParkingCriteria, RewardParams},
};
use serde::{Deserialize, Serialize};

use crate::genetic::GeneticParams;

/// A construction-time configuration problem.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("selection fraction must be in (0, 1] (got {value})")]
    InvalidSelectionFraction { value: f32 },
    #[display("mutation rate must be in [0, 1] (got {value})")]
    InvalidMutationRate { value: f32 },
    #[display("mutation sigma must be finite and non-negative (got {value})")]
    InvalidMutationSigma { value: f32 },
    #[display("hidden layer width must be at least 1")]
    ZeroHiddenWidth,
    #[display("expected {expected} controllers, got {actual}")]
    PopulationSizeMismatch { expected: usize, actual: usize },
    #[display("controller {index} does not match the configured network shape")]
    ShapeMismatch { index: usize },
    #[display("population network shape {actual:?} does not match the configured {expected:?}")]
    NetworkShapeMismatch {
        expected: NetworkShape,
        actual: NetworkShape,
    },
    #[display("generation count must be at least 1")]
    ZeroGenerations,
    #[display("a generation must last at least one tick")]
    ZeroTickBudget,
    #[display("invalid scenario: {_0}")]
    #[from]
    Scenario(#[error(source)] ScenarioError),
}

/// Generation length and count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleParams {
    pub generation_count: usize,
    /// Simulation ticks per simulated second.
    pub tick_rate: u32,
    pub seconds_per_generation: u32,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            generation_count: 200,
            tick_rate: 60,
            seconds_per_generation: 8,
        }
    }
}

impl ScheduleParams {
    /// Ticks simulated per generation unless every agent stops early.
    #[must_use]
    pub fn tick_budget(&self) -> u32 {
        self.tick_rate.saturating_mul(self.seconds_per_generation)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub genetic: GeneticParams,
    pub network: NetworkShape,
    pub schedule: ScheduleParams,
    pub car: CarParams,
    pub reward: RewardParams,
    pub parking: ParkingCriteria,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.genetic.validate()?;
        if self.network.hidden == 0 {
            return Err(ConfigError::ZeroHiddenWidth);
        }
        if self.schedule.generation_count == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.schedule.tick_budget() == 0 {
            return Err(ConfigError::ZeroTickBudget);
        }
        Ok(())
    }

    /// Per-agent settings, with the stall threshold converted to ticks.
    #[must_use]
    pub fn agent_params(&self) -> AgentParams {
        AgentParams {
            car: self.car,
            reward: self.reward,
            parking: self.parking,
            stalled_tick_threshold: self.reward.stalled_tick_threshold(self.schedule.tick_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrainingConfig::default();
        config.validate().unwrap();
        assert_eq!(config.genetic.population_size, 50);
        assert_eq!(config.network.hidden, 64);
        assert_eq!(config.schedule.tick_budget(), 8 * 60);
        assert_eq!(config.agent_params().stalled_tick_threshold, 120);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let mut config = TrainingConfig::default();
        config.genetic.population_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));

        let mut config = TrainingConfig::default();
        config.network.hidden = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroHiddenWidth));

        let mut config = TrainingConfig::default();
        config.schedule.generation_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroGenerations));

        let mut config = TrainingConfig::default();
        config.schedule.seconds_per_generation = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickBudget));
    }

    #[test]
    fn test_toml_round_trip_keeps_values() {
        let mut config = TrainingConfig::default();
        config.genetic.mutation_sigma = 0.25;
        config.car.max_speed = 4.0;
        let text = toml::to_string(&config).unwrap();
        let parsed: TrainingConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let parsed: TrainingConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, TrainingConfig::default());
    }

    #[test]
    fn test_scenario_error_converts() {
        let err = ConfigError::from(ScenarioError::InvalidBounds {
            width: 0.0,
            height: 10.0,
        });
        assert!(matches!(err, ConfigError::Scenario(_)));
        assert!(err.to_string().starts_with("invalid scenario"));
    }
}
