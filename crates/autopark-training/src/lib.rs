//! Training system that evolves parking controllers with a genetic algorithm.
//!
//! # How Training Works
//!
//! 1. **Population** - Seed a population of He-initialized neural networks
//! 2. **Simulation** - Bind every controller to an agent at the spawn pose and
//!    simulate a fixed number of ticks
//! 3. **Fitness** - Each agent's accumulated shaped reward is its fitness
//! 4. **Selection** - Rank by reward; the best is kept, the top fraction breeds
//! 5. **Reproduction** - Uniform crossover and Gaussian mutation fill the rest
//! 6. **Repeat** - For the configured number of generations
//!
//! # Architecture
//!
//! ```text
//! Scheduler (state machine)
//!     ↓ binds
//! Agents (autopark-evaluator) ← Scenario (autopark-engine)
//!     ↓ accumulate
//! Reward
//!     ↓ ranked
//! PopulationManager
//!     ↓ crossover + mutation
//! Next controllers
//! ```
//!
//! - [`weights`] - element-wise crossover and mutation on flat vectors
//! - [`genome`] - the [`Genome`](genome::Genome) trait applying them to controllers
//! - [`genetic`] - [`PopulationManager`](genetic::PopulationManager) and its parameters
//! - [`config`] - [`TrainingConfig`](config::TrainingConfig) and [`ConfigError`](config::ConfigError)
//! - [`scheduler`] - the [`Scheduler`](scheduler::Scheduler) driving generations
//!
//! # Example
//!
//! ```
//! use autopark_engine::Scenario;
//! use autopark_training::{config::TrainingConfig, scheduler::Scheduler};
//! use rand::SeedableRng as _;
//!
//! let mut config = TrainingConfig::default();
//! config.genetic.population_size = 8;
//! config.schedule.generation_count = 3;
//! config.schedule.seconds_per_generation = 1;
//!
//! let rng = rand_pcg::Pcg32::seed_from_u64(1);
//! let mut scheduler = Scheduler::new(config, Scenario::default(), rng).unwrap();
//! let summaries = scheduler.run().unwrap();
//!
//! assert_eq!(summaries.len(), 3);
//! assert_eq!(scheduler.evolution_count(), 2);
//! assert!(scheduler.state().is_done());
//! ```
//!
//! # Current Limitations
//!
//! - **Single scenario**: every generation is scored on one scenario, so
//!   controllers overfit to that layout
//! - **No persistence**: the evolved controllers live only as long as the
//!   process

pub mod config;
pub mod genetic;
pub mod genome;
pub mod scheduler;
pub mod weights;
