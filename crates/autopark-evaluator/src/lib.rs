//! Per-agent evaluation for the parking trainer.
//!
//! Everything that happens to a single simulated vehicle within one tick lives
//! here:
//!
//! 1. **Observation** ([`observation`]) - the fixed-size, normalized view of the
//!    car and scenario fed to the controller
//! 2. **Policy** ([`policy`]) - turns an observation into one score per
//!    [`Action`](autopark_engine::Action); the highest score wins
//! 3. **Controller** ([`network`]) - the feedforward [`NeuralNet`](network::NeuralNet)
//!    policy evolved by the training crate
//! 4. **Reward** ([`reward`]) - the shaping function that turns the outcome of a
//!    tick into a scalar fitness contribution
//! 5. **Agent** ([`agent`]) - binds a policy to a [`Car`](autopark_engine::Car)
//!    and runs the per-tick `step` / `check_collisions` / `reward_step` sequence
//!
//! # Architecture
//!
//! ```text
//! Scenario + Car
//!     ↓ observe
//! Observation
//!     ↓ Policy::action_scores
//! ActionScores
//!     ↓ arg-max
//! Action → Car::apply_action + Car::integrate
//!     ↓
//! check_collisions → reward_step → running reward
//! ```
//!
//! The reward is the only feedback the genetic algorithm receives: collisions,
//! timeouts and successful parking are recorded as flags and reward terms, never
//! as errors.
//!
//! # Example
//!
//! ```
//! use autopark_engine::Scenario;
//! use autopark_evaluator::{
//!     agent::{Agent, AgentParams},
//!     network::{NetworkShape, NeuralNet},
//! };
//! use rand::SeedableRng as _;
//!
//! let scenario = Scenario::default();
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
//! let net = NeuralNet::random(NetworkShape::default(), &mut rng);
//! let mut agent = Agent::new(net, &scenario, AgentParams::default());
//!
//! for _ in 0..60 {
//!     agent.tick(&scenario);
//! }
//! assert!(agent.reward().is_finite());
//! ```

pub mod agent;
pub mod network;
pub mod observation;
pub mod policy;
pub mod reward;
