//! Elitist genetic algorithm over neural-network controllers.
//!
//! The [`PopulationManager`] owns a fixed-size list of controllers. After every
//! generation the scheduler hands it the controllers ranked by final reward and
//! it builds the next list:
//!
//! 1. **Elitism** - the top controller is cloned unchanged into slot 0
//! 2. **Breeding pool** - the top `selection_fraction` of the ranking (at least
//!    one); a single-member pool is padded to two by duplication when the
//!    population has more than one member
//! 3. **Reproduction** - every remaining slot gets a child of two parents drawn
//!    uniformly from the pool with replacement (a parent may breed with
//!    itself), produced by uniform crossover and then mutated in place
//!
//! # Example
//!
//! ```
//! use autopark_evaluator::network::NetworkShape;
//! use autopark_training::genetic::{GeneticParams, PopulationManager, RankedController};
//! use rand::SeedableRng as _;
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
//! let params = GeneticParams {
//!     population_size: 10,
//!     ..GeneticParams::default()
//! };
//! let mut manager = PopulationManager::random(params, NetworkShape::new(8), &mut rng).unwrap();
//!
//! // pretend the last controller won
//! let mut ranked: Vec<_> = manager
//!     .controllers()
//!     .iter()
//!     .enumerate()
//!     .map(|(i, c)| RankedController::new(c.clone(), i as f64))
//!     .collect();
//! RankedController::sort_descending(&mut ranked);
//! let best = ranked[0].controller.clone();
//!
//! let next = manager.next_generation(&ranked, &mut rng);
//! assert_eq!(next.len(), 10);
//! assert_eq!(next[0], best);
//! ```
//!
//! # Current Limitations
//!
//! - **Fixed parameters**: mutation rate and sigma do not adapt to the
//!   population's state
//! - **Single elite**: only one controller survives unchanged, so a lucky
//!   controller that regresses in the next generation is lost

use autopark_evaluator::network::{NetworkShape, NeuralNet};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{config::ConfigError, genome::Genome};

/// Population size and reproduction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    pub population_size: usize,
    /// Share of the ranking that may breed, in `(0, 1]`.
    pub selection_fraction: f32,
    /// Per-parameter mutation probability, in `[0, 1]`.
    pub mutation_rate: f32,
    /// Standard deviation of the mutation noise.
    pub mutation_sigma: f32,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            selection_fraction: 0.2,
            mutation_rate: 0.15,
            mutation_sigma: 0.1,
        }
    }
}

impl GeneticParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(self.selection_fraction > 0.0 && self.selection_fraction <= 1.0) {
            return Err(ConfigError::InvalidSelectionFraction {
                value: self.selection_fraction,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate {
                value: self.mutation_rate,
            });
        }
        if !(self.mutation_sigma.is_finite() && self.mutation_sigma >= 0.0) {
            return Err(ConfigError::InvalidMutationSigma {
                value: self.mutation_sigma,
            });
        }
        Ok(())
    }

    /// Number of ranked controllers allowed to breed, before padding.
    ///
    /// `floor(population_size * selection_fraction)`, at least 1 and at most
    /// the population size.
    #[must_use]
    pub fn breeding_pool_size(&self) -> usize {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let size = (self.population_size as f32 * self.selection_fraction).floor() as usize;
        size.clamp(1, self.population_size.max(1))
    }
}

/// A controller together with the reward it earned in one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedController {
    pub controller: NeuralNet,
    pub reward: f64,
}

impl RankedController {
    #[must_use]
    pub fn new(controller: NeuralNet, reward: f64) -> Self {
        Self { controller, reward }
    }

    /// Sorts by reward, best first. The sort is stable, so equal rewards keep
    /// population order.
    pub fn sort_descending(ranked: &mut [Self]) {
        ranked.sort_by(|a, b| b.reward.total_cmp(&a.reward));
    }
}

/// Owns the controllers of the current generation.
#[derive(Debug, Clone)]
pub struct PopulationManager {
    params: GeneticParams,
    shape: NetworkShape,
    controllers: Vec<NeuralNet>,
}

impl PopulationManager {
    /// Seeds a population of He-initialized controllers.
    pub fn random<R>(
        params: GeneticParams,
        shape: NetworkShape,
        rng: &mut R,
    ) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        params.validate()?;
        if shape.hidden == 0 {
            return Err(ConfigError::ZeroHiddenWidth);
        }
        let controllers = (0..params.population_size)
            .map(|_| NeuralNet::random(shape, rng))
            .collect();
        Ok(Self {
            params,
            shape,
            controllers,
        })
    }

    /// Wraps an existing set of controllers.
    pub fn from_controllers(
        params: GeneticParams,
        controllers: Vec<NeuralNet>,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        if controllers.len() != params.population_size {
            return Err(ConfigError::PopulationSizeMismatch {
                expected: params.population_size,
                actual: controllers.len(),
            });
        }
        let shape = controllers[0].shape();
        if shape.hidden == 0 {
            return Err(ConfigError::ZeroHiddenWidth);
        }
        if let Some(index) = controllers.iter().position(|c| c.shape() != shape) {
            return Err(ConfigError::ShapeMismatch { index });
        }
        Ok(Self {
            params,
            shape,
            controllers,
        })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    #[must_use]
    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    #[must_use]
    pub fn controllers(&self) -> &[NeuralNet] {
        &self.controllers
    }

    #[must_use]
    pub fn into_controllers(self) -> Vec<NeuralNet> {
        self.controllers
    }

    /// Replaces the population with the offspring of `ranked`.
    ///
    /// # Arguments
    ///
    /// * `ranked` - every controller of the finished generation with its reward,
    ///   sorted descending by reward
    ///
    /// # Returns
    ///
    /// The new population: `[elite, child_1, ..., child_(n-1)]`
    pub fn next_generation<R>(&mut self, ranked: &[RankedController], rng: &mut R) -> &[NeuralNet]
    where
        R: Rng + ?Sized,
    {
        let size = self.params.population_size;
        assert_eq!(ranked.len(), size, "ranking must cover the whole population");
        assert!(
            ranked.is_sorted_by(|a, b| a.reward >= b.reward),
            "ranking must be sorted by reward, best first"
        );

        let mut next = Vec::with_capacity(size);

        // elite selection
        next.push(ranked[0].controller.clone());

        let mut pool: Vec<&NeuralNet> = ranked[..self.params.breeding_pool_size()]
            .iter()
            .map(|r| &r.controller)
            .collect();
        if size > 1 {
            while pool.len() < 2 {
                let extra = pool[rng.random_range(0..pool.len())];
                pool.push(extra);
            }
        }

        while next.len() < size {
            let p1 = pool[rng.random_range(0..pool.len())];
            let p2 = pool[rng.random_range(0..pool.len())];
            let mut child = p1.crossover(p2, rng);
            child.mutate(self.params.mutation_rate, self.params.mutation_sigma, rng);
            next.push(child);
        }

        self.controllers = next;
        &self.controllers
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn params(population_size: usize) -> GeneticParams {
        GeneticParams {
            population_size,
            ..GeneticParams::default()
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn rank_by_index(manager: &PopulationManager) -> Vec<RankedController> {
        let mut ranked: Vec<_> = manager
            .controllers()
            .iter()
            .enumerate()
            .map(|(i, c)| RankedController::new(c.clone(), -(i as f64)))
            .collect();
        RankedController::sort_descending(&mut ranked);
        ranked
    }

    #[test]
    fn test_breeding_pool_size() {
        assert_eq!(params(50).breeding_pool_size(), 10);
        assert_eq!(params(4).breeding_pool_size(), 1);
        assert_eq!(params(1).breeding_pool_size(), 1);
        let all = GeneticParams {
            selection_fraction: 1.0,
            ..params(7)
        };
        assert_eq!(all.breeding_pool_size(), 7);
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        assert_eq!(params(0).validate(), Err(ConfigError::EmptyPopulation));
        let p = GeneticParams {
            selection_fraction: 0.0,
            ..params(10)
        };
        assert!(matches!(
            p.validate(),
            Err(ConfigError::InvalidSelectionFraction { .. })
        ));
        let p = GeneticParams {
            mutation_rate: 1.5,
            ..params(10)
        };
        assert!(matches!(
            p.validate(),
            Err(ConfigError::InvalidMutationRate { .. })
        ));
        let p = GeneticParams {
            mutation_sigma: f32::NAN,
            ..params(10)
        };
        assert!(matches!(
            p.validate(),
            Err(ConfigError::InvalidMutationSigma { .. })
        ));
    }

    #[test]
    fn test_random_population_fails_fast() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert!(PopulationManager::random(params(0), NetworkShape::new(4), &mut rng).is_err());
        assert_eq!(
            PopulationManager::random(params(3), NetworkShape::new(0), &mut rng).err(),
            Some(ConfigError::ZeroHiddenWidth)
        );
    }

    #[test]
    fn test_from_controllers_checks_size() {
        let mut rng = Pcg32::seed_from_u64(0);
        let nets = vec![NeuralNet::random(NetworkShape::new(4), &mut rng); 2];
        assert_eq!(
            PopulationManager::from_controllers(params(3), nets).err(),
            Some(ConfigError::PopulationSizeMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_from_controllers_checks_shapes() {
        let mut rng = Pcg32::seed_from_u64(0);
        let nets = vec![
            NeuralNet::random(NetworkShape::new(4), &mut rng),
            NeuralNet::random(NetworkShape::new(5), &mut rng),
        ];
        assert_eq!(
            PopulationManager::from_controllers(params(2), nets).err(),
            Some(ConfigError::ShapeMismatch { index: 1 })
        );
    }

    #[test]
    fn test_next_generation_keeps_size_and_elite() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut manager = PopulationManager::random(params(20), NetworkShape::new(8), &mut rng).unwrap();
        for _ in 0..5 {
            let ranked = rank_by_index(&manager);
            let top = ranked[0].controller.clone();
            let next = manager.next_generation(&ranked, &mut rng);
            assert_eq!(next.len(), 20);
            // bit-for-bit copy of the top performer
            let same_bits = next[0]
                .params()
                .iter()
                .zip(top.params())
                .all(|(a, b)| a.to_bits() == b.to_bits());
            assert!(same_bits);
            assert!(next.iter().all(|c| c.shape() == NetworkShape::new(8)));
        }
    }

    #[test]
    fn test_single_member_population() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut manager = PopulationManager::random(params(1), NetworkShape::new(4), &mut rng).unwrap();
        let ranked = rank_by_index(&manager);
        let next = manager.next_generation(&ranked, &mut rng);
        assert_eq!(next, [ranked[0].controller.clone()]);
    }

    #[test]
    fn test_children_descend_from_pool() {
        let mut rng = Pcg32::seed_from_u64(7);
        let shape = NetworkShape::new(2);
        // two distinct constant controllers and two others that never breed
        let nets: Vec<_> = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .map(|v| NeuralNet::from_params(shape, vec![*v; shape.param_count()]))
            .collect();
        let params = GeneticParams {
            population_size: 4,
            selection_fraction: 0.5,
            mutation_rate: 0.0,
            ..GeneticParams::default()
        };
        let mut manager = PopulationManager::from_controllers(params, nets).unwrap();
        let ranked = rank_by_index(&manager);
        let next = manager.next_generation(&ranked, &mut rng);
        for child in &next[1..] {
            assert!(child.params().iter().all(|p| *p == 1.0 || *p == 2.0));
        }
    }

    #[test]
    #[should_panic(expected = "sorted")]
    fn test_unsorted_ranking_panics() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut manager = PopulationManager::random(params(3), NetworkShape::new(4), &mut rng).unwrap();
        let mut ranked = rank_by_index(&manager);
        ranked.reverse();
        manager.next_generation(&ranked, &mut rng);
    }
}
