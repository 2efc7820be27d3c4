//! Genetic operators on whole controllers.

use autopark_evaluator::network::NeuralNet;
use rand::Rng;

use crate::weights;

/// A controller that can be bred and mutated.
pub trait Genome: Clone {
    /// Produces a child by uniform crossover; neither parent is modified.
    #[must_use]
    fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized;

    /// Adds `N(0, sigma)` noise to each parameter with probability `rate`.
    fn mutate<R>(&mut self, rate: f32, sigma: f32, rng: &mut R)
    where
        R: Rng + ?Sized;
}

impl Genome for NeuralNet {
    fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert_eq!(
            self.shape(),
            other.shape(),
            "cannot cross controllers of different shapes"
        );
        let params = weights::uniform_crossover(self.params(), other.params(), rng);
        NeuralNet::from_params(self.shape(), params)
    }

    fn mutate<R>(&mut self, rate: f32, sigma: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        weights::mutate(self.params_mut(), sigma, rate, rng);
    }
}

#[cfg(test)]
mod tests {
    use autopark_evaluator::network::NetworkShape;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_crossover_child_inherits_every_element() {
        let mut rng = Pcg32::seed_from_u64(10);
        let shape = NetworkShape::new(8);
        let a = NeuralNet::random(shape, &mut rng);
        let b = NeuralNet::random(shape, &mut rng);
        let (a_before, b_before) = (a.clone(), b.clone());

        let child = a.crossover(&b, &mut rng);
        assert_eq!(child.shape(), shape);
        for ((c, x), y) in child.params().iter().zip(a.params()).zip(b.params()) {
            assert!(c == x || c == y);
        }
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_mutate_keeps_shape() {
        let mut rng = Pcg32::seed_from_u64(11);
        let shape = NetworkShape::new(16);
        let mut net = NeuralNet::random(shape, &mut rng);
        let before = net.clone();
        net.mutate(0.15, 0.1, &mut rng);
        assert_eq!(net.shape(), shape);
        assert_eq!(net.params().len(), shape.param_count());
        assert_ne!(net, before);
    }

    #[test]
    fn test_clone_shares_no_storage() {
        let mut rng = Pcg32::seed_from_u64(12);
        let original = NeuralNet::random(NetworkShape::new(4), &mut rng);
        let mut copy = original.clone();
        copy.mutate(1.0, 1.0, &mut rng);
        assert_ne!(copy.params(), original.params());
    }
}
