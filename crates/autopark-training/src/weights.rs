//! Element-wise operators on flat parameter vectors.
//!
//! A controller's weights and biases are stored as one contiguous `Vec<f32>`, so
//! the genetic operators never need to know the layer layout:
//!
//! - **Crossover**: [`uniform_crossover`] takes every element from one parent or
//!   the other with a fair coin flip per element
//! - **Mutation**: [`mutate`] adds Gaussian noise to a random subset of elements
//!
//! See [`genome`](crate::genome) for how these are applied to
//! [`NeuralNet`](autopark_evaluator::network::NeuralNet)s.

use rand::Rng;
use rand_distr::Normal;

/// Creates a vector by applying a function to each index.
///
/// ```
/// use autopark_training::weights;
///
/// let values = weights::from_fn(|i| i as f32 * 0.5, 3);
/// assert_eq!(values, vec![0.0, 0.5, 1.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Uniform crossover between two parent vectors.
///
/// Each element of the child is copied from `p1` or `p2` with probability 0.5,
/// independently of every other element. Values are never blended, and the
/// parents are left untouched.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn uniform_crossover<R>(p1: &[f32], p2: &[f32], rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len(), "parents must have the same length");
    from_fn(
        |i| if rng.random_bool(0.5) { p1[i] } else { p2[i] },
        p1.len(),
    )
}

/// Applies Gaussian mutation in place.
///
/// Each element is, with probability `rate`, shifted by a sample from
/// `N(0, sigma)`; the rest are left unchanged. The length never changes.
///
/// # Panics
///
/// Panics if `rate` is outside `[0, 1]` or `sigma` is negative or not finite.
pub fn mutate<R>(weights: &mut [f32], sigma: f32, rate: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).expect("mutation sigma must be finite and non-negative");
    for w in weights {
        if rng.random_bool(rate.into()) {
            *w += rng.sample(normal);
        }
    }
}
