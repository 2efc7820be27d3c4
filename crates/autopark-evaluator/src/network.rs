//! Feedforward controller: observation → tanh hidden layer → linear scores.
//!
//! ```text
//! scores = tanh(observation · W_ih + b_h) · W_ho + b_o
//! ```
//!
//! Input and output widths are fixed ([`OBSERVATION_SIZE`], [`ACTION_COUNT`]);
//! the hidden width comes from [`NetworkShape`] and is shared by every
//! controller of a run.
//!
//! All parameters live in one flat vector so that genetic operators can treat
//! a controller as a plain weight vector:
//!
//! ```text
//! [ W_ih (input × hidden, row-major) | b_h (hidden) | W_ho (hidden × output, row-major) | b_o (output) ]
//! ```

use std::ops::Range;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::{
    observation::{OBSERVATION_SIZE, Observation},
    policy::{ACTION_COUNT, ActionScores, Policy},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkShape {
    pub hidden: usize,
}

impl Default for NetworkShape {
    fn default() -> Self {
        Self { hidden: 64 }
    }
}

impl NetworkShape {
    #[must_use]
    pub const fn new(hidden: usize) -> Self {
        Self { hidden }
    }

    /// Total number of weights and biases.
    #[must_use]
    pub const fn param_count(&self) -> usize {
        self.b_o().end
    }

    const fn w_ih(&self) -> Range<usize> {
        0..OBSERVATION_SIZE * self.hidden
    }

    const fn b_h(&self) -> Range<usize> {
        let start = self.w_ih().end;
        start..start + self.hidden
    }

    const fn w_ho(&self) -> Range<usize> {
        let start = self.b_h().end;
        start..start + self.hidden * ACTION_COUNT
    }

    const fn b_o(&self) -> Range<usize> {
        let start = self.w_ho().end;
        start..start + ACTION_COUNT
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNet {
    shape: NetworkShape,
    params: Vec<f32>,
}

impl NeuralNet {
    /// He-initialized weights (`N(0, 2 / fan_in)`) with zero biases.
    ///
    /// # Panics
    ///
    /// Panics if `shape.hidden` is zero.
    #[must_use]
    pub fn random<R>(shape: NetworkShape, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(shape.hidden > 0, "hidden layer must not be empty");
        let mut params = vec![0.0; shape.param_count()];
        fill_he(&mut params[shape.w_ih()], OBSERVATION_SIZE, rng);
        fill_he(&mut params[shape.w_ho()], shape.hidden, rng);
        Self { shape, params }
    }

    /// Rebuilds a controller from a flat parameter vector.
    ///
    /// # Panics
    ///
    /// Panics if `params.len()` does not match `shape.param_count()`.
    #[must_use]
    pub fn from_params(shape: NetworkShape, params: Vec<f32>) -> Self {
        assert_eq!(
            params.len(),
            shape.param_count(),
            "parameter count does not match network shape"
        );
        Self { shape, params }
    }

    #[must_use]
    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    #[must_use]
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Mutable access to the flat parameters; the length cannot change.
    pub fn params_mut(&mut self) -> &mut [f32] {
        &mut self.params
    }

    #[must_use]
    pub fn input_hidden_weights(&self) -> &[f32] {
        &self.params[self.shape.w_ih()]
    }

    #[must_use]
    pub fn hidden_biases(&self) -> &[f32] {
        &self.params[self.shape.b_h()]
    }

    #[must_use]
    pub fn hidden_output_weights(&self) -> &[f32] {
        &self.params[self.shape.w_ho()]
    }

    #[must_use]
    pub fn output_biases(&self) -> &[f32] {
        &self.params[self.shape.b_o()]
    }

    /// Forward pass.
    #[must_use]
    pub fn feedforward(&self, observation: &Observation) -> ActionScores {
        let hidden_width = self.shape.hidden;
        let w_ih = self.input_hidden_weights();
        let w_ho = self.hidden_output_weights();

        let mut hidden = self.hidden_biases().to_vec();
        for (row, &x) in w_ih.chunks_exact(hidden_width).zip(observation.values()) {
            for (h, &w) in hidden.iter_mut().zip(row) {
                *h += x * w;
            }
        }
        for h in &mut hidden {
            *h = h.tanh();
        }

        let mut output = [0.0; ACTION_COUNT];
        output.copy_from_slice(self.output_biases());
        for (row, &h) in w_ho.chunks_exact(ACTION_COUNT).zip(&hidden) {
            for (o, &w) in output.iter_mut().zip(row) {
                *o += h * w;
            }
        }
        ActionScores(output)
    }
}

impl Policy for NeuralNet {
    fn action_scores(&self, observation: &Observation) -> ActionScores {
        self.feedforward(observation)
    }
}

#[expect(clippy::cast_precision_loss)]
fn fill_he<R>(values: &mut [f32], fan_in: usize, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let std_dev = (2.0 / fan_in as f32).sqrt();
    let normal = Normal::new(0.0, std_dev).expect("standard deviation is finite and positive");
    for v in values {
        *v = normal.sample(rng);
    }
}
