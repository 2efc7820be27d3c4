//! Action selection.
//!
//! A [`Policy`] maps an [`Observation`] to [`ActionScores`]; the chosen action is
//! the arg-max. Scores are unbounded and unnormalized since only their order
//! matters.

use autopark_engine::Action;

use crate::observation::Observation;

pub const ACTION_COUNT: usize = Action::LEN;

/// One score per [`Action`], indexed by [`Action::index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionScores(pub [f32; ACTION_COUNT]);

impl ActionScores {
    /// Scores that select `action` and nothing else.
    #[must_use]
    pub fn one_hot(action: Action) -> Self {
        let mut scores = [0.0; ACTION_COUNT];
        scores[action.index()] = 1.0;
        Self(scores)
    }

    /// The highest-scoring action; ties go to the lowest index.
    ///
    /// ```
    /// use autopark_engine::Action;
    /// use autopark_evaluator::policy::ActionScores;
    ///
    /// let scores = ActionScores([0.1, 0.7, 0.7, -2.0, 0.0]);
    /// assert_eq!(scores.best_action(), Action::AccelerateBackward);
    /// ```
    #[must_use]
    pub fn best_action(&self) -> Action {
        let mut best = 0;
        for (i, score) in self.0.iter().enumerate().skip(1) {
            if *score > self.0[best] {
                best = i;
            }
        }
        Action::ALL[best]
    }
}

/// Chooses actions from observations.
///
/// Implemented by the evolved [`NeuralNet`](crate::network::NeuralNet); tests and
/// scripted drivers can implement it directly.
pub trait Policy {
    fn action_scores(&self, observation: &Observation) -> ActionScores;
}

impl<P> Policy for &P
where
    P: Policy + ?Sized,
{
    fn action_scores(&self, observation: &Observation) -> ActionScores {
        (**self).action_scores(observation)
    }
}
