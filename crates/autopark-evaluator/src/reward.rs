//! Reward shaping: the fitness signal accumulated by every agent, tick by tick.
//!
//! Each call to [`Agent::reward_step`](crate::agent::Agent::reward_step) produces
//! a [`RewardBreakdown`] whose terms are computed in this order:
//!
//! 1. **Collision** - `collision_penalty` once, on the tick the collision is seen
//! 2. **Distance** - `(previous_distance - distance) * distance_multiplier`;
//!    approaching earns exactly what retreating costs
//! 3. **Heading** - `diff * angle_penalty_multiplier + (1 - diff / 180) * alignment_reward`
//!    where `diff` is the absolute heading difference to the spot
//! 4. **Speed** - `|speed| * speed_penalty_multiplier` while within one spot
//!    extent of the spot center
//! 5. **Parking** - `parking_bonus` when every [`ParkingCriteria`] holds
//! 6. **Almost parked** - a partial bonus scaled by closeness and alignment when
//!    near the spot, slow, and within [`ALMOST_PARKED_ANGLE_MARGIN`] of the angle
//!    tolerance
//! 7. **Stalled** - `stalled_penalty` every tick once the car has been stopped
//!    for more than the stall threshold
//! 8. **Step** - `step_penalty` every tick

use serde::{Deserialize, Serialize};

/// Extra degrees of heading error tolerated by the almost-parked bonus.
pub const ALMOST_PARKED_ANGLE_MARGIN: f32 = 10.0;

/// Fraction of the spot's larger side within which the almost-parked bonus applies.
pub const ALMOST_PARKED_RADIUS_FACTOR: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardParams {
    pub collision_penalty: f32,
    pub parking_bonus: f32,
    pub distance_multiplier: f32,
    pub angle_penalty_multiplier: f32,
    pub alignment_reward: f32,
    pub almost_parked_bonus: f32,
    pub speed_penalty_multiplier: f32,
    pub step_penalty: f32,
    pub stalled_penalty: f32,
    /// Absolute speed below which the car counts as stopped.
    pub stop_speed_threshold: f32,
    /// How long the car may stay stopped before the stalled penalty applies.
    pub stalled_seconds: f32,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            collision_penalty: -99.0,
            parking_bonus: 999_999.0,
            distance_multiplier: 5.0,
            angle_penalty_multiplier: -1.0,
            alignment_reward: 1.0,
            almost_parked_bonus: 300.0,
            speed_penalty_multiplier: 0.0,
            step_penalty: -1.0,
            stalled_penalty: -10.0,
            stop_speed_threshold: 0.1,
            stalled_seconds: 2.0,
        }
    }
}

impl RewardParams {
    /// Stall threshold in ticks for a simulation running at `tick_rate` ticks per second.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    #[must_use]
    pub fn stalled_tick_threshold(&self, tick_rate: u32) -> u32 {
        (self.stalled_seconds * tick_rate as f32).round().max(0.0) as u32
    }
}

/// Conditions that must all hold for a car to count as parked.
///
/// The car's body must also overlap the spot rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingCriteria {
    /// Absolute speed must be below this.
    pub min_velocity: f32,
    /// Heading difference to the spot must be below this many degrees.
    pub max_angle_diff: f32,
    /// Distance to the spot center must be below this.
    pub max_center_distance: f32,
}

impl Default for ParkingCriteria {
    fn default() -> Self {
        Self {
            min_velocity: 0.5,
            max_angle_diff: 15.0,
            max_center_distance: 22.5,
        }
    }
}

/// The terms that made up one tick's reward.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RewardBreakdown {
    pub collision: f32,
    pub distance: f32,
    pub heading: f32,
    pub speed: f32,
    pub parking: f32,
    pub almost_parked: f32,
    pub stalled: f32,
    pub step: f32,
}

impl RewardBreakdown {
    /// Sum of all terms, in `f64` so the parking bonus does not swallow the rest.
    #[must_use]
    pub fn total(&self) -> f64 {
        [
            self.collision,
            self.distance,
            self.heading,
            self.speed,
            self.parking,
            self.almost_parked,
            self.stalled,
            self.step,
        ]
        .into_iter()
        .map(f64::from)
        .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stalled_tick_threshold() {
        let params = RewardParams::default();
        assert_eq!(params.stalled_tick_threshold(60), 120);
        assert_eq!(params.stalled_tick_threshold(30), 60);
        let params = RewardParams {
            stalled_seconds: 0.5,
            ..RewardParams::default()
        };
        assert_eq!(params.stalled_tick_threshold(25), 13);
    }

    #[test]
    fn test_breakdown_total() {
        let breakdown = RewardBreakdown {
            collision: -99.0,
            distance: 2.5,
            heading: -10.0,
            step: -1.0,
            ..RewardBreakdown::default()
        };
        assert_eq!(breakdown.total(), -107.5);
        assert_eq!(RewardBreakdown::default().total(), 0.0);
    }
}
