//! The controller's view of the world.
//!
//! An [`Observation`] is a fixed vector of [`OBSERVATION_SIZE`] values, each
//! divided by a constant (top speed, 180 degrees, max steering, screen size) so
//! that typical values fall in roughly `[-1, 1]`:
//!
//! | index | value |
//! |---|---|
//! | 0 | speed / max speed |
//! | 1 | heading (normalized to (-180, 180]) / 180 |
//! | 2 | steering / max steering |
//! | 3 | (spot.x - car.x) / screen width |
//! | 4 | (spot.y - car.y) / screen height |
//! | 5 | heading difference to the spot, normalized / 180 |
//! | 6 | distance to the left edge / screen width |
//! | 7 | distance to the right edge / screen width |
//! | 8 | distance to the top edge / screen height |
//! | 9 | distance to the bottom edge / screen height |

use autopark_engine::{Car, CarParams, Scenario, normalize_angle};

pub const OBSERVATION_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation([f32; OBSERVATION_SIZE]);

impl Observation {
    #[must_use]
    pub const fn new(values: [f32; OBSERVATION_SIZE]) -> Self {
        Self(values)
    }

    /// Builds the observation of `car` in `scenario`.
    #[must_use]
    pub fn of(car: &Car, params: &CarParams, scenario: &Scenario) -> Self {
        let bounds = scenario.bounds;
        let position = car.position();
        let to_spot = scenario.spot.center - position;
        Self([
            car.speed() / params.max_speed,
            normalize_angle(car.heading()) / 180.0,
            car.steering() / params.max_steering,
            to_spot.x / bounds.width,
            to_spot.y / bounds.height,
            normalize_angle(scenario.spot.angle - car.heading()) / 180.0,
            position.x / bounds.width,
            (bounds.width - position.x) / bounds.width,
            position.y / bounds.height,
            (bounds.height - position.y) / bounds.height,
        ])
    }

    #[must_use]
    pub fn values(&self) -> &[f32; OBSERVATION_SIZE] {
        &self.0
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.0[0]
    }

    /// Normalized offset `(dx, dy)` from the car to the spot center.
    #[must_use]
    pub fn offset_to_spot(&self) -> (f32, f32) {
        (self.0[3], self.0[4])
    }

    #[must_use]
    pub fn heading_difference_to_spot(&self) -> f32 {
        self.0[5]
    }
}

#[cfg(test)]
mod tests {
    use autopark_engine::{Pose, Vec2};

    use super::*;

    #[test]
    fn test_observation_layout() {
        let scenario = Scenario::default();
        let params = CarParams::default();
        let car = Car::new(Pose::new(Vec2::new(300.0, 250.0), 270.0), &params);
        let obs = Observation::of(&car, &params, &scenario);
        let v = obs.values();

        assert_eq!(v[0], 0.0);
        assert_eq!(v[1], -0.5);
        assert_eq!(v[2], 0.0);
        assert_eq!(v[3], 450.0 / 1500.0);
        assert_eq!(v[4], 250.0 / 1000.0);
        // spot at 90 degrees, car at 270: half a turn apart
        assert_eq!(v[5], 1.0);
        assert_eq!(v[6], 0.2);
        assert_eq!(v[7], 0.8);
        assert_eq!(v[8], 0.25);
        assert_eq!(v[9], 0.75);

        assert_eq!(obs.speed(), v[0]);
        assert_eq!(obs.offset_to_spot(), (v[3], v[4]));
        assert_eq!(obs.heading_difference_to_spot(), v[5]);
    }

    #[test]
    fn test_observation_is_finite_at_extremes() {
        let scenario = Scenario::default();
        let params = CarParams::default();
        for (x, y, heading) in [
            (0.0, 0.0, -720.0),
            (1500.0, 1000.0, 720.0),
            (-1e6, 1e6, 180.0),
            (750.0, 500.0, 90.0),
        ] {
            let car = Car::new(Pose::new(Vec2::new(x, y), heading), &params);
            let obs = Observation::of(&car, &params, &scenario);
            assert!(obs.values().iter().all(|v| v.is_finite()), "{obs:?}");
        }
    }
}
