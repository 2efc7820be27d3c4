use serde::{Deserialize, Serialize};

use crate::{
    core::{Collidable, OrientedRect, Vec2, wrap_heading},
    engine::scenario::Pose,
};

/// Steering is clamped to this magnitude before taking its tangent.
const MAX_TANGENT_ANGLE: f32 = 89.0;

/// Physical limits and rates of the kinematic model.
///
/// Rates are per tick; angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarParams {
    pub width: f32,
    /// Body length, also used as the wheelbase.
    pub length: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub braking: f32,
    pub turn_rate: f32,
    pub friction: f32,
    pub max_steering: f32,
    /// Below this speed (and steering) magnitude the car does not move or turn.
    pub motion_threshold: f32,
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            width: 30.0,
            length: 60.0,
            max_speed: 3.0,
            acceleration: 0.1,
            braking: 0.2,
            turn_rate: 2.0,
            friction: 0.05,
            max_steering: 40.0,
            motion_threshold: 0.1,
        }
    }
}

impl CarParams {
    /// Reverse is capped at half the forward top speed.
    #[must_use]
    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed / 2.0
    }
}

/// The five discrete controls an agent can choose from each tick.
///
/// The discriminant is the index of the corresponding controller output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Action {
    #[display("accelerate forward")]
    AccelerateForward = 0,
    #[display("accelerate backward")]
    AccelerateBackward = 1,
    #[display("steer left")]
    SteerLeft = 2,
    #[display("steer right")]
    SteerRight = 3,
    #[display("brake")]
    Brake = 4,
}

impl Action {
    pub const LEN: usize = 5;
    pub const ALL: [Self; Self::LEN] = [
        Self::AccelerateForward,
        Self::AccelerateBackward,
        Self::SteerLeft,
        Self::SteerRight,
        Self::Brake,
    ];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Kinematic state of one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    position: Vec2,
    heading: f32,
    speed: f32,
    steering: f32,
    width: f32,
    length: f32,
}

impl Car {
    /// A car at rest at `pose`, with the body dimensions from `params`.
    #[must_use]
    pub fn new(pose: Pose, params: &CarParams) -> Self {
        Self {
            position: pose.position,
            heading: pose.angle,
            speed: 0.0,
            steering: 0.0,
            width: params.width,
            length: params.length,
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Heading in degrees; `[0, 360)` once the car has turned at least once.
    #[must_use]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Signed forward speed (negative while reversing).
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Signed steering angle in degrees (negative = left).
    #[must_use]
    pub fn steering(&self) -> f32 {
        self.steering
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.heading)
    }

    /// Updates speed and steering for one tick.
    ///
    /// Friction applies whenever the action is neither an acceleration nor a
    /// brake; steering re-centers whenever the action is not a steer.
    pub fn apply_action(&mut self, action: Action, params: &CarParams) {
        self.speed = match action {
            Action::AccelerateForward => (self.speed + params.acceleration).min(params.max_speed),
            Action::AccelerateBackward => {
                (self.speed - params.acceleration).max(-params.max_reverse_speed())
            }
            Action::Brake => toward_zero(self.speed, params.braking),
            Action::SteerLeft | Action::SteerRight => toward_zero(self.speed, params.friction),
        };
        self.steering = match action {
            Action::SteerLeft => (self.steering - params.turn_rate).max(-params.max_steering),
            Action::SteerRight => (self.steering + params.turn_rate).min(params.max_steering),
            Action::AccelerateForward | Action::AccelerateBackward | Action::Brake => {
                toward_zero(self.steering, params.turn_rate / 2.0)
            }
        };
    }

    /// Moves the car along its heading, then turns it with a bicycle model.
    ///
    /// Nothing happens unless `|speed|` exceeds the motion threshold, and the
    /// heading only changes if `|steering|` exceeds it as well, so a car at
    /// crawling speed cannot turn on the spot even at full lock.
    pub fn integrate(&mut self, params: &CarParams) {
        if self.speed.abs() <= params.motion_threshold {
            return;
        }
        self.position += Vec2::from_heading(self.heading).scale(self.speed);
        if self.steering.abs() > params.motion_threshold {
            let radius = turning_radius(self.length, self.steering);
            self.heading = wrap_heading(self.heading + (self.speed / radius).to_degrees());
        }
    }
}

impl Collidable for Car {
    fn footprint(&self) -> OrientedRect {
        OrientedRect::new(self.position, self.heading, self.width, self.length)
    }
}

/// Signed turning radius of a bicycle model with the given wheelbase.
fn turning_radius(wheelbase: f32, steering: f32) -> f32 {
    let steering = steering.clamp(-MAX_TANGENT_ANGLE, MAX_TANGENT_ANGLE);
    wheelbase / steering.to_radians().tan()
}

/// Moves `value` toward zero by `step`, snapping to zero instead of crossing it.
fn toward_zero(value: f32, step: f32) -> f32 {
    if value.abs() > step {
        value - step.copysign(value)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car_at(x: f32, y: f32, heading: f32) -> Car {
        Car::new(Pose::new(Vec2::new(x, y), heading), &CarParams::default())
    }

    #[test]
    fn test_action_indices_round_trip() {
        for (i, action) in Action::ALL.into_iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(action));
        }
        assert_eq!(Action::from_index(Action::LEN), None);
    }

    #[test]
    fn test_forward_speed_is_clamped() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        for _ in 0..100 {
            car.apply_action(Action::AccelerateForward, &params);
        }
        assert_eq!(car.speed(), params.max_speed);
    }

    #[test]
    fn test_reverse_speed_is_half_of_forward() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        for _ in 0..100 {
            car.apply_action(Action::AccelerateBackward, &params);
        }
        assert_eq!(car.speed(), -1.5);
    }

    #[test]
    fn test_brake_snaps_to_zero() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        car.speed = 0.5;
        car.apply_action(Action::Brake, &params);
        assert!((car.speed() - 0.3).abs() < 1e-6);
        car.apply_action(Action::Brake, &params);
        car.apply_action(Action::Brake, &params);
        assert_eq!(car.speed(), 0.0);

        car.speed = -0.15;
        car.apply_action(Action::Brake, &params);
        assert_eq!(car.speed(), 0.0);
    }

    #[test]
    fn test_steering_applies_friction_and_clamps() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        car.speed = 1.0;
        for _ in 0..10 {
            car.apply_action(Action::SteerRight, &params);
        }
        assert_eq!(car.steering(), 20.0);
        assert!((car.speed() - (1.0 - 10.0 * params.friction)).abs() < 1e-4);

        for _ in 0..20 {
            car.apply_action(Action::SteerRight, &params);
        }
        assert_eq!(car.steering(), params.max_steering);
        assert_eq!(car.speed(), 0.0);

        for _ in 0..60 {
            car.apply_action(Action::SteerLeft, &params);
        }
        assert_eq!(car.steering(), -params.max_steering);
    }

    #[test]
    fn test_non_steer_actions_recenter_steering() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        car.steering = 3.0;
        car.apply_action(Action::AccelerateForward, &params);
        assert_eq!(car.steering(), 2.0);
        car.apply_action(Action::Brake, &params);
        assert_eq!(car.steering(), 1.0);
        car.apply_action(Action::AccelerateBackward, &params);
        assert_eq!(car.steering(), 0.0);
    }

    #[test]
    fn test_integrate_moves_along_heading() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        car.speed = 2.0;
        car.integrate(&params);
        assert_eq!(car.position(), Vec2::new(500.0, 498.0));

        let mut car = car_at(500.0, 500.0, 90.0);
        car.speed = -1.0;
        car.integrate(&params);
        assert!((car.position().x - 499.0).abs() < 1e-4);
        assert!((car.position().y - 500.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_motion_at_or_below_threshold() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        car.speed = 0.1;
        car.steering = params.max_steering;
        car.integrate(&params);
        assert_eq!(car.position(), Vec2::new(500.0, 500.0));
        assert_eq!(car.heading(), 0.0);
    }

    #[test]
    fn test_heading_requires_steering_above_threshold() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        car.speed = 2.0;
        car.steering = 0.05;
        car.integrate(&params);
        assert_eq!(car.heading(), 0.0);
    }

    #[test]
    fn test_bicycle_model_turn() {
        let params = CarParams::default();
        let mut car = car_at(500.0, 500.0, 0.0);
        car.speed = 3.0;
        car.steering = 40.0;
        car.integrate(&params);
        let expected = (3.0_f32 / (60.0 / 40.0_f32.to_radians().tan())).to_degrees();
        assert!((car.heading() - expected).abs() < 1e-4);

        // Left turn wraps below zero into [0, 360).
        let mut car = car_at(500.0, 500.0, 0.0);
        car.speed = 3.0;
        car.steering = -40.0;
        car.integrate(&params);
        assert!((car.heading() - (360.0 - expected)).abs() < 1e-3);
    }

    #[test]
    fn test_turning_radius_is_finite_near_right_angle() {
        assert!(turning_radius(60.0, 90.0).is_finite());
        assert!(turning_radius(60.0, -90.0).is_finite());
        assert!(turning_radius(60.0, 90.0) > 0.0);
    }

    #[test]
    fn test_footprint_uses_heading_and_body() {
        let car = car_at(100.0, 100.0, 0.0);
        let [front_left, _, rear_right, _] = car.corners();
        assert_eq!(front_left, Vec2::new(85.0, 70.0));
        assert_eq!(rear_right, Vec2::new(115.0, 130.0));
    }
}
