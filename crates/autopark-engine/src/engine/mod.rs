//! Scenario geometry and vehicle kinematics.
//!
//! - [`Scenario`] - screen [`Bounds`], target [`ParkingSpot`], static [`Obstacle`]s
//!   and the spawn [`Pose`]; read-only while a generation runs
//! - [`Car`] - kinematic state of one vehicle, advanced by one [`Action`] per tick
//!   according to [`CarParams`]
//!
//! # Example
//!
//! ```
//! use autopark_engine::{Action, Car, CarParams, Scenario};
//!
//! let scenario = Scenario::default();
//! let params = CarParams::default();
//! let mut car = Car::new(scenario.spawn, &params);
//!
//! for _ in 0..10 {
//!     car.apply_action(Action::AccelerateForward, &params);
//!     car.integrate(&params);
//! }
//! assert!(car.speed() > 0.0);
//! ```

pub use self::{car::*, scenario::*};

mod car;
mod scenario;
