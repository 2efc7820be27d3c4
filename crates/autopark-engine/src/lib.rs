//! Static world model and vehicle kinematics for the parking trainer.
//!
//! - [`core`] - 2D vectors, angle helpers, oriented rectangles and the
//!   separating-axis overlap test
//! - [`engine`] - scenario geometry (bounds, parking spot, obstacles, spawn pose)
//!   and the kinematic [`Car`] model driven by discrete [`Action`]s

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ScenarioError {
    #[display("screen bounds must be positive and finite (got {width}x{height})")]
    InvalidBounds { width: f32, height: f32 },
    #[display("{what} extent must be positive and finite (got {width}x{height})")]
    InvalidExtent {
        what: &'static str,
        width: f32,
        height: f32,
    },
    #[display("{what} center ({x}, {y}) lies outside the screen bounds")]
    OutOfBounds { what: &'static str, x: f32, y: f32 },
}
