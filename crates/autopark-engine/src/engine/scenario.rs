use serde::{Deserialize, Serialize};

use crate::{
    ScenarioError,
    core::{Collidable, OrientedRect, Vec2},
};

const DEFAULT_SCREEN_WIDTH: f32 = 1500.0;
const DEFAULT_SCREEN_HEIGHT: f32 = 1000.0;
const DEFAULT_SPOT_WIDTH: f32 = 50.0;
const DEFAULT_SPOT_HEIGHT: f32 = 80.0;
const DEFAULT_SPOT_ANGLE: f32 = 90.0;
const DEFAULT_OBSTACLE_WIDTH: f32 = 40.0;
const DEFAULT_OBSTACLE_HEIGHT: f32 = 80.0;

/// Screen rectangle `[0, width] x [0, height]`; leaving it counts as a collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Position plus heading in degrees (0 = up, clockwise positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

impl Pose {
    #[must_use]
    pub const fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }
}

/// The target rectangle the agents try to park in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub center: Vec2,
    pub angle: f32,
    pub width: f32,
    pub height: f32,
}

impl ParkingSpot {
    #[must_use]
    pub const fn new(center: Vec2, angle: f32, width: f32, height: f32) -> Self {
        Self {
            center,
            angle,
            width,
            height,
        }
    }

    /// The larger side of the spot; used as the "near the spot" radius.
    #[must_use]
    pub fn max_extent(&self) -> f32 {
        self.footprint().max_extent()
    }
}

impl Collidable for ParkingSpot {
    fn footprint(&self) -> OrientedRect {
        OrientedRect::new(self.center, self.angle, self.width, self.height)
    }
}

/// A static obstacle (a parked car in the default layout).
///
/// Obstacles carry geometry only; they are never simulated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec2,
    pub angle: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    #[must_use]
    pub const fn new(center: Vec2, angle: f32, width: f32, height: f32) -> Self {
        Self {
            center,
            angle,
            width,
            height,
        }
    }

    /// An obstacle of the default size.
    #[must_use]
    pub const fn with_default_size(center: Vec2, angle: f32) -> Self {
        Self::new(
            center,
            angle,
            DEFAULT_OBSTACLE_WIDTH,
            DEFAULT_OBSTACLE_HEIGHT,
        )
    }
}

impl Collidable for Obstacle {
    fn footprint(&self) -> OrientedRect {
        OrientedRect::new(self.center, self.angle, self.width, self.height)
    }
}

/// Static geometry for one generation.
///
/// The scenario is supplied by an external editor before a generation starts
/// and is never modified by the simulation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub bounds: Bounds,
    pub spot: ParkingSpot,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub spawn: Pose,
}

impl Default for Scenario {
    /// Spot in the middle of the screen, flanked by two parked cars, with the
    /// agents spawning near the bottom-left corner facing left.
    fn default() -> Self {
        let bounds = Bounds::default();
        let center = Vec2::new(bounds.width / 2.0, bounds.height / 2.0);
        let spot = ParkingSpot::new(
            center,
            DEFAULT_SPOT_ANGLE,
            DEFAULT_SPOT_WIDTH,
            DEFAULT_SPOT_HEIGHT,
        );
        let offset = Vec2::new(DEFAULT_SPOT_HEIGHT, 0.0);
        let obstacles = vec![
            Obstacle::with_default_size(center + offset, spot.angle),
            Obstacle::with_default_size(center - offset, spot.angle),
        ];
        let spawn = Pose::new(Vec2::new(100.0, bounds.height - 100.0), -90.0);
        Self {
            bounds,
            spot,
            obstacles,
            spawn,
        }
    }
}

impl Scenario {
    /// Checks the geometric preconditions the simulation relies on.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let Bounds { width, height } = self.bounds;
        if !is_positive(width) || !is_positive(height) {
            return Err(ScenarioError::InvalidBounds { width, height });
        }
        check_extent("parking spot", self.spot.width, self.spot.height)?;
        for obstacle in &self.obstacles {
            check_extent("obstacle", obstacle.width, obstacle.height)?;
        }
        self.check_inside("parking spot", self.spot.center)?;
        self.check_inside("spawn", self.spawn.position)?;
        Ok(())
    }

    /// Adds an obstacle of the default size; returns its index.
    pub fn add_obstacle(&mut self, center: Vec2, angle: f32) -> usize {
        self.obstacles
            .push(Obstacle::with_default_size(center, angle));
        self.obstacles.len() - 1
    }

    /// Removes the most recently added obstacle, if any.
    pub fn remove_last_obstacle(&mut self) -> Option<Obstacle> {
        self.obstacles.pop()
    }

    /// Turns the spot by 90 degrees clockwise.
    pub fn rotate_spot_quarter_turn(&mut self) {
        self.spot.angle = quarter_turn(self.spot.angle);
    }

    /// Turns the obstacle at `index` by 90 degrees clockwise.
    ///
    /// Returns `false` if there is no such obstacle.
    pub fn rotate_obstacle_quarter_turn(&mut self, index: usize) -> bool {
        let Some(obstacle) = self.obstacles.get_mut(index) else {
            return false;
        };
        obstacle.angle = quarter_turn(obstacle.angle);
        true
    }

    /// Indices of obstacles that cover part of the parking spot.
    pub fn obstacles_overlapping_spot(&self) -> impl Iterator<Item = usize> + '_ {
        self.obstacles
            .iter()
            .enumerate()
            .filter(|(_, obstacle)| obstacle.overlaps(&self.spot))
            .map(|(i, _)| i)
    }

    fn check_inside(&self, what: &'static str, point: Vec2) -> Result<(), ScenarioError> {
        if self.bounds.contains(point) {
            Ok(())
        } else {
            Err(ScenarioError::OutOfBounds {
                what,
                x: point.x,
                y: point.y,
            })
        }
    }
}

fn quarter_turn(angle: f32) -> f32 {
    (angle + 90.0).rem_euclid(360.0)
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn check_extent(what: &'static str, width: f32, height: f32) -> Result<(), ScenarioError> {
    if is_positive(width) && is_positive(height) {
        Ok(())
    } else {
        Err(ScenarioError::InvalidExtent {
            what,
            width,
            height,
        })
    }
}
