use serde::{Deserialize, Serialize};

/// A point or displacement in screen space (Y grows downward).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `heading` degrees (0 = up, clockwise positive).
    ///
    /// ```
    /// use autopark_engine::Vec2;
    ///
    /// let right = Vec2::from_heading(90.0);
    /// assert!((right.x - 1.0).abs() < 1e-6);
    /// assert!(right.y.abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn from_heading(heading: f32) -> Self {
        let rad = heading.to_radians();
        Self::new(rad.sin(), -rad.cos())
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        (other - self).length()
    }

    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Left-hand perpendicular `(-y, x)`.
    #[must_use]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Rotates by `degrees` in screen space (clockwise on screen for positive angles).
    #[must_use]
    pub fn rotated(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Maps any angle in degrees into the half-open range `(-180, 180]`.
///
/// Both `180` and `-180` map to `180`.
///
/// ```
/// use autopark_engine::normalize_angle;
///
/// assert_eq!(normalize_angle(190.0), -170.0);
/// assert_eq!(normalize_angle(-180.0), 180.0);
/// assert_eq!(normalize_angle(540.0), 180.0);
/// ```
#[must_use]
pub fn normalize_angle(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Maps any angle in degrees into `[0, 360)`.
#[must_use]
pub fn wrap_heading(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Absolute angular distance between two headings, in `[0, 180]`.
#[must_use]
pub fn heading_difference(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}
