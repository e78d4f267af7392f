//! Geometric primitives for diagram placement and connection geometry.
//!
//! This module provides the small set of 2D types every brush works with.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or free vector) in diagram space
//! - [`Size`] - A width and height, often used as half extents
//! - [`Bounds`] - An axis-aligned bounding box
//! - [`Rotate`] / [`rotate`] - Rotation about the origin for a single point or
//!   a sequence of points
//!
//! # Axes
//!
//! Diagram space is the usual mathematical plane:
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```
//!
//! Positive angles rotate counter-clockwise. The SVG exporter flips the y axis
//! when it writes the document, so nothing above the drawing surface needs to
//! know about screen coordinates.

/// A 2D point in diagram coordinate space.
///
/// The same type is used for free vectors (directions, offsets), which keeps
/// the boundary and arrowhead arithmetic readable.
///
/// # Examples
///
/// ```
/// # use netbrush_core::geometry::Point;
/// let center = Point::new(2.0, 1.0);
/// let offset = Point::new(0.0, 0.5);
///
/// let above = center.add_point(offset);
/// assert_eq!(above, Point::new(2.0, 1.5));
/// assert_eq!(center.midpoint(above), Point::new(2.0, 1.25));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// A point (or vector) at `(x, y)`.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates the unit vector pointing at `angle` radians from the +x axis.
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { x: cos, y: sin }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Same point with `x` replaced.
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Same point with `y` replaced.
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Component-wise sum.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Component-wise difference, the vector from `other` to `self`.
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Halfway between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Length of the vector.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Scales the vector by `factor`; a negative factor also flips it.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Dot product of two vectors
    pub fn dot(self, other: Point) -> f32 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross(self, other: Point) -> f32 {
        self.x.mul_add(other.y, -(self.y * other.x))
    }

    /// Returns the vector rotated a quarter turn counter-clockwise, `(-y, x)`.
    pub fn perpendicular(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Returns the unit vector in the same direction, or `None` for a
    /// zero-length (or non-finite) vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use netbrush_core::geometry::Point;
    /// let unit = Point::new(3.0, 4.0).normalize().unwrap();
    /// assert!((unit.hypot() - 1.0).abs() < 1e-6);
    ///
    /// assert!(Point::default().normalize().is_none());
    /// ```
    pub fn normalize(self) -> Option<Self> {
        let length = self.hypot();
        if length == 0.0 || !length.is_finite() {
            return None;
        }
        Some(self.scale(1.0 / length))
    }

    /// Angle of the vector measured counter-clockwise from the +x axis
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotates the point about the origin by `angle` radians counter-clockwise
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x.mul_add(cos, -(self.y * sin)),
            y: self.x.mul_add(sin, self.y * cos),
        }
    }

    /// Bounds of full size `size` centered on this point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Rotation about the origin, uniform over single points and point sequences.
///
/// The output keeps the shape of the input: a point rotates to a point, an
/// array to an array of the same length, a slice or vector to a vector.
pub trait Rotate {
    type Output;

    /// Rotates by `angle` radians counter-clockwise.
    fn rotated(self, angle: f32) -> Self::Output;
}

impl Rotate for Point {
    type Output = Point;

    fn rotated(self, angle: f32) -> Point {
        self.rotate(angle)
    }
}

impl<const N: usize> Rotate for [Point; N] {
    type Output = [Point; N];

    fn rotated(self, angle: f32) -> [Point; N] {
        self.map(|point| point.rotate(angle))
    }
}

impl Rotate for &[Point] {
    type Output = Vec<Point>;

    fn rotated(self, angle: f32) -> Vec<Point> {
        self.iter().map(|point| point.rotate(angle)).collect()
    }
}

impl Rotate for Vec<Point> {
    type Output = Vec<Point>;

    fn rotated(self, angle: f32) -> Vec<Point> {
        self.into_iter().map(|point| point.rotate(angle)).collect()
    }
}

/// Rotates a point or a sequence of points about the origin.
///
/// # Examples
///
/// ```
/// # use netbrush_core::geometry::{Point, rotate};
/// use std::f32::consts::FRAC_PI_2;
///
/// let p = rotate(Point::new(1.0, 0.0), FRAC_PI_2);
/// assert!(p.x().abs() < 1e-6);
/// assert!((p.y() - 1.0).abs() < 1e-6);
///
/// let pair = rotate([Point::new(1.0, 0.0), Point::new(0.0, 1.0)], FRAC_PI_2);
/// assert_eq!(pair.len(), 2);
/// ```
pub fn rotate<R: Rotate>(points: R, angle: f32) -> R::Output {
    points.rotated(angle)
}

/// A width and a height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// The shorter of the two sides
    pub fn min_side(self) -> f32 {
        self.width.min(self.height)
    }
}

/// An axis-aligned box, stored as its corner coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// The box of full size `size` around `center`.
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates the smallest bounds containing every point, or `None` for an
    /// empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let initial = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.fold(initial, |acc, p| Self {
            min_x: acc.min_x.min(p.x),
            min_y: acc.min_y.min(p.y),
            max_x: acc.max_x.max(p.x),
            max_y: acc.max_y.max(p.y),
        }))
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Merges two bounds into the smallest bounds containing both.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-100.0f32..100.0, -100.0f32..100.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn angle_strategy() -> impl Strategy<Value = f32> {
        -std::f32::consts::TAU..std::f32::consts::TAU
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Rotating by θ and then by −θ gives back the original points.
    fn check_rotate_round_trip(points: Vec<Point>, angle: f32) -> Result<(), TestCaseError> {
        let back = rotate(rotate(points.clone(), angle), -angle);
        for (original, restored) in points.iter().zip(back.iter()) {
            prop_assert!(approx_eq!(f32, original.x(), restored.x(), epsilon = 1e-3));
            prop_assert!(approx_eq!(f32, original.y(), restored.y(), epsilon = 1e-3));
        }
        Ok(())
    }

    /// Rotation preserves distance from the origin.
    fn check_rotate_preserves_length(point: Point, angle: f32) -> Result<(), TestCaseError> {
        let rotated = rotate(point, angle);
        prop_assert!(approx_eq!(f32, point.hypot(), rotated.hypot(), epsilon = 1e-3));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn rotate_round_trip(
            points in prop::collection::vec(point_strategy(), 1..8),
            angle in angle_strategy(),
        ) {
            check_rotate_round_trip(points, angle)?;
        }

        #[test]
        fn rotate_preserves_length(point in point_strategy(), angle in angle_strategy()) {
            check_rotate_preserves_length(point, angle)?;
        }
    }
}
