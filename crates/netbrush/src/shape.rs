//! Node geometry kinds and their boundary behavior.
//!
//! Theme entries name shapes with short tokens. This module turns those
//! tokens into closed enums ([`GeometryKind`], [`InnerGeometry`]) and resolves
//! a kind plus a size into an [`Outline`], which knows how to draw itself and
//! where a ray from its center leaves it.

use std::{f32::consts::PI, fmt, str::FromStr};

use netbrush_core::{
    draw::Figure,
    geometry::{Point, Size, rotate},
};

use crate::error::{ConfigurationError, GeometryError};

/// Vertices of the canonical upward unit triangle, centroid at the origin.
pub const UNIT_TRIANGLE: [Point; 3] = [
    Point::new(-0.866_025_4, -0.5),
    Point::new(0.866_025_4, -0.5),
    Point::new(0.0, 1.0),
];

/// Vertices of the canonical unit diamond.
pub const UNIT_DIAMOND: [Point; 4] = [
    Point::new(-1.0, 0.0),
    Point::new(0.0, -1.0),
    Point::new(1.0, 0.0),
    Point::new(0.0, 1.0),
];

/// Rounded rectangles pad their corners by this fraction of the short side.
const ROUND_CORNER_RATIO: f32 = 0.15;

/// Golden rectangles are this much wider than they are tall.
const GOLDEN_ASPECT: f32 = 1.3;

/// Which way a triangle points before the brush rotation is applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TriangleDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl TriangleDirection {
    /// Rotation taking the canonical upward triangle to this direction.
    pub fn angle(self) -> f32 {
        match self {
            Self::Up => 0.0,
            Self::Down => PI,
            Self::Left => PI / 2.0,
            Self::Right => -PI / 2.0,
        }
    }
}

/// The outer shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Circle,
    Square,
    Triangle(TriangleDirection),
    Diamond,
    Rectangle { rounded: bool },
    GoldenRectangle,
    Invisible,
}

impl GeometryKind {
    /// Returns `true` if a `(width, height)` size is meaningful for this kind.
    pub fn accepts_extents(self) -> bool {
        matches!(self, Self::Rectangle { .. })
    }

    /// Resolves the outline for a node centered at `center`.
    ///
    /// `half_extents` are radius-like: a circle of size `s` has radius `s`, a
    /// rectangle of size `(w, h)` spans `2w × 2h`. Only triangles and
    /// diamonds honor `rotation`.
    pub fn outline(self, center: Point, half_extents: Size, rotation: f32) -> Outline {
        let size = half_extents.width();
        match self {
            Self::Circle => Outline::Circle {
                center,
                radius: size,
            },
            Self::Square => Outline::Box {
                center,
                size: Size::new(2.0 * size, 2.0 * size),
                corner_radius: 0.0,
            },
            Self::Rectangle { rounded } => {
                let full = half_extents.scale(2.0);
                let corner_radius = if rounded {
                    ROUND_CORNER_RATIO * full.min_side()
                } else {
                    0.0
                };
                Outline::Box {
                    center,
                    size: full,
                    corner_radius,
                }
            }
            Self::GoldenRectangle => {
                let height = 2.0 * size;
                Outline::Box {
                    center,
                    size: Size::new(GOLDEN_ASPECT * height, height),
                    corner_radius: 0.0,
                }
            }
            Self::Triangle(direction) => Outline::Polygon {
                center,
                vertices: place(&UNIT_TRIANGLE, center, size, direction.angle() + rotation),
            },
            Self::Diamond => Outline::Polygon {
                center,
                vertices: place(&UNIT_DIAMOND, center, size, rotation),
            },
            Self::Invisible => Outline::Invisible { center },
        }
    }
}

impl FromStr for GeometryKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            "triangle" | "triangle-u" => Ok(Self::Triangle(TriangleDirection::Up)),
            "triangle-d" => Ok(Self::Triangle(TriangleDirection::Down)),
            "triangle-l" => Ok(Self::Triangle(TriangleDirection::Left)),
            "triangle-r" => Ok(Self::Triangle(TriangleDirection::Right)),
            "diamond" => Ok(Self::Diamond),
            "rectangle" => Ok(Self::Rectangle { rounded: false }),
            "rectangle-round" => Ok(Self::Rectangle { rounded: true }),
            "golden" | "golden-rectangle" => Ok(Self::GoldenRectangle),
            "" | "invisible" => Ok(Self::Invisible),
            _ => Err(ConfigurationError::UnknownGeometry(s.to_string())),
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle(TriangleDirection::Up) => "triangle",
            Self::Triangle(TriangleDirection::Down) => "triangle-d",
            Self::Triangle(TriangleDirection::Left) => "triangle-l",
            Self::Triangle(TriangleDirection::Right) => "triangle-r",
            Self::Diamond => "diamond",
            Self::Rectangle { rounded: false } => "rectangle",
            Self::Rectangle { rounded: true } => "rectangle-round",
            Self::GoldenRectangle => "golden",
            Self::Invisible => "invisible",
        };
        write!(f, "{token}")
    }
}

/// A glyph drawn on top of a node's outer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerGeometry {
    Circle,
    Triangle,
    Dot,
    Cross,
    Plus,
    VBar,
    /// Meter needle and dial, as used by measurement gates.
    Measure,
}

impl InnerGeometry {
    /// Parses an optional inner token where absence and `none` mean no glyph.
    pub fn parse_optional(token: Option<&str>) -> Result<Option<Self>, ConfigurationError> {
        match token {
            None | Some("none") => Ok(None),
            Some(token) => token.parse().map(Some),
        }
    }
}

impl FromStr for InnerGeometry {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Self::Circle),
            "triangle" => Ok(Self::Triangle),
            "dot" => Ok(Self::Dot),
            "cross" => Ok(Self::Cross),
            "plus" => Ok(Self::Plus),
            "vbar" => Ok(Self::VBar),
            "measure" => Ok(Self::Measure),
            _ => Err(ConfigurationError::UnknownInnerGeometry(s.to_string())),
        }
    }
}

/// A node's resolved outer shape in diagram coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Circle {
        center: Point,
        radius: f32,
    },
    /// Axis-aligned box; the corner radius is visual only.
    Box {
        center: Point,
        size: Size,
        corner_radius: f32,
    },
    /// Convex polygon around `center`.
    Polygon {
        center: Point,
        vertices: Vec<Point>,
    },
    Invisible {
        center: Point,
    },
}

impl Outline {
    pub fn center(&self) -> Point {
        match self {
            Self::Circle { center, .. }
            | Self::Box { center, .. }
            | Self::Polygon { center, .. }
            | Self::Invisible { center } => *center,
        }
    }

    /// Width and height of the smallest box around the outline.
    pub fn extents(&self) -> Size {
        self.figure()
            .bounds()
            .map(|bounds| Size::new(bounds.width(), bounds.height()))
            .unwrap_or_default()
    }

    /// The figure to draw for this outline.
    pub fn figure(&self) -> Figure {
        match self {
            Self::Circle { center, radius } => Figure::Circle {
                center: *center,
                radius: *radius,
            },
            Self::Box {
                center,
                size,
                corner_radius,
            } => Figure::Rectangle {
                center: *center,
                size: *size,
                corner_radius: *corner_radius,
            },
            Self::Polygon { vertices, .. } => Figure::Polygon {
                points: vertices.clone(),
            },
            Self::Invisible { center } => Figure::Circle {
                center: *center,
                radius: 0.0,
            },
        }
    }

    /// The point where a ray from the center along `direction` leaves the
    /// outline. `direction` need not be normalized.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLength`] for a zero direction and
    /// [`GeometryError::NoIntersection`] if the ray misses a polygon outline.
    pub fn boundary_point(&self, direction: Point) -> Result<Point, GeometryError> {
        if let Self::Invisible { center } = self {
            return Ok(*center);
        }

        let center = self.center();
        let unit = direction.normalize().ok_or(GeometryError::ZeroLength {
            start: center,
            end: center.add_point(direction),
        })?;

        match self {
            Self::Circle { radius, .. } => Ok(center.add_point(unit.scale(*radius))),
            Self::Box { size, .. } => Ok(box_intersection(center, unit, *size)),
            Self::Polygon { vertices, .. } => polygon_intersection(center, unit, vertices)
                .ok_or(GeometryError::NoIntersection {
                    center,
                    direction: unit,
                }),
            Self::Invisible { center } => Ok(*center),
        }
    }
}

/// Scales, rotates and translates a unit shape.
fn place(unit: &[Point], center: Point, size: f32, angle: f32) -> Vec<Point> {
    rotate(unit, angle)
        .into_iter()
        .map(|vertex| center.add_point(vertex.scale(size)))
        .collect()
}

/// Ray/box intersection for a box centered on the ray origin.
fn box_intersection(center: Point, unit: Point, size: Size) -> Point {
    let half_width = size.width() / 2.0;
    let half_height = size.height() / 2.0;

    // Distance along the ray to the vertical and horizontal edges.
    let t_x = if unit.x() == 0.0 {
        f32::INFINITY
    } else {
        half_width / unit.x().abs()
    };
    let t_y = if unit.y() == 0.0 {
        f32::INFINITY
    } else {
        half_height / unit.y().abs()
    };
    let t = t_x.min(t_y);

    Point::new(
        unit.x().mul_add(t, center.x()),
        unit.y().mul_add(t, center.y()),
    )
}

/// Nearest forward crossing of a ray with the edges of a polygon.
fn polygon_intersection(origin: Point, unit: Point, vertices: &[Point]) -> Option<Point> {
    const EPSILON: f32 = 1e-6;

    let edges = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| (*a, b.sub_point(*a)));

    let mut nearest: Option<f32> = None;
    for (start, edge) in edges {
        let denom = unit.cross(edge);
        if denom.abs() < EPSILON {
            continue;
        }
        let offset = start.sub_point(origin);
        let t = offset.cross(edge) / denom;
        let s = offset.cross(unit) / denom;
        if t >= 0.0 && (-EPSILON..=1.0 + EPSILON).contains(&s) {
            nearest = Some(nearest.map_or(t, |best| best.min(t)));
        }
    }

    nearest.map(|t| origin.add_point(unit.scale(t)))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert_approx_eq!(f32, actual.x(), expected.x(), epsilon = 1e-5);
        assert_approx_eq!(f32, actual.y(), expected.y(), epsilon = 1e-5);
    }

    #[test]
    fn test_geometry_kind_from_str() {
        assert_eq!("circle".parse::<GeometryKind>().unwrap(), GeometryKind::Circle);
        assert_eq!(
            "triangle".parse::<GeometryKind>().unwrap(),
            GeometryKind::Triangle(TriangleDirection::Up)
        );
        assert_eq!(
            "triangle-l".parse::<GeometryKind>().unwrap(),
            GeometryKind::Triangle(TriangleDirection::Left)
        );
        assert_eq!(
            "rectangle-round".parse::<GeometryKind>().unwrap(),
            GeometryKind::Rectangle { rounded: true }
        );
        assert_eq!(
            "golden".parse::<GeometryKind>().unwrap(),
            GeometryKind::GoldenRectangle
        );
        assert_eq!("".parse::<GeometryKind>().unwrap(), GeometryKind::Invisible);
    }

    #[test]
    fn test_unknown_triangle_suffix_is_rejected() {
        assert_eq!(
            "triangle-x".parse::<GeometryKind>(),
            Err(ConfigurationError::UnknownGeometry("triangle-x".to_string()))
        );
        assert!("hexagon".parse::<GeometryKind>().is_err());
    }

    #[test]
    fn test_geometry_kind_display_parses_back() {
        for kind in [
            GeometryKind::Circle,
            GeometryKind::Triangle(TriangleDirection::Right),
            GeometryKind::Rectangle { rounded: true },
            GeometryKind::GoldenRectangle,
            GeometryKind::Invisible,
        ] {
            assert_eq!(kind.to_string().parse::<GeometryKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_inner_geometry_parse_optional() {
        assert_eq!(InnerGeometry::parse_optional(None).unwrap(), None);
        assert_eq!(InnerGeometry::parse_optional(Some("none")).unwrap(), None);
        assert_eq!(
            InnerGeometry::parse_optional(Some("vbar")).unwrap(),
            Some(InnerGeometry::VBar)
        );
        assert_eq!(
            InnerGeometry::parse_optional(Some("star")),
            Err(ConfigurationError::UnknownInnerGeometry("star".to_string()))
        );
    }

    #[test]
    fn test_circle_boundary() {
        let outline = GeometryKind::Circle.outline(Point::new(1.0, 1.0), Size::new(0.5, 0.5), 0.0);
        let point = outline.boundary_point(Point::new(0.0, 3.0)).unwrap();
        assert_point_eq(point, Point::new(1.0, 1.5));
    }

    #[test]
    fn test_square_boundary() {
        let outline = GeometryKind::Square.outline(Point::new(0.0, 0.0), Size::new(1.0, 1.0), 0.0);

        assert_point_eq(
            outline.boundary_point(Point::new(1.0, 0.0)).unwrap(),
            Point::new(1.0, 0.0),
        );
        assert_point_eq(
            outline.boundary_point(Point::new(1.0, 1.0)).unwrap(),
            Point::new(1.0, 1.0),
        );
        assert_point_eq(
            outline.boundary_point(Point::new(-2.0, 1.0)).unwrap(),
            Point::new(-1.0, 0.5),
        );
    }

    #[test]
    fn test_rectangle_outline() {
        let outline = GeometryKind::Rectangle { rounded: true }.outline(
            Point::new(0.0, 0.0),
            Size::new(2.0, 1.0),
            0.0,
        );
        match &outline {
            Outline::Box {
                size,
                corner_radius,
                ..
            } => {
                assert_approx_eq!(f32, size.width(), 4.0);
                assert_approx_eq!(f32, size.height(), 2.0);
                assert_approx_eq!(f32, *corner_radius, 0.3);
            }
            other => panic!("expected a box, got {other:?}"),
        }
        assert_point_eq(
            outline.boundary_point(Point::new(0.0, -1.0)).unwrap(),
            Point::new(0.0, -1.0),
        );
    }

    #[test]
    fn test_golden_rectangle_proportions() {
        let outline =
            GeometryKind::GoldenRectangle.outline(Point::new(0.0, 0.0), Size::new(0.5, 0.5), 0.0);
        let extents = outline.extents();
        assert_approx_eq!(f32, extents.height(), 1.0);
        assert_approx_eq!(f32, extents.width(), 1.3);
    }

    #[test]
    fn test_triangle_directions() {
        let up = GeometryKind::Triangle(TriangleDirection::Up).outline(
            Point::new(0.0, 0.0),
            Size::new(1.0, 1.0),
            0.0,
        );
        assert_point_eq(
            up.boundary_point(Point::new(0.0, 1.0)).unwrap(),
            Point::new(0.0, 1.0),
        );
        // Bottom edge of the upward triangle sits at y = -0.5.
        assert_point_eq(
            up.boundary_point(Point::new(0.0, -1.0)).unwrap(),
            Point::new(0.0, -0.5),
        );

        let right = GeometryKind::Triangle(TriangleDirection::Right).outline(
            Point::new(0.0, 0.0),
            Size::new(1.0, 1.0),
            0.0,
        );
        assert_point_eq(
            right.boundary_point(Point::new(1.0, 0.0)).unwrap(),
            Point::new(1.0, 0.0),
        );
        assert_point_eq(
            right.boundary_point(Point::new(-1.0, 0.0)).unwrap(),
            Point::new(-0.5, 0.0),
        );

        let down = GeometryKind::Triangle(TriangleDirection::Down).outline(
            Point::new(0.0, 0.0),
            Size::new(1.0, 1.0),
            0.0,
        );
        assert_point_eq(
            down.boundary_point(Point::new(0.0, -1.0)).unwrap(),
            Point::new(0.0, -1.0),
        );
        assert_point_eq(
            down.boundary_point(Point::new(0.0, 1.0)).unwrap(),
            Point::new(0.0, 0.5),
        );

        let left = GeometryKind::Triangle(TriangleDirection::Left).outline(
            Point::new(0.0, 0.0),
            Size::new(1.0, 1.0),
            0.0,
        );
        assert_point_eq(
            left.boundary_point(Point::new(-1.0, 0.0)).unwrap(),
            Point::new(-1.0, 0.0),
        );
        assert_point_eq(
            left.boundary_point(Point::new(1.0, 0.0)).unwrap(),
            Point::new(0.5, 0.0),
        );
    }

    #[test]
    fn test_diamond_boundary() {
        let diamond = GeometryKind::Diamond.outline(Point::new(2.0, 0.0), Size::new(1.0, 1.0), 0.0);
        assert_point_eq(
            diamond.boundary_point(Point::new(1.0, 1.0)).unwrap(),
            Point::new(2.5, 0.5),
        );
    }

    #[test]
    fn test_invisible_boundary_is_center() {
        let outline =
            GeometryKind::Invisible.outline(Point::new(3.0, 4.0), Size::new(1.0, 1.0), 0.0);
        assert_eq!(
            outline.boundary_point(Point::new(1.0, 0.0)).unwrap(),
            Point::new(3.0, 4.0)
        );
        assert_eq!(
            outline.boundary_point(Point::default()).unwrap(),
            Point::new(3.0, 4.0)
        );
    }

    #[test]
    fn test_zero_direction_is_geometry_error() {
        let outline = GeometryKind::Circle.outline(Point::default(), Size::new(1.0, 1.0), 0.0);
        assert!(matches!(
            outline.boundary_point(Point::default()),
            Err(GeometryError::ZeroLength { .. })
        ));
    }
}
