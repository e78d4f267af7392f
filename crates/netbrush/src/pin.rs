//! Pins and edge endpoints.
//!
//! An [`Endpoint`] is anything an edge can start or end at: a raw point, a
//! node, a pin or another edge. A [`Pin`] is an anchor that is either free
//! (a fixed position) or owned by a node, in which case it sits on the node's
//! outline at a side or an angle. An owned pin can be lined up with another
//! element through an [`Alignment`].
//!
//! # Example
//!
//! ```
//! # use netbrush::{Diagram, NodeBrush, pin::{Pin, PinSide}};
//! let mut diagram = Diagram::new();
//! let node = NodeBrush::new("qc.basic").draw(&mut diagram, (0.0, 0.0)).unwrap();
//!
//! let top = Pin::on_side(node, PinSide::Top);
//! let position = top.position(&diagram).unwrap();
//! assert!(position.y() > 0.0);
//! ```

use std::{fmt, str::FromStr};

use netbrush_core::geometry::Point;

use crate::{
    diagram::{Diagram, EdgeId, NodeId},
    error::{ConfigurationError, GeometryError},
};

/// A named side of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl PinSide {
    /// Unit vector pointing out of this side.
    pub fn direction(self) -> Point {
        match self {
            Self::Top => Point::new(0.0, 1.0),
            Self::Bottom => Point::new(0.0, -1.0),
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

impl FromStr for PinSide {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ConfigurationError::UnknownPinSide(s.to_string())),
        }
    }
}

impl fmt::Display for PinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Anchor {
    Free(Point),
    Side { owner: NodeId, side: PinSide },
    /// Radians counter-clockwise, from +x or from the alignment reference.
    Angle { owner: NodeId, angle: f32 },
}

/// The reference an owned pin lines itself up with.
///
/// Nodes and edges are looked up each time the pin is resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    Point(Point),
    /// The node's center.
    Node(NodeId),
    /// The edge's midpoint.
    Edge(EdgeId),
}

impl Alignment {
    /// Resolves the reference position in `diagram`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownNode`] or [`GeometryError::UnknownEdge`]
    /// for a stale id.
    pub fn position(&self, diagram: &Diagram) -> Result<Point, GeometryError> {
        match self {
            Self::Point(point) => Ok(*point),
            Self::Node(id) => Ok(diagram.node(*id)?.center()),
            Self::Edge(id) => Ok(diagram.edge(*id)?.midpoint()),
        }
    }
}

impl From<Point> for Alignment {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

impl From<(f32, f32)> for Alignment {
    fn from(point: (f32, f32)) -> Self {
        Self::Point(point.into())
    }
}

impl From<NodeId> for Alignment {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<EdgeId> for Alignment {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}

/// An anchor usable as an edge endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    anchor: Anchor,
    align: Option<Alignment>,
}

impl Pin {
    /// A free pin at a fixed position.
    pub fn at(position: impl Into<Point>) -> Self {
        Self {
            anchor: Anchor::Free(position.into()),
            align: None,
        }
    }

    /// A pin on the given side of a node's outline.
    pub fn on_side(owner: NodeId, side: PinSide) -> Self {
        Self {
            anchor: Anchor::Side { owner, side },
            align: None,
        }
    }

    /// A pin on a node's outline at `angle` radians.
    pub fn at_angle(owner: NodeId, angle: f32) -> Self {
        Self {
            anchor: Anchor::Angle { owner, angle },
            align: None,
        }
    }

    /// Aligns the pin with a point, a node or an edge.
    ///
    /// Top and bottom pins take the reference's x coordinate, left and right
    /// pins its y coordinate. Angle pins measure their angle from the
    /// direction pointing at the reference. Free pins ignore the reference.
    pub fn aligned_with(mut self, reference: impl Into<Alignment>) -> Self {
        self.align = Some(reference.into());
        self
    }

    /// The owning node, `None` for free pins.
    pub fn owner(&self) -> Option<NodeId> {
        match self.anchor {
            Anchor::Free(_) => None,
            Anchor::Side { owner, .. } | Anchor::Angle { owner, .. } => Some(owner),
        }
    }

    /// Resolves the pin's position in `diagram`.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the owner or the alignment reference is
    /// not part of `diagram`, or the reference coincides with the owner's
    /// center.
    pub fn position(&self, diagram: &Diagram) -> Result<Point, GeometryError> {
        if let Anchor::Free(position) = self.anchor {
            return Ok(position);
        }
        let reference = self
            .align
            .map(|align| align.position(diagram))
            .transpose()?;

        match self.anchor {
            Anchor::Free(position) => Ok(position),
            Anchor::Side { owner, side } => {
                let point = diagram.node(owner)?.boundary_point(side.direction())?;
                Ok(match reference {
                    Some(reference) if side.is_vertical() => point.with_x(reference.x()),
                    Some(reference) => point.with_y(reference.y()),
                    None => point,
                })
            }
            Anchor::Angle { owner, angle } => {
                let node = diagram.node(owner)?;
                let direction = match reference {
                    Some(reference) => {
                        let center = node.center();
                        reference
                            .sub_point(center)
                            .normalize()
                            .ok_or(GeometryError::ZeroLength {
                                start: center,
                                end: reference,
                            })?
                            .rotate(angle)
                    }
                    None => Point::from_angle(angle),
                };
                node.boundary_point(direction)
            }
        }
    }

    /// The point an edge attaches to when arriving from `direction`.
    ///
    /// Owned pins sit at a fixed spot on their owner's outline, and free pins
    /// at their position, so `direction` does not move either.
    pub fn boundary_point(
        &self,
        diagram: &Diagram,
        _direction: Point,
    ) -> Result<Point, GeometryError> {
        self.position(diagram)
    }
}

/// Something an edge can connect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    Point(Point),
    Node(NodeId),
    Pin(Pin),
    /// Attaches at the edge's midpoint.
    Edge(EdgeId),
}

impl Endpoint {
    /// Position used to aim a connection at this endpoint.
    pub fn position(&self, diagram: &Diagram) -> Result<Point, GeometryError> {
        match self {
            Self::Point(point) => Ok(*point),
            Self::Node(id) => Ok(diagram.node(*id)?.center()),
            Self::Pin(pin) => pin.position(diagram),
            Self::Edge(id) => Ok(diagram.edge(*id)?.midpoint()),
        }
    }

    /// Where a connection leaving along `direction` touches this endpoint.
    pub fn boundary_point(
        &self,
        diagram: &Diagram,
        direction: Point,
    ) -> Result<Point, GeometryError> {
        match self {
            Self::Node(id) => diagram.node(*id)?.boundary_point(direction),
            Self::Pin(pin) => pin.boundary_point(diagram, direction),
            Self::Point(_) | Self::Edge(_) => self.position(diagram),
        }
    }
}

impl From<Point> for Endpoint {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

impl From<(f32, f32)> for Endpoint {
    fn from(point: (f32, f32)) -> Self {
        Self::Point(point.into())
    }
}

impl From<NodeId> for Endpoint {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Pin> for Endpoint {
    fn from(pin: Pin) -> Self {
        Self::Pin(pin)
    }
}

impl From<EdgeId> for Endpoint {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}
