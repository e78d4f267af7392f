//! Edge brushes and drawn edges.
//!
//! An [`EdgeBrush`] connects two [`Endpoint`]s with the lines and arrowheads
//! its style describes (see [`grammar`]). Endpoints that are nodes or pins
//! are resolved to points on their outlines, so edges start and stop at the
//! shapes rather than their centers.
//!
//! # Example
//!
//! ```
//! # use netbrush::{Diagram, EdgeBrush, NodeBrush};
//! let mut diagram = Diagram::new();
//! let brush = NodeBrush::new("nn.hidden");
//! let a = brush.draw(&mut diagram, (0.0, 0.0)).unwrap();
//! let b = brush.draw(&mut diagram, (2.0, 0.0)).unwrap();
//!
//! let edge = EdgeBrush::new("->").connect(&mut diagram, a, b).unwrap();
//! let edge = diagram.edge(edge).unwrap();
//! assert_eq!(edge.arrow_heads().len(), 1);
//! assert!(edge.start().x() > 0.0);
//! ```

pub mod grammar;

use log::{debug, trace};

use netbrush_core::{
    color::Color,
    draw::{Figure, Primitive, StrokeDefinition, StrokeStyle, Surface},
    geometry::Point,
};

use crate::{
    diagram::{Diagram, EdgeId},
    error::{GeometryError, NetbrushError},
    pin::Endpoint,
};

use grammar::{EdgeGrammar, HeadGeometry, PlannedArrowHead, PlannedLine};

/// A reusable stamp for drawing edges.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeBrush {
    style: String,
    line_width: f32,
    color: Color,
    z_order: i32,
}

impl EdgeBrush {
    /// Creates a black brush of width 1 for an edge style.
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            line_width: 1.0,
            color: Color::default(),
            z_order: 0,
        }
    }

    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    pub fn set_line_width(&mut self, line_width: f32) {
        self.line_width = line_width;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// Connects `start` to `end`.
    ///
    /// The style is validated before anything else happens. Arrowheads are
    /// drawn first, then the lines, all on the brush's z-order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty or invalid style and a
    /// geometry error if the endpoints coincide, before or after snapping
    /// to their boundaries, or refer to unknown nodes or edges.
    pub fn connect(
        &self,
        diagram: &mut Diagram,
        start: impl Into<Endpoint>,
        end: impl Into<Endpoint>,
    ) -> Result<EdgeId, NetbrushError> {
        let grammar = EdgeGrammar::parse(&self.style)?;
        let (start, end) = (start.into(), end.into());
        debug!(style = self.style.as_str(), start:? = start, end:? = end; "Connecting edge");

        let raw_start = start.position(diagram)?;
        let raw_end = end.position(diagram)?;
        let aim = unit_between(raw_start, raw_end)?;

        let start_point = start.boundary_point(diagram, aim)?;
        let end_point = end.boundary_point(diagram, aim.scale(-1.0))?;
        let delta = end_point.sub_point(start_point);
        let unit = unit_between(start_point, end_point)?;

        let settings = diagram.settings().edge().clone();
        let head = HeadGeometry {
            length: settings.arrow_head_length() * self.line_width,
            width: settings.arrow_head_width() * self.line_width,
        };
        let plan = grammar.plan(start_point, delta, unit, head);
        trace!(plan:? = plan; "Planned edge");

        let surface = diagram.surface_mut();
        for head in &plan.arrow_heads {
            surface.add(
                self.z_order,
                Primitive::new(Figure::ArrowHead {
                    base: head.base,
                    direction: head.direction,
                    length: head.length,
                    width: head.width,
                })
                .with_fill(Some(self.color))
                .with_stroke(Some(StrokeDefinition::new(self.color, self.line_width))),
            );
        }

        let dash = StrokeStyle::dash_pattern(self.line_width, settings.edge_segment_ratio());
        for line in &plan.lines {
            let mut stroke = StrokeDefinition::new(self.color, self.line_width);
            if line.dashed {
                stroke.set_style(dash.clone());
            }
            surface.add(
                self.z_order,
                Primitive::new(Figure::Polyline {
                    points: vec![line.start, line.end],
                })
                .with_stroke(Some(stroke)),
            );
        }

        Ok(diagram.push_edge(Edge {
            style: grammar,
            lines: plan.lines,
            arrow_heads: plan.arrow_heads,
            start: start_point,
            end: end_point,
            raw_start,
            raw_end,
            z_order: self.z_order,
        }))
    }
}

fn unit_between(start: Point, end: Point) -> Result<Point, GeometryError> {
    end.sub_point(start)
        .normalize()
        .ok_or(GeometryError::ZeroLength { start, end })
}

/// A drawn edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    style: EdgeGrammar,
    lines: Vec<PlannedLine>,
    arrow_heads: Vec<PlannedArrowHead>,
    start: Point,
    end: Point,
    raw_start: Point,
    raw_end: Point,
    z_order: i32,
}

impl Edge {
    pub fn style(&self) -> &EdgeGrammar {
        &self.style
    }

    /// Drawn lines; a double run contributes two.
    pub fn lines(&self) -> &[PlannedLine] {
        &self.lines
    }

    pub fn arrow_heads(&self) -> &[PlannedArrowHead] {
        &self.arrow_heads
    }

    /// Start point on the start endpoint's boundary.
    pub fn start(&self) -> Point {
        self.start
    }

    /// End point on the end endpoint's boundary.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Start position before snapping to the boundary.
    pub fn raw_start(&self) -> Point {
        self.raw_start
    }

    /// End position before snapping to the boundary.
    pub fn raw_end(&self) -> Point {
        self.raw_end
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Unit vector from start to end.
    pub fn tangent(&self) -> Point {
        // Connecting rejects coincident boundary points.
        self.end
            .sub_point(self.start)
            .normalize()
            .unwrap_or_default()
    }

    pub fn z_order(&self) -> i32 {
        self.z_order
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        error::ConfigurationError,
        node::{NodeBrush, NodeSize},
        pin::{Pin, PinSide},
    };

    fn assert_point_eq(actual: Point, expected: Point) {
        assert_approx_eq!(f32, actual.x(), expected.x(), epsilon = 1e-5);
        assert_approx_eq!(f32, actual.y(), expected.y(), epsilon = 1e-5);
    }

    #[test]
    fn test_connect_raw_points() {
        let mut diagram = Diagram::new();
        let id = EdgeBrush::new("-")
            .connect(&mut diagram, (0.0, 0.0), (3.0, 4.0))
            .unwrap();

        let edge = diagram.edge(id).unwrap();
        assert_eq!(edge.start(), Point::new(0.0, 0.0));
        assert_eq!(edge.end(), Point::new(3.0, 4.0));
        assert_point_eq(edge.tangent(), Point::new(0.6, 0.8));
        assert_point_eq(edge.midpoint(), Point::new(1.5, 2.0));
        assert_approx_eq!(f32, edge.lines()[0].length(), 5.0);
    }

    #[test]
    fn test_connect_snaps_to_node_boundaries() {
        let mut diagram = Diagram::new();
        let brush = NodeBrush::new("qc.basic").with_size(NodeSize::Scalar(0.5));
        let a = brush.draw(&mut diagram, (0.0, 0.0)).unwrap();
        let b = brush.draw(&mut diagram, (0.0, 3.0)).unwrap();

        let id = EdgeBrush::new("-").connect(&mut diagram, a, b).unwrap();
        let edge = diagram.edge(id).unwrap();

        assert_eq!(edge.raw_start(), Point::new(0.0, 0.0));
        assert_eq!(edge.raw_end(), Point::new(0.0, 3.0));
        assert_point_eq(edge.start(), Point::new(0.0, 0.5));
        assert_point_eq(edge.end(), Point::new(0.0, 2.5));
    }

    #[test]
    fn test_head_scales_with_line_width() {
        let mut diagram = Diagram::new();
        let id = EdgeBrush::new(">")
            .with_line_width(2.0)
            .connect(&mut diagram, (0.0, 0.0), (1.0, 0.0))
            .unwrap();

        let head = diagram.edge(id).unwrap().arrow_heads()[0];
        assert_approx_eq!(f32, head.length, 0.12);
        assert_approx_eq!(f32, head.width, 0.08);
    }

    #[test]
    fn test_primitives_share_z_order_and_color() {
        let mut diagram = Diagram::new();
        let red = Color::new("red").unwrap();
        EdgeBrush::new("<.>")
            .with_color(red)
            .with_z_order(7)
            .connect(&mut diagram, (0.0, 0.0), (1.0, 0.0))
            .unwrap();

        let items: Vec<_> = diagram.canvas().items().collect();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|(z, _)| *z == 7));
        assert!(
            items
                .iter()
                .all(|(_, primitive)| primitive.stroke().unwrap().color() == red)
        );

        // Heads first, then the dashed line.
        assert!(matches!(items[0].1.figure(), Figure::ArrowHead { .. }));
        let line = items[2].1;
        assert!(line.stroke().unwrap().style().is_dashed());
        assert_eq!(
            *line.stroke().unwrap().style(),
            StrokeStyle::dash_pattern(1.0, 0.5)
        );
    }

    #[test]
    fn test_invalid_style_draws_nothing() {
        let mut diagram = Diagram::new();
        let err = EdgeBrush::new("-x-")
            .connect(&mut diagram, (0.0, 0.0), (1.0, 0.0))
            .unwrap_err();
        assert!(matches!(
            err,
            NetbrushError::Configuration(ConfigurationError::InvalidGrammarCharacter { .. })
        ));
        assert!(diagram.canvas().is_empty());
        assert!(diagram.edges().is_empty());
    }

    #[test]
    fn test_empty_style_is_rejected() {
        let mut diagram = Diagram::new();
        let err = EdgeBrush::new("")
            .connect(&mut diagram, (0.0, 0.0), (1.0, 0.0))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_coincident_points_are_geometry_errors() {
        let mut diagram = Diagram::new();
        let err = EdgeBrush::new("->")
            .connect(&mut diagram, (1.0, 1.0), (1.0, 1.0))
            .unwrap_err();
        assert!(err.is_geometry());
        assert!(diagram.canvas().is_empty());
    }

    #[test]
    fn test_overlapping_boundaries_are_geometry_errors() {
        let mut diagram = Diagram::new();
        let brush = NodeBrush::new("nn.input").with_size(1.0);
        let a = brush.draw(&mut diagram, (0.0, 0.0)).unwrap();
        let b = brush.draw(&mut diagram, (2.0, 0.0)).unwrap();

        // Both circles touch at (1, 0).
        let err = EdgeBrush::new("-").connect(&mut diagram, a, b).unwrap_err();
        assert!(matches!(
            err,
            NetbrushError::Geometry(GeometryError::ZeroLength { .. })
        ));
    }

    #[test]
    fn test_connect_to_pin_and_edge() {
        let mut diagram = Diagram::new();
        let node = NodeBrush::new("qc.basic")
            .with_size(0.5)
            .draw(&mut diagram, (0.0, 0.0))
            .unwrap();
        let wire = EdgeBrush::new("-")
            .connect(&mut diagram, (2.0, -1.0), (2.0, 1.0))
            .unwrap();

        let id = EdgeBrush::new("->")
            .connect(&mut diagram, Pin::on_side(node, PinSide::Right), wire)
            .unwrap();
        let edge = diagram.edge(id).unwrap();
        assert_point_eq(edge.start(), Point::new(0.5, 0.0));
        assert_point_eq(edge.end(), Point::new(2.0, 0.0));
    }

    #[test]
    fn test_unknown_node_endpoint() {
        let mut other = Diagram::new();
        let node = NodeBrush::new("basic").draw(&mut other, (0.0, 0.0)).unwrap();

        let mut diagram = Diagram::new();
        let err = EdgeBrush::new("-")
            .connect(&mut diagram, node, (1.0, 0.0))
            .unwrap_err();
        assert!(matches!(
            err,
            NetbrushError::Geometry(GeometryError::UnknownNode(_))
        ));
    }
}
