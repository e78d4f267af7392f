//! Vector primitives placed on a drawing surface.
//!
//! A [`Primitive`] couples a [`Figure`] (the geometry, in diagram units) with
//! its paint: an optional fill and an optional stroke. Primitives carry no
//! z-order of their own; the [`Canvas`](super::Canvas) stores that alongside.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::StrokeDefinition,
    geometry::{Bounds, Point, Size},
};

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_PER_EM: f32 = 0.6;

/// Applies a primitive's fill and stroke to an SVG element.
macro_rules! paint {
    ($element:expr, $primitive:expr) => {{
        let elem = match $primitive.fill {
            Some(fill) => $element
                .set("fill", fill.to_string())
                .set("fill-opacity", fill.alpha()),
            None => $element.set("fill", "none"),
        };
        match &$primitive.stroke {
            Some(stroke) => apply_stroke!(elem, stroke),
            None => elem.set("stroke", "none"),
        }
    }};
}

/// Horizontal alignment of a text primitive relative to its position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Vertical alignment of a text primitive relative to its position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    /// Text hangs below the position
    Top,
    #[default]
    Middle,
    /// Text sits on top of the position
    Bottom,
}

impl TextBaseline {
    fn to_svg_value(self) -> &'static str {
        match self {
            Self::Top => "hanging",
            Self::Middle => "central",
            Self::Bottom => "alphabetic",
        }
    }
}

/// The geometry of a primitive, in diagram units.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Circle {
        center: Point,
        radius: f32,
    },
    /// Closed polygon through the given vertices.
    Polygon { points: Vec<Point> },
    /// Axis-aligned rectangle, optionally with rounded corners.
    Rectangle {
        center: Point,
        size: Size,
        corner_radius: f32,
    },
    /// Open polyline through the given points.
    Polyline { points: Vec<Point> },
    /// A triangular arrowhead whose back edge is centered on `base` and whose
    /// tip lies `length` units along the unit vector `direction`.
    ArrowHead {
        base: Point,
        direction: Point,
        length: f32,
        width: f32,
    },
    Text {
        position: Point,
        content: String,
        font_size: f32,
        anchor: TextAnchor,
        baseline: TextBaseline,
    },
}

impl Figure {
    /// Vertices of an arrowhead: tip first, then the two back corners.
    pub fn arrow_head_vertices(
        base: Point,
        direction: Point,
        length: f32,
        width: f32,
    ) -> [Point; 3] {
        let tip = base.add_point(direction.scale(length));
        let half_back = direction.perpendicular().scale(width / 2.0);
        [tip, base.add_point(half_back), base.sub_point(half_back)]
    }

    /// Axis-aligned bounds of the figure, `None` for figures without extent
    /// information (empty polygons and polylines).
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::Circle { center, radius } => {
                Some(center.to_bounds(Size::new(radius * 2.0, radius * 2.0)))
            }
            Self::Polygon { points } | Self::Polyline { points } => {
                Bounds::from_points(points.iter().copied())
            }
            Self::Rectangle { center, size, .. } => Some(center.to_bounds(*size)),
            Self::ArrowHead {
                base,
                direction,
                length,
                width,
            } => {
                let vertices = Self::arrow_head_vertices(*base, *direction, *length, *width);
                Bounds::from_points(vertices)
            }
            Self::Text { position, .. } => {
                Some(Bounds::new_from_center(*position, Size::default()))
            }
        }
    }

    /// Like [`Figure::bounds`], but text takes up the space it will occupy
    /// once rendered at `pixels_per_unit`.
    ///
    /// Text extents are estimated from the font size and character count.
    pub fn rendered_bounds(&self, pixels_per_unit: f32) -> Option<Bounds> {
        let Self::Text {
            position,
            content,
            font_size,
            anchor,
            baseline,
        } = self
        else {
            return self.bounds();
        };

        let em = font_size / pixels_per_unit.max(f32::EPSILON);
        let width = content.chars().count() as f32 * GLYPH_WIDTH_PER_EM * em;
        let min_x = match anchor {
            TextAnchor::Start => position.x(),
            TextAnchor::Middle => position.x() - width / 2.0,
            TextAnchor::End => position.x() - width,
        };
        // Diagram y points up, so hanging text grows downwards.
        let min_y = match baseline {
            TextBaseline::Top => position.y() - em,
            TextBaseline::Middle => position.y() - em / 2.0,
            TextBaseline::Bottom => position.y(),
        };
        Bounds::from_points([
            Point::new(min_x, min_y),
            Point::new(min_x + width, min_y + em),
        ])
    }
}

/// A figure together with its paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    figure: Figure,
    fill: Option<Color>,
    stroke: Option<StrokeDefinition>,
}

impl Primitive {
    /// Creates an unpainted primitive (neither filled nor stroked).
    pub fn new(figure: Figure) -> Self {
        Self {
            figure,
            fill: None,
            stroke: None,
        }
    }

    /// Sets the fill color (builder style). `None` leaves the figure unfilled.
    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    /// Sets the stroke (builder style). `None` draws no outline.
    pub fn with_stroke(mut self, stroke: Option<StrokeDefinition>) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    /// Renders the primitive to an SVG node.
    ///
    /// Diagram coordinates are scaled by `pixels_per_unit` and the y axis is
    /// flipped, so a diagram point `(x, y)` lands at `(x·s, −y·s)`.
    pub fn render_to_svg(&self, pixels_per_unit: f32) -> Box<dyn svg::Node> {
        let to_svg = |p: Point| (p.x() * pixels_per_unit, -p.y() * pixels_per_unit);
        let points_attr = |points: &[Point]| {
            points
                .iter()
                .map(|p| {
                    let (x, y) = to_svg(*p);
                    format!("{x},{y}")
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        match &self.figure {
            Figure::Circle { center, radius } => {
                let (cx, cy) = to_svg(*center);
                let circle = svg_element::Circle::new()
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", radius * pixels_per_unit);
                paint!(circle, self).into()
            }
            Figure::Polygon { points } => {
                let polygon = svg_element::Polygon::new().set("points", points_attr(points));
                paint!(polygon, self).into()
            }
            Figure::Rectangle {
                center,
                size,
                corner_radius,
            } => {
                // Top-left in SVG space is the diagram's (min_x, max_y).
                let bounds = center.to_bounds(*size);
                let (x, y) = to_svg(Point::new(bounds.min_x(), bounds.max_y()));
                let rect = svg_element::Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", size.width() * pixels_per_unit)
                    .set("height", size.height() * pixels_per_unit)
                    .set("rx", corner_radius * pixels_per_unit);
                paint!(rect, self).into()
            }
            Figure::Polyline { points } => {
                let polyline = svg_element::Polyline::new().set("points", points_attr(points));
                paint!(polyline, self).into()
            }
            Figure::ArrowHead {
                base,
                direction,
                length,
                width,
            } => {
                let vertices = Figure::arrow_head_vertices(*base, *direction, *length, *width);
                let polygon = svg_element::Polygon::new().set("points", points_attr(&vertices));
                paint!(polygon, self).into()
            }
            Figure::Text {
                position,
                content,
                font_size,
                anchor,
                baseline,
            } => {
                let (x, y) = to_svg(*position);
                let text = svg_element::Text::new(content.as_str())
                    .set("x", x)
                    .set("y", y)
                    .set("font-size", *font_size)
                    .set("text-anchor", anchor.to_svg_value())
                    .set("dominant-baseline", baseline.to_svg_value())
                    .set("fill", self.fill.unwrap_or_default().to_string());
                text.into()
            }
        }
    }
}
