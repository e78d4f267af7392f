//! Node brushes and drawn nodes.
//!
//! A [`NodeBrush`] is a reusable stamp: a style key plus size, color,
//! rotation, line style and z-order. Drawing it at a position looks the style
//! up in the diagram's theme, adds the outer shape (and any inner glyph) to
//! the drawing surface and registers a [`Node`] that edges can attach to.
//!
//! # Example
//!
//! ```
//! # use netbrush::{Diagram, NodeBrush, node::SizeToken};
//! let mut diagram = Diagram::new();
//! let mut brush = NodeBrush::new("nn.input").with_size(SizeToken::Large);
//! let input = brush.draw(&mut diagram, (0.0, 0.0)).unwrap();
//!
//! brush.set_style("nn.output");
//! let output = brush.draw(&mut diagram, (2.0, 0.0)).unwrap();
//!
//! assert_ne!(input, output);
//! assert_eq!(diagram.nodes().len(), 2);
//! ```

use std::str::FromStr;

use log::{debug, trace};

use netbrush_core::{
    color::Color,
    draw::{Figure, Primitive, StrokeDefinition, StrokeStyle, Surface},
    geometry::{Point, Size, rotate},
};

use crate::{
    config::NodeSettings,
    diagram::{Diagram, NodeId},
    error::{ConfigurationError, GeometryError, NetbrushError},
    shape::{GeometryKind, InnerGeometry, Outline, UNIT_TRIANGLE},
    theme::{NEURAL_NETWORK_PREFIX, ThemeEntry, palette},
};

/// Named node sizes, largest first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SizeToken {
    Huge,
    Large,
    #[default]
    Normal,
    Small,
    Tiny,
}

impl SizeToken {
    /// Every token, from largest to smallest.
    pub const ALL: [SizeToken; 5] = [
        Self::Huge,
        Self::Large,
        Self::Normal,
        Self::Small,
        Self::Tiny,
    ];

    /// Radius-like size before the base size is applied.
    pub fn scale(self) -> f32 {
        match self {
            Self::Huge => 0.9,
            Self::Large => 0.39,
            Self::Normal => 0.3,
            Self::Small => 0.21,
            Self::Tiny => 0.09,
        }
    }
}

impl FromStr for SizeToken {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "huge" => Ok(Self::Huge),
            "large" => Ok(Self::Large),
            "normal" => Ok(Self::Normal),
            "small" => Ok(Self::Small),
            "tiny" => Ok(Self::Tiny),
            _ => Err(ConfigurationError::UnknownSizeToken(s.to_string())),
        }
    }
}

/// The size a brush draws nodes at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeSize {
    Token(SizeToken),
    Scalar(f32),
    /// Half width and half height; rectangles only.
    Extents(f32, f32),
}

impl NodeSize {
    /// Resolves to half extents for `kind`, scaled by `base_size`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::SizeGeometryMismatch`] for extents on a
    /// geometry other than a rectangle.
    pub fn resolve(self, kind: GeometryKind, base_size: f32) -> Result<Size, ConfigurationError> {
        match self {
            Self::Token(token) => {
                let size = token.scale() * base_size;
                Ok(Size::new(size, size))
            }
            Self::Scalar(size) => Ok(Size::new(size * base_size, size * base_size)),
            Self::Extents(width, height) if kind.accepts_extents() => {
                Ok(Size::new(width * base_size, height * base_size))
            }
            Self::Extents(..) => Err(ConfigurationError::SizeGeometryMismatch {
                geometry: kind.to_string(),
            }),
        }
    }
}

impl Default for NodeSize {
    fn default() -> Self {
        Self::Token(SizeToken::default())
    }
}

impl From<SizeToken> for NodeSize {
    fn from(token: SizeToken) -> Self {
        Self::Token(token)
    }
}

impl From<f32> for NodeSize {
    fn from(size: f32) -> Self {
        Self::Scalar(size)
    }
}

impl From<(f32, f32)> for NodeSize {
    fn from((width, height): (f32, f32)) -> Self {
        Self::Extents(width, height)
    }
}

impl FromStr for NodeSize {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<SizeToken>().map(Self::Token)
    }
}

/// A reusable stamp for drawing nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBrush {
    style: String,
    size: NodeSize,
    /// Overrides the theme color when set.
    color: Option<Color>,
    rotation: f32,
    line_style: StrokeStyle,
    z_order: i32,
}

impl NodeBrush {
    /// Creates a brush for a style key with a normal size.
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            size: NodeSize::default(),
            color: None,
            rotation: 0.0,
            line_style: StrokeStyle::Solid,
            z_order: 0,
        }
    }

    pub fn with_size(mut self, size: impl Into<NodeSize>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Sets the rotation in radians, counter-clockwise.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_line_style(mut self, line_style: StrokeStyle) -> Self {
        self.line_style = line_style;
        self
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    pub fn set_size(&mut self, size: impl Into<NodeSize>) {
        self.size = size.into();
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn size(&self) -> NodeSize {
        self.size
    }

    /// Draws a node centered at `position`.
    ///
    /// The outer shape goes on the brush's z-order and the inner glyph one
    /// above it. Recurrent neural-network units also get a self-loop below
    /// everything else.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown style key, geometry or
    /// size mismatch. An unknown inner glyph is reported after the outer
    /// shape has been drawn; that shape stays on the surface.
    pub fn draw(
        &self,
        diagram: &mut Diagram,
        position: impl Into<Point>,
    ) -> Result<NodeId, NetbrushError> {
        let center = position.into();
        debug!(style = self.style.as_str(), x = center.x(), y = center.y(); "Drawing node");

        let entry = diagram.theme().entry(&self.style)?;
        let kind: GeometryKind = entry.geometry().parse()?;
        let settings = diagram.settings().node().clone();
        let half_extents = self.size.resolve(kind, settings.base_size())?;

        let fill = self.color.or(entry.color());
        let outline = kind.outline(center, half_extents, self.rotation);
        trace!(kind:? = kind, outline:? = outline; "Resolved node outline");

        let node = Node {
            style: self.style.clone(),
            entry,
            kind,
            outline,
            fill,
            half_extents,
            rotation: self.rotation,
            z_order: self.z_order,
        };

        let surface = diagram.surface_mut();
        surface.add(self.z_order, self.outer_primitive(&node, &settings));

        if let Some(glyph) = InnerGeometry::parse_optional(node.entry.inner())? {
            draw_inner_glyph(surface, glyph, &node, &settings);
        }

        if node.is_recurrent() {
            let radius = node.radius();
            let lw = settings.line_width();
            surface.add(
                SELF_LOOP_Z_ORDER,
                Primitive::new(Figure::Circle {
                    center: center.add_point(Point::new(0.0, 1.2 * radius)),
                    radius: 0.5 * radius,
                })
                .with_stroke(Some(StrokeDefinition::new(settings.edge_color(), lw))),
            );
        }

        Ok(diagram.push_node(node))
    }

    fn outer_primitive(&self, node: &Node, settings: &NodeSettings) -> Primitive {
        // Without any color the node is a ghost: no fill and no outline.
        let stroke = match (node.kind, node.fill) {
            (GeometryKind::Invisible, _) | (_, None) => None,
            _ => Some(
                StrokeDefinition::new(settings.edge_color(), settings.line_width())
                    .with_style(self.line_style.clone()),
            ),
        };
        let fill = match node.kind {
            GeometryKind::Invisible => None,
            _ => node.fill,
        };

        Primitive::new(node.outline.figure())
            .with_fill(fill)
            .with_stroke(stroke)
    }
}

const SELF_LOOP_Z_ORDER: i32 = -5;

/// Samples along the dial of a measurement glyph.
const MEASURE_ARC_SAMPLES: usize = 100;

fn draw_inner_glyph(
    surface: &mut impl Surface,
    glyph: InnerGeometry,
    node: &Node,
    settings: &NodeSettings,
) {
    let z_order = node.z_order + 1;
    let center = node.center();
    let radius = node.radius();
    let stroke = StrokeDefinition::new(settings.inner_edge_color(), settings.inner_line_width());

    let outlined = |figure: Figure| {
        Primitive::new(figure)
            .with_fill(settings.inner_fill_color())
            .with_stroke(Some(stroke.clone()))
    };
    let line = |points: Vec<Point>| {
        Primitive::new(Figure::Polyline { points }).with_stroke(Some(stroke.clone()))
    };
    let segment = |from: Point, to: Point| {
        let [from, to] = rotate([from, to], node.rotation);
        line(vec![center.add_point(from), center.add_point(to)])
    };

    let primitives = match glyph {
        InnerGeometry::Circle => vec![outlined(Figure::Circle {
            center,
            radius: 0.7 * radius,
        })],
        InnerGeometry::Triangle => vec![outlined(Figure::Polygon {
            points: rotate(UNIT_TRIANGLE, node.rotation)
                .map(|vertex| center.add_point(vertex.scale(0.7 * radius)))
                .to_vec(),
        })],
        InnerGeometry::Dot => vec![
            Primitive::new(Figure::Circle {
                center,
                radius: 0.15 * radius,
            })
            .with_fill(Some(settings.inner_edge_color()))
            .with_stroke(Some(stroke.clone())),
        ],
        InnerGeometry::Plus => vec![
            segment(Point::new(-radius, 0.0), Point::new(radius, 0.0)),
            segment(Point::new(0.0, -radius), Point::new(0.0, radius)),
        ],
        InnerGeometry::VBar => vec![segment(Point::new(0.0, -radius), Point::new(0.0, radius))],
        InnerGeometry::Cross => {
            let r = radius / 2.0_f32.sqrt();
            vec![
                segment(Point::new(-r, -r), Point::new(r, r)),
                segment(Point::new(r, -r), Point::new(-r, r)),
            ]
        }
        InnerGeometry::Measure => {
            let extents = node.outline.extents();
            let (width, height) = (extents.width(), extents.height());
            let needle = line(vec![
                center.add_point(Point::new(0.0, -0.4 * height)),
                center.add_point(Point::new(0.35 * width, 0.35 * height)),
            ]);

            // Parabolic dial y = r² - t² for t in [-0.4w, 0.4w], lowered by 0.4r.
            let r = 0.5 * height;
            let dial = (0..MEASURE_ARC_SAMPLES)
                .map(|i| {
                    let frac = i as f32 / (MEASURE_ARC_SAMPLES - 1) as f32;
                    let t = -0.4 * width + 0.8 * width * frac;
                    center.add_point(Point::new(t, r * r - t * t - 0.4 * r))
                })
                .collect();
            vec![needle, line(dial)]
        }
    };

    for primitive in primitives {
        surface.add(z_order, primitive);
    }
}

/// A drawn node.
///
/// Nodes are immutable. Two nodes drawn with the same brush at the same
/// position compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    style: String,
    entry: ThemeEntry,
    kind: GeometryKind,
    outline: Outline,
    fill: Option<Color>,
    half_extents: Size,
    rotation: f32,
    z_order: i32,
}

impl Node {
    pub fn center(&self) -> Point {
        self.outline.center()
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn theme_entry(&self) -> &ThemeEntry {
        &self.entry
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Resolved fill, `None` for ghost nodes.
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    /// Radius-like half extents after scaling.
    pub fn half_extents(&self) -> Size {
        self.half_extents
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    /// Where a ray from the center along `direction` leaves the outline.
    pub fn boundary_point(&self, direction: Point) -> Result<Point, GeometryError> {
        self.outline.boundary_point(direction)
    }

    fn radius(&self) -> f32 {
        self.half_extents.min_side()
    }

    fn is_recurrent(&self) -> bool {
        self.style.starts_with(NEURAL_NETWORK_PREFIX)
            && self
                .fill
                .is_some_and(|fill| fill.same_rgba(palette::recurrent_accent()))
    }
}
