//! The diagram session.
//!
//! A [`Diagram`] owns everything a drawing is made of: the drawing surface,
//! the nodes and edges drawn so far, the theme catalog and the render
//! settings. Brushes borrow it mutably for each draw call and hand back
//! lightweight [`NodeId`]/[`EdgeId`] indices.
//!
//! # Example
//!
//! ```
//! # use netbrush::{Diagram, EdgeBrush, NodeBrush, diagram::TextPlacement};
//! let mut diagram = Diagram::new();
//! let node = NodeBrush::new("tn.mps").draw(&mut diagram, (0.0, 0.0)).unwrap();
//! let leg = EdgeBrush::new("-")
//!     .connect(&mut diagram, node, (0.0, -1.0))
//!     .unwrap();
//!
//! diagram.node_text(node, "A", TextPlacement::Right).unwrap();
//! diagram.edge_text(leg, "i", TextPlacement::Left).unwrap();
//!
//! let svg = diagram.render_svg();
//! assert!(svg.contains("<svg"));
//! ```

use std::{fmt, path::Path, str::FromStr};

use log::{debug, error, info};

use netbrush_core::{
    color::Color,
    draw::{Canvas, Figure, Primitive, Surface, TextAnchor, TextBaseline},
    geometry::Point,
};

use crate::{
    config::RenderSettings,
    edge::Edge,
    error::{ConfigurationError, GeometryError, NetbrushError},
    node::Node,
    theme::{Theme, ThemeCatalog},
};

/// Gap between a target and a text label placed beside it, in diagram units.
const TEXT_GAP: f32 = 0.05;

/// Index of a node in its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge in its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a text label goes relative to its target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextPlacement {
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl FromStr for TextPlacement {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Self::Center),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ConfigurationError::UnknownTextPlacement(s.to_string())),
        }
    }
}

impl fmt::Display for TextPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        };
        write!(f, "{name}")
    }
}

/// A drawing session.
#[derive(Debug)]
pub struct Diagram {
    canvas: Canvas,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    theme: Box<dyn ThemeCatalog>,
    settings: RenderSettings,
}

impl Diagram {
    /// Creates an empty diagram with the builtin theme and default settings.
    pub fn new() -> Self {
        Self::with_theme(Theme::builtin(), RenderSettings::default())
    }

    /// Creates an empty diagram with a custom theme catalog and settings.
    pub fn with_theme(theme: impl ThemeCatalog + 'static, settings: RenderSettings) -> Self {
        Self {
            canvas: Canvas::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            theme: Box::new(theme),
            settings,
        }
    }

    pub fn theme(&self) -> &dyn ThemeCatalog {
        self.theme.as_ref()
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Everything drawn so far.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownNode`] for an id from another diagram.
    pub fn node(&self, id: NodeId) -> Result<&Node, GeometryError> {
        self.nodes.get(id.0).ok_or(GeometryError::UnknownNode(id))
    }

    /// Looks up an edge.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownEdge`] for an id from another diagram.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GeometryError> {
        self.edges.get(id.0).ok_or(GeometryError::UnknownEdge(id))
    }

    pub(crate) fn surface_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) -> EdgeId {
        self.edges.push(edge);
        EdgeId(self.edges.len() - 1)
    }

    /// Labels a node.
    ///
    /// Centered text sits on the node; other placements put it just outside
    /// the node's extents. The label goes above the node's inner glyph.
    pub fn node_text(
        &mut self,
        id: NodeId,
        text: impl Into<String>,
        placement: TextPlacement,
    ) -> Result<(), NetbrushError> {
        let node = self.node(id)?;
        let center = node.center();
        let extents = node.outline().extents();
        let half_width = extents.width() / 2.0 + TEXT_GAP;
        let half_height = extents.height() / 2.0 + TEXT_GAP;

        let (offset, anchor, baseline) = match placement {
            TextPlacement::Center => (Point::default(), TextAnchor::Middle, TextBaseline::Middle),
            TextPlacement::Left => (
                Point::new(-half_width, 0.0),
                TextAnchor::End,
                TextBaseline::Middle,
            ),
            TextPlacement::Right => (
                Point::new(half_width, 0.0),
                TextAnchor::Start,
                TextBaseline::Middle,
            ),
            TextPlacement::Top => (
                Point::new(0.0, half_height),
                TextAnchor::Middle,
                TextBaseline::Bottom,
            ),
            TextPlacement::Bottom => (
                Point::new(0.0, -half_height),
                TextAnchor::Middle,
                TextBaseline::Top,
            ),
        };

        let z_order = node.z_order() + 2;
        self.add_text(center.add_point(offset), text.into(), anchor, baseline, z_order);
        Ok(())
    }

    /// Labels an edge.
    ///
    /// `Left` and `Top` put the text on the left of the direction of
    /// travel, `Right` and `Bottom` on the right.
    pub fn edge_text(
        &mut self,
        id: EdgeId,
        text: impl Into<String>,
        placement: TextPlacement,
    ) -> Result<(), NetbrushError> {
        let edge = self.edge(id)?;
        let normal = edge.tangent().perpendicular();
        let offset = match placement {
            TextPlacement::Center => Point::default(),
            TextPlacement::Left | TextPlacement::Top => normal.scale(TEXT_GAP * 2.0),
            TextPlacement::Right | TextPlacement::Bottom => normal.scale(-TEXT_GAP * 2.0),
        };

        // Lean the text away from the line.
        let anchor = match offset.x() {
            x if x > f32::EPSILON => TextAnchor::Start,
            x if x < -f32::EPSILON => TextAnchor::End,
            _ => TextAnchor::Middle,
        };
        let baseline = match offset.y() {
            y if y > f32::EPSILON => TextBaseline::Bottom,
            y if y < -f32::EPSILON => TextBaseline::Top,
            _ => TextBaseline::Middle,
        };

        let position = edge.midpoint().add_point(offset);
        let z_order = edge.z_order() + 1;
        self.add_text(position, text.into(), anchor, baseline, z_order);
        Ok(())
    }

    fn add_text(
        &mut self,
        position: Point,
        content: String,
        anchor: TextAnchor,
        baseline: TextBaseline,
        z_order: i32,
    ) {
        debug!(content = content.as_str(), x = position.x(), y = position.y(); "Adding text");
        let font_size = self.settings.export().font_size();
        self.canvas.add(
            z_order,
            Primitive::new(Figure::Text {
                position,
                content,
                font_size,
                anchor,
                baseline,
            })
            .with_fill(Some(Color::default())),
        );
    }

    /// Renders the diagram to an SVG document string.
    pub fn render_svg(&self) -> String {
        let export = self.settings.export();
        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            primitives = self.canvas.len();
            "Rendering diagram to SVG"
        );
        self.canvas
            .to_document(export.pixels_per_unit(), export.margin())
            .to_string()
    }

    /// Writes the diagram as an SVG file.
    ///
    /// # Errors
    ///
    /// Returns [`NetbrushError::Io`] if the file cannot be written.
    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<(), NetbrushError> {
        let path = path.as_ref();
        let export = self.settings.export();
        let document = self
            .canvas
            .to_document(export.pixels_per_unit(), export.margin());

        svg::save(path, &document).map_err(|source| {
            error!(path = path.display().to_string(), err:err = source; "Failed to write SVG");
            NetbrushError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!(path = path.display().to_string(); "SVG exported successfully");
        Ok(())
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}
