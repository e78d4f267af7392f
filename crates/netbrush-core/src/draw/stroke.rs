//! Outline and line strokes.
//!
//! Widths are in output pixels, so a width of 1 stays a hairline however far
//! the diagram is scaled. Dash lengths follow the same rule.

use std::str::FromStr;

use crate::color::Color;

/// Dash lengths of [`StrokeStyle::Dashed`], in pixels.
const DEFAULT_DASH: [f32; 2] = [5.0, 5.0];

/// How a stroke is broken up along its length.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// Even dashes of a fixed length.
    Dashed,
    /// Alternating on/off lengths, repeated along the line.
    Pattern(Vec<f32>),
}

impl StrokeStyle {
    /// The dash pattern of a dashed edge run drawn `width` pixels wide.
    ///
    /// Dashes are four line widths long and the gaps `gap_ratio` times that.
    ///
    /// ```
    /// use netbrush_core::draw::StrokeStyle;
    ///
    /// let style = StrokeStyle::dash_pattern(2.0, 0.5);
    /// assert_eq!(style.to_svg_value(), Some("8,4".to_string()));
    /// ```
    pub fn dash_pattern(width: f32, gap_ratio: f32) -> Self {
        let dash = 4.0 * width.max(0.25);
        Self::Pattern(vec![dash, dash * gap_ratio.max(0.0)])
    }

    pub fn is_dashed(&self) -> bool {
        *self != Self::Solid
    }

    /// Value of the SVG `stroke-dasharray` attribute; `None` when solid.
    pub fn to_svg_value(&self) -> Option<String> {
        let lengths: &[f32] = match self {
            Self::Solid => return None,
            Self::Dashed => &DEFAULT_DASH,
            Self::Pattern(lengths) => lengths,
        };
        let parts: Vec<String> = lengths.iter().map(f32::to_string).collect();
        Some(parts.join(","))
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            other => Err(format!("unknown line style `{other}`, expected solid or dashed")),
        }
    }
}

/// Color, width and dash style of an outline or line.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// A solid stroke.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Sets the `stroke*` attributes of an SVG element from a [`StrokeDefinition`].
///
/// ```
/// use netbrush_core::{apply_stroke, color::Color, draw::StrokeDefinition};
/// use svg::node::element::Line;
///
/// let stroke = StrokeDefinition::new(Color::default(), 2.0);
/// let line = apply_stroke!(Line::new(), &stroke);
/// assert!(line.to_string().contains(r#"stroke-width="2""#));
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke = $stroke;
        let elem = $element
            .set("stroke", stroke.color().to_string())
            .set("stroke-opacity", stroke.color().alpha())
            .set("stroke-width", stroke.width());
        match stroke.style().to_svg_value() {
            Some(dashes) => elem.set("stroke-dasharray", dashes),
            None => elem,
        }
    }};
}
