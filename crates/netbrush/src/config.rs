//! Rendering settings for netbrush brushes.
//!
//! This module provides the read-only settings the brushes consult while
//! drawing. All types implement [`serde::Deserialize`] with defaults on every
//! field, so a TOML file only needs to name what it changes.
//!
//! # Overview
//!
//! - [`RenderSettings`] - Top-level settings combining the sections below.
//! - [`NodeSettings`] - Outline and inner-glyph styling plus the base size.
//! - [`EdgeSettings`] - Arrowhead proportions and dash rhythm.
//! - [`ExportSettings`] - Scale and margin of the SVG output.
//!
//! # Example
//!
//! ```
//! # use netbrush::config::RenderSettings;
//! let settings = RenderSettings::from_toml_str(
//!     r#"
//!     [node]
//!     base_size = 2.0
//!
//!     [edge]
//!     arrow_head_length = 0.1
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.node().base_size(), 2.0);
//! assert_eq!(settings.edge().arrow_head_width(), 0.04);
//! ```

use std::{fs, path::Path};

use log::{debug, error, info};
use serde::Deserialize;

use netbrush_core::color::{self, Color};

use crate::error::{ConfigurationError, NetbrushError};

/// Top-level rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    node: NodeSettings,
    edge: EdgeSettings,
    export: ExportSettings,
}

impl RenderSettings {
    /// Creates settings from the three sections.
    pub fn new(node: NodeSettings, edge: EdgeSettings, export: ExportSettings) -> Self {
        Self { node, edge, export }
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] for malformed TOML, unknown keys
    /// or invalid color strings.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|err| ConfigurationError::Parse(err.to_string()))
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`NetbrushError::Io`] if the file cannot be read and a
    /// configuration error if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetbrushError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading render settings");

        let content = fs::read_to_string(path).map_err(|source| {
            error!(
                path = path.display().to_string(),
                err:err = source;
                "Failed to read render settings"
            );
            NetbrushError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let settings = Self::from_toml_str(&content)?;
        debug!(settings:?; "Render settings loaded");
        Ok(settings)
    }

    pub fn node(&self) -> &NodeSettings {
        &self.node
    }

    pub fn edge(&self) -> &EdgeSettings {
        &self.edge
    }

    pub fn export(&self) -> &ExportSettings {
        &self.export
    }
}

/// Settings shared by every node drawn through a diagram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeSettings {
    /// Outline width of the outer shape.
    line_width: f32,

    /// Outline color of the outer shape.
    edge_color: Color,

    /// Fill of inner glyphs; `"none"` leaves them hollow.
    #[serde(deserialize_with = "color::deserialize_optional")]
    inner_fill_color: Option<Color>,

    /// Outline color of inner glyphs.
    inner_edge_color: Color,

    /// Outline width of inner glyphs.
    inner_line_width: f32,

    /// Scale applied to every node size.
    base_size: f32,
}

impl NodeSettings {
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn edge_color(&self) -> Color {
        self.edge_color
    }

    pub fn inner_fill_color(&self) -> Option<Color> {
        self.inner_fill_color
    }

    pub fn inner_edge_color(&self) -> Color {
        self.inner_edge_color
    }

    pub fn inner_line_width(&self) -> f32 {
        self.inner_line_width
    }

    pub fn base_size(&self) -> f32 {
        self.base_size
    }

    /// Returns a copy with a different outline width.
    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    /// Returns a copy with a different base size.
    pub fn with_base_size(mut self, base_size: f32) -> Self {
        self.base_size = base_size;
        self
    }

    /// Returns a copy with a different inner-glyph fill.
    pub fn with_inner_fill_color(mut self, color: Option<Color>) -> Self {
        self.inner_fill_color = color;
        self
    }
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            edge_color: Color::default(),
            inner_fill_color: None,
            inner_edge_color: Color::default(),
            inner_line_width: 0.7,
            base_size: 1.0,
        }
    }
}

/// Settings shared by every edge drawn through a diagram.
///
/// Arrowhead lengths are in diagram units per unit of line width.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdgeSettings {
    arrow_head_length: f32,
    arrow_head_width: f32,
    /// Gap-to-dash ratio of dashed segments.
    edge_segment_ratio: f32,
}

impl EdgeSettings {
    pub fn arrow_head_length(&self) -> f32 {
        self.arrow_head_length
    }

    pub fn arrow_head_width(&self) -> f32 {
        self.arrow_head_width
    }

    pub fn edge_segment_ratio(&self) -> f32 {
        self.edge_segment_ratio
    }

    /// Returns a copy with different arrowhead proportions.
    pub fn with_arrow_head(mut self, length: f32, width: f32) -> Self {
        self.arrow_head_length = length;
        self.arrow_head_width = width;
        self
    }
}

impl Default for EdgeSettings {
    fn default() -> Self {
        Self {
            arrow_head_length: 0.06,
            arrow_head_width: 0.04,
            edge_segment_ratio: 0.5,
        }
    }
}

/// Settings for SVG output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    /// Output pixels per diagram unit.
    pixels_per_unit: f32,
    /// Blank space around the drawing, in diagram units.
    margin: f32,
    /// Font size of text annotations, in pixels.
    font_size: f32,
}

impl ExportSettings {
    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pixels_per_unit: 100.0,
            margin: 0.5,
            font_size: 14.0,
        }
    }
}
