//! Style catalogs mapping style keys to node appearance.
//!
//! A style key such as `nn.input` or `qc.measure` names a [`ThemeEntry`]: a
//! base color and the tokens of the outer and inner geometry. Tokens stay raw
//! until a node is drawn, so a catalog can be loaded without validating every
//! entry up front.
//!
//! Key families in the builtin catalog:
//!
//! - `nn.` neural-network units
//! - `tn.` tensor-network tensors
//! - `qc.` quantum-circuit gates
//! - `art.` decorative shapes
//!
//! # Example
//!
//! ```
//! # use netbrush::theme::{Theme, ThemeCatalog};
//! let mut theme = Theme::builtin();
//! theme.extend(
//!     Theme::from_toml_str(
//!         r##"
//!         ["my.gate"]
//!         color = "#ffcc00"
//!         geometry = "rectangle-round"
//!         inner = "dot"
//!         "##,
//!     )
//!     .unwrap(),
//! );
//!
//! assert_eq!(theme.entry("my.gate").unwrap().geometry(), "rectangle-round");
//! assert!(theme.entry("nn.input").is_ok());
//! assert!(theme.entry("nn.missing").is_err());
//! ```

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use netbrush_core::color::{self, Color};

use crate::error::ConfigurationError;

/// Colors of the builtin palette.
pub mod palette {
    use std::sync::OnceLock;

    use netbrush_core::color::Color;

    pub const GREEN: &str = "#55cc77";
    pub const RED: &str = "#ff7777";
    pub const BLUE: &str = "#3399dd";
    pub const YELLOW: &str = "#ffdd55";
    pub const VIOLET: &str = "#bb88ee";
    pub const WHITE: &str = "#ffffff";
    pub const BLACK: &str = "#000000";
    pub const GRAY: &str = "#aaaaaa";

    /// Fill color that marks recurrent units.
    pub const RECURRENT_ACCENT: &str = BLUE;

    static RECURRENT_ACCENT_COLOR: OnceLock<Color> = OnceLock::new();

    /// [`RECURRENT_ACCENT`], parsed once.
    pub fn recurrent_accent() -> Color {
        *RECURRENT_ACCENT_COLOR.get_or_init(|| {
            Color::new(RECURRENT_ACCENT).expect("palette colors are valid CSS colors")
        })
    }
}

/// Prefix of the style family that gets recurrent self-loops.
pub const NEURAL_NETWORK_PREFIX: &str = "nn.";

/// Appearance of one style key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeEntry {
    /// Base fill; `None` draws a ghost node unless the brush overrides it.
    #[serde(default, deserialize_with = "color::deserialize_optional")]
    color: Option<Color>,
    geometry: String,
    #[serde(default)]
    inner: Option<String>,
}

impl ThemeEntry {
    pub fn new(color: Option<Color>, geometry: impl Into<String>, inner: Option<&str>) -> Self {
        Self {
            color,
            geometry: geometry.into(),
            inner: inner.map(str::to_string),
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Raw outer geometry token.
    pub fn geometry(&self) -> &str {
        &self.geometry
    }

    /// Raw inner geometry token, `None` when absent.
    pub fn inner(&self) -> Option<&str> {
        self.inner.as_deref()
    }
}

/// Lookup of style keys.
pub trait ThemeCatalog: fmt::Debug {
    /// Returns the entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownStyle`] if the key is not known.
    fn entry(&self, key: &str) -> Result<ThemeEntry, ConfigurationError>;
}

/// An ordered catalog of style entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    entries: IndexMap<String, ThemeEntry>,
}

impl Theme {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with netbrush.
    pub fn builtin() -> Self {
        use palette::*;

        const ENTRIES: &[(&str, Option<&str>, &str, Option<&str>)] = &[
            ("basic", None, "circle", None),
            ("box", None, "rectangle", None),
            ("invisible", None, "", None),
            // neural networks
            ("nn.input", Some(GREEN), "circle", None),
            ("nn.backfed_input", Some(YELLOW), "circle", Some("circle")),
            ("nn.noisy_input", Some(YELLOW), "circle", Some("triangle")),
            ("nn.hidden", Some(GREEN), "circle", None),
            ("nn.probablistic_hidden", Some(GREEN), "circle", Some("circle")),
            ("nn.spiking_hidden", Some(GREEN), "circle", Some("triangle")),
            ("nn.output", Some(RED), "circle", None),
            ("nn.match_input_output", Some(RED), "circle", Some("circle")),
            ("nn.recurrent", Some(BLUE), "circle", None),
            ("nn.memory", Some(BLUE), "circle", Some("circle")),
            ("nn.different_memory", Some(BLUE), "circle", Some("triangle")),
            ("nn.kernel", Some(VIOLET), "circle", None),
            ("nn.convolution", Some(VIOLET), "circle", Some("circle")),
            ("nn.pooling", Some(VIOLET), "circle", Some("dot")),
            // tensor networks
            ("tn.mps", Some(BLACK), "circle", None),
            ("tn.mpo", Some(BLACK), "rectangle", None),
            ("tn.dia", Some(BLACK), "diamond", None),
            ("tn.tri", Some(BLACK), "triangle", None),
            ("tn.tri_u", Some(BLACK), "triangle-u", None),
            ("tn.tri_d", Some(BLACK), "triangle-d", None),
            ("tn.tri_l", Some(BLACK), "triangle-l", None),
            ("tn.tri_r", Some(BLACK), "triangle-r", None),
            // quantum circuits
            ("qc.C", Some(BLACK), "circle", None),
            ("qc.NC", Some(WHITE), "circle", None),
            ("qc.NOT", Some(WHITE), "circle", Some("plus")),
            ("qc.cross", None, "", Some("cross")),
            ("qc.end", None, "", Some("vbar")),
            ("qc.measure", Some(WHITE), "golden", Some("measure")),
            ("qc.basic", Some(WHITE), "square", None),
            ("qc.box", Some(WHITE), "rectangle", None),
            ("qc.wide", Some(WHITE), "rectangle-round", None),
            // decorations
            ("art.rbox", Some(GRAY), "rectangle-round", None),
            ("art.box", Some(GRAY), "rectangle", None),
            ("art.circle", Some(GRAY), "circle", None),
            ("art.dot", Some(BLACK), "circle", Some("dot")),
        ];

        let entries = ENTRIES
            .iter()
            .map(|(key, color, geometry, inner)| {
                let color = color.and_then(|color| Color::new(color).ok());
                (key.to_string(), ThemeEntry::new(color, *geometry, *inner))
            })
            .collect();
        Self { entries }
    }

    /// Parses a catalog from TOML, one table per style key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] for malformed TOML, unknown
    /// fields or invalid colors. Geometry tokens are not checked here.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        let entries: IndexMap<String, ThemeEntry> =
            toml::from_str(content).map_err(|err| ConfigurationError::Parse(err.to_string()))?;
        debug!(entries = entries.len(); "Theme catalog parsed");
        Ok(Self { entries })
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, entry: ThemeEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Merges `other` into this catalog. Entries from `other` win.
    pub fn extend(&mut self, other: Theme) {
        self.entries.extend(other.entries);
    }

    /// Style keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ThemeCatalog for Theme {
    fn entry(&self, key: &str) -> Result<ThemeEntry, ConfigurationError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownStyle(key.to_string()))
    }
}
