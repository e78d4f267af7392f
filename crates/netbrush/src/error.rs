//! Error types for netbrush operations.
//!
//! Every failure is a mistake in the calling diagram description, never a
//! transient condition, so nothing here is retried. The two families are:
//!
//! - [`ConfigurationError`]: unknown style keys, geometry tokens, grammar
//!   characters, size/geometry mismatches and unreadable configuration.
//! - [`GeometryError`]: degenerate vectors and unresolvable boundary points.
//!
//! Both lift into [`NetbrushError`] with `?`.

use std::{io, path::PathBuf};

use thiserror::Error;

use netbrush_core::geometry::Point;

use crate::diagram::{EdgeId, NodeId};

/// The main error type for netbrush operations.
#[derive(Debug, Error)]
pub enum NetbrushError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl NetbrushError {
    /// Returns `true` for configuration mistakes.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns `true` for degenerate geometry.
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry(_))
    }
}

/// A style key, token or setting that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unknown style key `{0}`")]
    UnknownStyle(String),

    #[error("unknown geometry `{0}`")]
    UnknownGeometry(String),

    #[error("unknown inner geometry `{0}`")]
    UnknownInnerGeometry(String),

    #[error("unknown size token `{0}`, valid values: huge, large, normal, small, tiny")]
    UnknownSizeToken(String),

    #[error("geometry `{geometry}` does not accept a (width, height) size")]
    SizeGeometryMismatch { geometry: String },

    #[error("invalid character `{character}` at position {position} in edge style `{style}`")]
    InvalidGrammarCharacter {
        style: String,
        character: char,
        position: usize,
    },

    #[error("edge style is empty")]
    EmptyGrammar,

    #[error("unknown pin side `{0}`, valid values: top, bottom, left, right")]
    UnknownPinSide(String),

    #[error("unknown text placement `{0}`, valid values: center, left, right, top, bottom")]
    UnknownTextPlacement(String),

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Geometry that cannot be resolved into a drawable connection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("connection from {start:?} to {end:?} has zero length")]
    ZeroLength { start: Point, end: Point },

    #[error("no boundary intersection found from {center:?} along {direction:?}")]
    NoIntersection { center: Point, direction: Point },

    #[error("node {0:?} does not belong to this diagram")]
    UnknownNode(NodeId),

    #[error("edge {0:?} does not belong to this diagram")]
    UnknownEdge(EdgeId),
}
