//! Netbrush - node and edge brushes for schematic network diagrams.
//!
//! Neural-network sketches, tensor-network diagrams and quantum circuits are
//! drawn with two brushes. A [`NodeBrush`] stamps a themed shape at a
//! position; an [`EdgeBrush`] connects two endpoints with the lines and
//! arrowheads described by a short style such as `->`, `<.>` or `=`.
//! Positions are always supplied by the caller; there is no layout.
//!
//! # Example
//!
//! ```
//! use netbrush::{Diagram, EdgeBrush, NodeBrush};
//!
//! let mut diagram = Diagram::new();
//!
//! let input = NodeBrush::new("nn.input");
//! let output = NodeBrush::new("nn.output");
//! let x = input.draw(&mut diagram, (0.0, 0.0)).unwrap();
//! let y = output.draw(&mut diagram, (0.0, 1.5)).unwrap();
//!
//! EdgeBrush::new("->").connect(&mut diagram, x, y).unwrap();
//!
//! let svg = diagram.render_svg();
//! assert!(svg.contains("<polygon"));
//! ```

pub mod config;
pub mod diagram;
pub mod edge;
pub mod error;
pub mod node;
pub mod pin;
pub mod shape;
pub mod theme;

pub use netbrush_core::{color, draw, geometry};

pub use diagram::{Diagram, EdgeId, NodeId};
pub use edge::{Edge, EdgeBrush};
pub use error::{ConfigurationError, GeometryError, NetbrushError};
pub use node::{Node, NodeBrush};
