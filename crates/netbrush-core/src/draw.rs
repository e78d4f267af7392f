//! Drawing surface and vector primitives.
//!
//! Brushes turn diagram elements into [`Primitive`]s and add them to a
//! [`Surface`] with a z-order. [`Canvas`] is the in-memory surface that keeps
//! every primitive and renders the lot to SVG.

mod canvas;
mod primitive;
mod stroke;

pub use canvas::{Canvas, Surface, SvgNode};
pub use primitive::{Figure, Primitive, TextAnchor, TextBaseline};
pub use stroke::{StrokeDefinition, StrokeStyle};
