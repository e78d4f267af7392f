//! netbrush core types
//!
//! This crate provides the foundational types the netbrush brushes draw with:
//!
//! - **Colors**: CSS color parsing and comparison ([`color::Color`])
//! - **Geometry**: points, vectors, bounds and rotation ([`geometry`] module)
//! - **Draw**: strokes, vector primitives and the z-ordered drawing surface
//!   ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
