//! Z-ordered drawing surface with SVG output.
//!
//! This module provides the [`Surface`] trait brushes draw onto and the
//! [`Canvas`] implementation that collects primitives and renders them.
//!
//! # Overview
//!
//! Every primitive is added together with an integer z-order. When rendered,
//! primitives are emitted from the lowest z-order to the highest; primitives
//! sharing a z-order keep their insertion order.
//!
//! # Example
//!
//! ```
//! # use netbrush_core::draw::{Canvas, Figure, Primitive, Surface};
//! # use netbrush_core::geometry::Point;
//! let mut canvas = Canvas::new();
//!
//! let dot = Primitive::new(Figure::Circle { center: Point::new(0.0, 0.0), radius: 1.0 });
//! canvas.add(1, dot.clone());
//! canvas.add(-5, dot);
//!
//! let groups = canvas.render(100.0);
//! assert_eq!(groups.len(), 2); // one group per z-order
//! ```

use log::trace;

use crate::{
    draw::Primitive,
    geometry::{Bounds, Size},
};

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// An abstract 2D drawing surface.
///
/// Brushes only ever add to a surface; nothing is removed or reordered.
pub trait Surface {
    /// Adds a primitive at the given z-order.
    fn add(&mut self, z_order: i32, primitive: Primitive);
}

/// Collects primitives by z-order and renders them to SVG.
#[derive(Debug, Default, Clone)]
pub struct Canvas {
    items: Vec<(i32, Primitive)>,
}

impl Canvas {
    /// Creates a new empty `Canvas`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of primitives on the canvas.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over `(z_order, primitive)` pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (i32, &Primitive)> {
        self.items.iter().map(|(z, primitive)| (*z, primitive))
    }

    /// Smallest bounds containing every primitive as rendered at
    /// `pixels_per_unit`, `None` for an empty canvas.
    pub fn bounds(&self, pixels_per_unit: f32) -> Option<Bounds> {
        self.items
            .iter()
            .filter_map(|(_, primitive)| primitive.figure().rendered_bounds(pixels_per_unit))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Renders all primitives to SVG groups.
    ///
    /// Each z-order becomes an SVG `<g>` element with a `data-zorder`
    /// attribute. Groups are ordered bottom to top.
    pub fn render(&self, pixels_per_unit: f32) -> Vec<SvgNode> {
        let mut ordered: Vec<&(i32, Primitive)> = self.items.iter().collect();
        // Stable: equal z-orders keep insertion order.
        ordered.sort_by_key(|(z, _)| *z);

        let mut result = Vec::new();
        let mut current: Option<(i32, svg::node::element::Group)> = None;

        for (z, primitive) in ordered {
            let node = primitive.render_to_svg(pixels_per_unit);
            current = match current {
                Some((layer, group)) if layer == *z => Some((layer, group.add(node))),
                previous => {
                    if let Some((_, group)) = previous {
                        result.push(Box::new(group) as SvgNode);
                    }
                    let group = svg::node::element::Group::new()
                        .set("data-zorder", *z)
                        .add(node);
                    Some((*z, group))
                }
            };
        }

        if let Some((_, group)) = current {
            result.push(Box::new(group) as SvgNode);
        }

        result
    }

    /// Renders the canvas to a complete SVG document.
    ///
    /// The view box is fitted to the drawn primitives plus `margin` diagram
    /// units on each side.
    pub fn to_document(&self, pixels_per_unit: f32, margin: f32) -> svg::Document {
        let bounds = self
            .bounds(pixels_per_unit)
            .unwrap_or_else(|| Bounds::new_from_center(Default::default(), Size::default()))
            .expand(margin);

        let width = bounds.width() * pixels_per_unit;
        let height = bounds.height() * pixels_per_unit;
        // The y axis flips, so the diagram's max_y is the top of the view box.
        let view_box = format!(
            "{} {} {} {}",
            bounds.min_x() * pixels_per_unit,
            -bounds.max_y() * pixels_per_unit,
            width,
            height
        );
        trace!(view_box = view_box.as_str(), primitives = self.len(); "Rendering canvas");

        self.render(pixels_per_unit)
            .into_iter()
            .fold(
                svg::Document::new()
                    .set("viewBox", view_box)
                    .set("width", width)
                    .set("height", height),
                |doc, group| doc.add(group),
            )
    }
}

impl Surface for Canvas {
    fn add(&mut self, z_order: i32, primitive: Primitive) {
        self.items.push((z_order, primitive));
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        color::Color,
        draw::{Figure, TextAnchor, TextBaseline},
        geometry::Point,
    };

    fn dot(x: f32, y: f32) -> Primitive {
        Primitive::new(Figure::Circle {
            center: Point::new(x, y),
            radius: 0.5,
        })
        .with_fill(Some(Color::default()))
    }

    #[test]
    fn test_canvas_new() {
        let canvas = Canvas::new();
        assert!(canvas.is_empty());
        assert!(canvas.bounds(1.0).is_none());
        assert!(canvas.render(1.0).is_empty());
    }

    #[test]
    fn test_canvas_add() {
        let mut canvas = Canvas::new();
        canvas.add(0, dot(0.0, 0.0));
        canvas.add(3, dot(1.0, 0.0));

        assert_eq!(canvas.len(), 2);
        let z_orders: Vec<i32> = canvas.items().map(|(z, _)| z).collect();
        assert_eq!(z_orders, vec![0, 3]);
    }

    #[test]
    fn test_canvas_render_groups_by_z_order() {
        let mut canvas = Canvas::new();
        canvas.add(2, dot(0.0, 0.0));
        canvas.add(-5, dot(1.0, 0.0));
        canvas.add(2, dot(2.0, 0.0));

        let groups = canvas.render(10.0);
        assert_eq!(groups.len(), 2);

        let rendered: String = groups.iter().map(|g| g.to_string()).collect();
        let lowest = rendered.find(r#"data-zorder="-5""#).unwrap();
        let highest = rendered.find(r#"data-zorder="2""#).unwrap();
        assert!(lowest < highest);
    }

    #[test]
    fn test_canvas_render_keeps_insertion_order_within_layer() {
        let mut canvas = Canvas::new();
        canvas.add(1, dot(7.0, 0.0));
        canvas.add(1, dot(3.0, 0.0));

        let rendered: String = canvas.render(1.0).iter().map(|g| g.to_string()).collect();
        let first = rendered.find(r#"cx="7""#).unwrap();
        let second = rendered.find(r#"cx="3""#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_canvas_bounds() {
        let mut canvas = Canvas::new();
        canvas.add(0, dot(0.0, 0.0));
        canvas.add(0, dot(4.0, 2.0));

        let bounds = canvas.bounds(100.0).unwrap();
        assert_approx_eq!(f32, bounds.min_x(), -0.5);
        assert_approx_eq!(f32, bounds.max_x(), 4.5);
        assert_approx_eq!(f32, bounds.max_y(), 2.5);
    }

    #[test]
    fn test_canvas_to_document() {
        let mut canvas = Canvas::new();
        canvas.add(0, dot(0.0, 0.0));

        let svg = canvas.to_document(100.0, 0.5).to_string();

        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"viewBox="-100 -100 200 200""#), "{svg}");
    }

    #[test]
    fn test_canvas_bounds_include_text_extent() {
        let mut canvas = Canvas::new();
        canvas.add(0, dot(0.0, 0.0));
        canvas.add(
            1,
            Primitive::new(Figure::Text {
                position: Point::new(0.5, 0.0),
                content: "0123456789".to_string(),
                font_size: 10.0,
                anchor: TextAnchor::Start,
                baseline: TextBaseline::Middle,
            }),
        );

        // Ten glyphs of 6px each at 10px per unit.
        let bounds = canvas.bounds(10.0).unwrap();
        assert_approx_eq!(f32, bounds.max_x(), 6.5, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.min_x(), -0.5);
    }
}
