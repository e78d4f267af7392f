//! End-to-end scenarios for the node and edge brushes.

use float_cmp::assert_approx_eq;
use proptest::prelude::*;

use netbrush::{
    ConfigurationError, Diagram, EdgeBrush, GeometryError, NetbrushError, NodeBrush,
    config::RenderSettings,
    draw::Figure,
    geometry::Point,
    node::{NodeSize, SizeToken},
    theme::Theme,
};

const HEAD_LENGTH: f32 = 0.06;
const HEAD_WIDTH: f32 = 0.04;

#[test]
fn test_size_table_scaled_by_base_size() {
    let settings = RenderSettings::from_toml_str("[node]\nbase_size = 1.5\n").unwrap();
    let mut diagram = Diagram::with_theme(Theme::builtin(), settings);

    let mut previous = f32::INFINITY;
    for (i, token) in SizeToken::ALL.iter().enumerate() {
        let id = NodeBrush::new("nn.hidden")
            .with_size(*token)
            .draw(&mut diagram, (i as f32 * 3.0, 0.0))
            .unwrap();
        let radius = diagram.node(id).unwrap().half_extents().width();

        assert_approx_eq!(f32, radius, token.scale() * 1.5);
        assert!(radius < previous, "{token:?} is not smaller than its predecessor");
        previous = radius;
    }
}

#[test]
fn test_circle_arrow_between_nodes() {
    let mut diagram = Diagram::new();
    let brush = NodeBrush::new("nn.hidden").with_size(SizeToken::Normal);
    let a = brush.draw(&mut diagram, (0.0, 0.0)).unwrap();
    let b = brush.draw(&mut diagram, (2.0, 0.0)).unwrap();

    let id = EdgeBrush::new("->").connect(&mut diagram, a, b).unwrap();
    let edge = diagram.edge(id).unwrap();

    assert_approx_eq!(f32, edge.start().x(), 0.3);
    assert_approx_eq!(f32, edge.end().x(), 2.0 - 0.3);
    assert_approx_eq!(f32, edge.start().y(), 0.0);

    assert_eq!(edge.arrow_heads().len(), 1);
    let tip = edge.arrow_heads()[0].tip();
    assert!(tip.x() > 1.6 && tip.x() <= edge.end().x(), "tip at {tip:?}");

    // The line stops one head length short of the end.
    assert_eq!(edge.lines().len(), 1);
    assert_approx_eq!(
        f32,
        edge.lines()[0].end.x(),
        edge.end().x() - HEAD_LENGTH,
        epsilon = 1e-6
    );
}

#[test]
fn test_double_line_scenario() {
    let mut diagram = Diagram::new();
    let id = EdgeBrush::new("==")
        .connect(&mut diagram, (0.0, 0.0), (4.0, 0.0))
        .unwrap();
    let edge = diagram.edge(id).unwrap();

    assert!(edge.arrow_heads().is_empty());
    assert_eq!(edge.lines().len(), 2);

    let offsets: Vec<f32> = edge.lines().iter().map(|line| line.start.y()).collect();
    assert_approx_eq!(f32, offsets[0], 0.4 * HEAD_WIDTH);
    assert_approx_eq!(f32, offsets[1], -0.4 * HEAD_WIDTH);

    for line in edge.lines() {
        assert!(!line.dashed);
        assert_approx_eq!(f32, line.start.x(), 0.0);
        assert_approx_eq!(f32, line.end.x(), 4.0);
        assert_approx_eq!(f32, line.start.y(), line.end.y());
    }

    let polylines = diagram
        .canvas()
        .items()
        .filter(|(_, primitive)| matches!(primitive.figure(), Figure::Polyline { .. }))
        .count();
    assert_eq!(polylines, 2);
}

#[test]
fn test_dashed_scenario() {
    let mut diagram = Diagram::new();
    let id = EdgeBrush::new(".")
        .connect(&mut diagram, (1.0, 1.0), (1.0, 3.0))
        .unwrap();
    let edge = diagram.edge(id).unwrap();

    assert!(edge.arrow_heads().is_empty());
    assert_eq!(edge.lines().len(), 1);
    let line = edge.lines()[0];
    assert!(line.dashed);
    assert_eq!(line.start, Point::new(1.0, 1.0));
    assert_eq!(line.end, Point::new(1.0, 3.0));

    let (_, primitive) = diagram.canvas().items().next().unwrap();
    assert!(primitive.stroke().unwrap().style().is_dashed());
}

#[test]
fn test_invalid_grammar_fails_before_drawing() {
    let mut diagram = Diagram::new();
    let brush = NodeBrush::new("nn.hidden");
    let a = brush.draw(&mut diagram, (0.0, 0.0)).unwrap();
    let b = brush.draw(&mut diagram, (2.0, 0.0)).unwrap();
    let drawn = diagram.canvas().len();

    let err = EdgeBrush::new("-#>").connect(&mut diagram, a, b).unwrap_err();

    assert!(matches!(
        err,
        NetbrushError::Configuration(ConfigurationError::InvalidGrammarCharacter {
            character: '#',
            position: 1,
            ..
        })
    ));
    assert_eq!(diagram.canvas().len(), drawn);
    assert!(diagram.edges().is_empty());
}

#[test]
fn test_zero_distance_fails() {
    let mut diagram = Diagram::new();
    let brush = NodeBrush::new("nn.hidden");
    let a = brush.draw(&mut diagram, (1.0, 1.0)).unwrap();
    let b = brush.draw(&mut diagram, (1.0, 1.0)).unwrap();

    let err = EdgeBrush::new("-").connect(&mut diagram, a, b).unwrap_err();
    assert!(matches!(
        err,
        NetbrushError::Geometry(GeometryError::ZeroLength { .. })
    ));
}

#[test]
fn test_identical_draws_on_fresh_diagrams() {
    let brush = NodeBrush::new("tn.tri_r")
        .with_size(SizeToken::Large)
        .with_rotation(0.4);

    let mut first = Diagram::new();
    let mut second = Diagram::new();
    let a = brush.draw(&mut first, (0.5, -1.0)).unwrap();
    let b = brush.draw(&mut second, (0.5, -1.0)).unwrap();

    let a = first.node(a).unwrap();
    let b = second.node(b).unwrap();
    assert_eq!(a, b);

    for step in 0..36 {
        let direction = Point::from_angle(step as f32 * 10f32.to_radians());
        assert_eq!(
            a.boundary_point(direction).unwrap(),
            b.boundary_point(direction).unwrap()
        );
    }
}

#[test]
fn test_chained_edges_through_raw_ends() {
    let mut diagram = Diagram::new();
    let first = EdgeBrush::new("->")
        .connect(&mut diagram, (0.0, 0.0), (1.0, 0.0))
        .unwrap();
    let end = diagram.edge(first).unwrap().raw_end();

    let second = EdgeBrush::new("->")
        .connect(&mut diagram, end, (2.0, 0.0))
        .unwrap();
    assert_eq!(diagram.edge(second).unwrap().start(), Point::new(1.0, 0.0));
}

#[test]
fn test_quantum_circuit_sketch_exports() {
    let mut diagram = Diagram::new();
    let control = NodeBrush::new("qc.C").with_size(SizeToken::Tiny);
    let not = NodeBrush::new("qc.NOT").with_size(SizeToken::Small);
    let box_brush = NodeBrush::new("qc.box").with_size(NodeSize::Extents(0.3, 0.8));

    let c = control.draw(&mut diagram, (1.0, 1.0)).unwrap();
    let t = not.draw(&mut diagram, (1.0, 0.0)).unwrap();
    let u = box_brush.draw(&mut diagram, (2.0, 0.5)).unwrap();
    EdgeBrush::new("-").connect(&mut diagram, c, t).unwrap();
    EdgeBrush::new("=")
        .connect(&mut diagram, u, (3.0, 0.5))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("circuit.svg");
    diagram.save_svg(&path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("</svg>"));
    assert!(svg.contains("<rect"));
    assert!(svg.contains("<polyline"));
}

fn distinct_points_strategy() -> impl Strategy<Value = (Point, Point)> {
    let coordinate = -20.0f32..20.0;
    (
        coordinate.clone(),
        coordinate.clone(),
        coordinate.clone(),
        coordinate,
    )
        .prop_map(|(x1, y1, x2, y2)| (Point::new(x1, y1), Point::new(x2, y2)))
        .prop_filter("points must be apart", |(p, q)| q.sub_point(*p).hypot() > 1e-3)
}

fn solid_style_strategy() -> impl Strategy<Value = String> {
    (1usize..8).prop_map(|n| "-".repeat(n))
}

fn check_solid_line_spans_boundary_points(start: Point, end: Point, style: &str) {
    let mut diagram = Diagram::new();
    let id = EdgeBrush::new(style)
        .connect(&mut diagram, start, end)
        .unwrap();
    let edge = diagram.edge(id).unwrap();

    assert_eq!(edge.lines().len(), 1);
    let line = edge.lines()[0];
    assert_eq!(line.start, edge.start());

    let tolerance = 1e-4 * end.sub_point(start).hypot().max(1.0);
    assert!(line.end.sub_point(edge.end()).hypot() <= tolerance);
    assert!((line.length() - edge.end().sub_point(edge.start()).hypot()).abs() <= tolerance);
}

proptest! {
    #[test]
    fn solid_line_spans_boundary_points(
        (start, end) in distinct_points_strategy(),
        style in solid_style_strategy(),
    ) {
        check_solid_line_spans_boundary_points(start, end, &style);
    }
}
