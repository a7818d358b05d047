// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::string::ToString;
use alloc::vec::Vec;

use kurbo::{PathEl, Point};
use peniko::color::palette::css;

use crate::coordinate::{Clock, CoordinateTransform, Linear};
use crate::dims::{Alignment, Axis, Dimensions};
use crate::error::LayoutError;
use crate::node::{Node, Operator};
use crate::pipeline::layout;
use crate::render::{Drawer, Primitive, PrimitiveKind, RenderOptions, render};
use crate::shape::ShapeGeometry;
use crate::tree::LayoutTree;
use crate::value::{Stroke, v, v_in};
use crate::{
    ConnectSpec, CoordSpec, LayerSpec, PositionSpec, RectSpec, StackSpec, connect, coord, layer,
    rect, reference, spread, stack, stack_x, stack_y,
};

fn boxed(w: f64, h: f64) -> Node {
    rect(RectSpec::new().with_w(w).with_h(h))
}

fn dims_of(tree: &LayoutTree, name: &str) -> Dimensions {
    let id = tree.find(name).unwrap();
    tree.dims(id).unwrap()
}

fn opts() -> RenderOptions {
    RenderOptions::new(400.0, 300.0)
}

#[test]
fn edge_to_edge_stack_reports_sum_plus_spacing() {
    let root = stack_y(
        5.0,
        [
            boxed(10.0, 10.0).named("a"),
            boxed(10.0, 20.0).named("b"),
            boxed(10.0, 30.0).named("c"),
        ],
    );
    let tree = layout(&opts(), root).unwrap();
    let [_, y] = tree.dims(tree.root()).unwrap();
    assert_eq!(y.extent(), 70.0, "10 + 20 + 30 + 2 * 5");
    let starts: Vec<f64> = ["a", "b", "c"].iter().map(|n| dims_of(&tree, n)[1].lo()).collect();
    assert_eq!(starts, [0.0, 15.0, 40.0]);
}

#[test]
fn start_and_end_alignment_pin_cross_axis_edges() {
    for alignment in [Alignment::Start, Alignment::End] {
        let root = stack(
            StackSpec::new(Axis::X).with_alignment(alignment),
            [boxed(5.0, 10.0).named("short"), boxed(5.0, 30.0).named("tall")],
        );
        let tree = layout(&opts(), root).unwrap();
        let own = tree.intrinsic(tree.root()).unwrap()[1];
        assert_eq!(own.extent(), 30.0);
        for name in ["short", "tall"] {
            let child = dims_of(&tree, name)[1];
            match alignment {
                Alignment::Start => assert_eq!(child.lo(), own.lo(), "{name} min at 0"),
                _ => assert_eq!(child.hi(), own.hi(), "{name} max on the container's edge"),
            }
        }
    }
}

#[test]
fn middle_alignment_shares_a_center_line() {
    let root = stack_y(0.0, [boxed(4.0, 1.0).named("narrow"), boxed(12.0, 1.0).named("wide")]);
    let tree = layout(&opts(), root).unwrap();
    assert_eq!(dims_of(&tree, "narrow")[0].mid(), dims_of(&tree, "wide")[0].mid());
}

#[test]
fn reverse_distributes_last_child_first() {
    let root = stack(
        StackSpec::new(Axis::Y).with_reverse(true),
        [boxed(1.0, 10.0).named("first"), boxed(1.0, 20.0).named("second")],
    );
    let tree = layout(&opts(), root).unwrap();
    assert_eq!(dims_of(&tree, "second")[1].lo(), 0.0);
    assert_eq!(dims_of(&tree, "first")[1].lo(), 20.0);
}

#[test]
fn nested_stacks_land_inside_their_parent() {
    let column = |name: &str| stack_y(0.0, [boxed(10.0, 5.0)]).named(name);
    let root = stack(
        StackSpec::new(Axis::X).with_alignment(Alignment::Start),
        [column("a"), column("b")],
    );
    let tree = layout(&opts(), root).unwrap();
    let a = dims_of(&tree, "a")[0];
    let b = dims_of(&tree, "b")[0];
    assert_eq!((a.lo(), a.hi()), (0.0, 10.0));
    assert_eq!((b.lo(), b.hi()), (10.0, 20.0));
    let own = tree.dims(tree.root()).unwrap()[0];
    assert_eq!((own.lo(), own.hi()), (0.0, 20.0));
}

#[test]
fn end_aligned_columns_still_stack_forwards() {
    let column = |name: &str| {
        stack(
            StackSpec::new(Axis::Y).with_alignment(Alignment::End),
            [boxed(4.0, 1.0), boxed(6.0, 1.0)],
        )
        .named(name)
    };
    let tree = layout(&opts(), stack_x(0.0, [column("a"), column("b")])).unwrap();
    let a = dims_of(&tree, "a")[0];
    let b = dims_of(&tree, "b")[0];
    assert_eq!((a.lo(), a.hi()), (0.0, 6.0));
    assert_eq!((b.lo(), b.hi()), (6.0, 12.0));
}

#[test]
fn negative_bars_stack_downwards_from_the_baseline() {
    let bar = |h: f64, name: &str| rect(RectSpec::new().with_w(1.0).with_h(v(h))).named(name);
    let tree = layout(&opts(), stack_y(0.0, [bar(-5.0, "a"), bar(-3.0, "b")])).unwrap();
    let a = dims_of(&tree, "a")[1];
    let b = dims_of(&tree, "b")[1];
    assert_eq!((a.lo(), a.hi()), (-5.0, 0.0));
    assert_eq!((b.lo(), b.hi()), (-8.0, -5.0));
    let own = tree.dims(tree.root()).unwrap()[1];
    assert_eq!((own.lo(), own.hi()), (-8.0, 0.0));
}

#[test]
fn diverging_bars_split_at_the_baseline() {
    let bar = |h: f64, name: &str| rect(RectSpec::new().with_w(1.0).with_h(v(h))).named(name);
    let root = stack_y(
        1.0,
        [bar(4.0, "up1"), bar(-2.0, "down1"), bar(3.0, "up2"), bar(-5.0, "down2")],
    );
    let tree = layout(&opts(), root).unwrap();
    let span = |n: &str| {
        let y = dims_of(&tree, n)[1];
        (y.lo(), y.hi())
    };
    assert_eq!(span("up1"), (0.0, 4.0));
    assert_eq!(span("down1"), (-2.0, 0.0));
    assert_eq!(span("up2"), (5.0, 8.0));
    assert_eq!(span("down2"), (-8.0, -3.0));
}

#[test]
fn start_alignment_keeps_negative_bars_on_the_baseline() {
    let bar = |h: f64, name: &str| rect(RectSpec::new().with_w(2.0).with_h(v(h))).named(name);
    let root = stack(
        StackSpec::new(Axis::X).with_alignment(Alignment::Start),
        [bar(3.0, "pos"), bar(-2.0, "neg")],
    );
    let tree = layout(&opts(), root).unwrap();
    let pos = dims_of(&tree, "pos")[1];
    let neg = dims_of(&tree, "neg")[1];
    assert_eq!((pos.lo(), pos.hi()), (0.0, 3.0));
    assert_eq!((neg.lo(), neg.hi()), (-2.0, 0.0));
    let own = tree.intrinsic(tree.root()).unwrap()[1];
    assert_eq!((own.lo(), own.hi()), (-2.0, 3.0));
}

#[test]
fn spread_puts_centers_spacing_apart() {
    let root = spread(
        Axis::X,
        20.0,
        [boxed(10.0, 1.0).named("a"), boxed(10.0, 1.0).named("b"), boxed(10.0, 1.0).named("c")],
    );
    let tree = layout(&opts(), root).unwrap();
    let centers: Vec<f64> = ["a", "b", "c"].iter().map(|n| dims_of(&tree, n)[0].mid()).collect();
    assert_eq!(centers, [5.0, 25.0, 45.0]);
    assert_eq!(tree.dims(tree.root()).unwrap()[0].extent(), 50.0);
}

#[test]
fn spread_children_may_overlap() {
    let root = spread(Axis::X, 4.0, [boxed(10.0, 1.0).named("a"), boxed(10.0, 1.0).named("b")]);
    let tree = layout(&opts(), root).unwrap();
    assert!(dims_of(&tree, "a")[0].hi() > dims_of(&tree, "b")[0].lo());
}

#[test]
fn shared_scale_fills_the_available_space() {
    let root = stack(
        StackSpec::new(Axis::X).with_spacing(10.0).with_shared_scale(true),
        [1.0, 2.0, 3.0].map(|w| rect(RectSpec::new().with_w(v(w)).with_h(v(w))).named(w.to_string())),
    );
    let tree = layout(&opts(), root).unwrap();
    let [x, y] = tree.dims(tree.root()).unwrap();
    assert!((x.extent() - 400.0).abs() < 1e-9, "linear solve is exact: {x:?}");
    assert!((y.extent() - 300.0).abs() < 1e-9, "cross axis solves against the height: {y:?}");
    let w1 = dims_of(&tree, "1")[0].extent();
    let w3 = dims_of(&tree, "3")[0].extent();
    assert!((w3 - 3.0 * w1).abs() < 1e-9, "one factor for every child");
}

#[test]
fn non_linear_shared_scale_is_solved_numerically() {
    // The cross-axis max of a data width and a literal width is not linear.
    let root = stack(
        StackSpec::new(Axis::Y).with_shared_scale(true),
        [
            rect(RectSpec::new().with_w(v(1.0)).with_h(v(1.0))).named("data"),
            rect(RectSpec::new().with_w(20.0).with_h(v(3.0))),
        ],
    );
    let tree = layout(&RenderOptions::new(100.0, 80.0), root).unwrap();
    let data = dims_of(&tree, "data");
    assert!((data[0].extent() - 100.0).abs() < 1e-3, "{data:?}");
    assert!((data[1].extent() - 20.0).abs() < 1e-9, "80 split 1:3");
}

#[test]
fn unreachable_shared_target_fails_to_converge() {
    let root = stack(
        StackSpec::new(Axis::Y).with_shared_scale(true),
        [
            rect(RectSpec::new().with_w(v(1.0)).with_h(v(1.0))),
            rect(RectSpec::new().with_w(20.0).with_h(v(3.0))),
        ],
    );
    let err = layout(&RenderOptions::new(10.0, 80.0), root).unwrap_err();
    assert!(
        matches!(err, LayoutError::Convergence { target, .. } if target == 10.0),
        "unexpected error: {err:?}"
    );
}

#[test]
fn shared_stack_of_zero_values_fails_to_converge() {
    let root = stack(
        StackSpec::new(Axis::Y).with_shared_scale(true),
        [rect(RectSpec::new().with_w(10.0).with_h(v(0.0)))],
    );
    let err = layout(&opts(), root).unwrap_err();
    assert!(
        matches!(err, LayoutError::Convergence { target, .. } if target == 300.0),
        "unexpected error: {err:?}"
    );
}

#[test]
fn shared_stack_of_literal_sizes_has_nothing_to_solve() {
    let root = stack(
        StackSpec::new(Axis::Y).with_shared_scale(true),
        [boxed(10.0, 4.0).named("a"), boxed(10.0, 6.0)],
    );
    let tree = layout(&opts(), root).unwrap();
    assert_eq!(tree.data_driven(tree.root()).unwrap(), [false, false]);
    assert_eq!(dims_of(&tree, "a")[1].extent(), 4.0);
    assert_eq!(tree.dims(tree.root()).unwrap()[1].extent(), 10.0);
}

#[test]
fn unsized_rect_stays_out_of_the_solve_and_fills_its_slot() {
    let root = stack(
        StackSpec::new(Axis::X).with_shared_scale(true),
        [
            rect(RectSpec::new().with_w(v(1.0)).with_h(10.0)).named("data"),
            rect(RectSpec::new().with_h(10.0)).named("filler"),
        ],
    );
    let tree = layout(&opts(), root).unwrap();
    assert_eq!(dims_of(&tree, "data")[0].extent(), 400.0, "solved as if the filler were absent");
    assert_eq!(dims_of(&tree, "filler")[0].extent(), 200.0, "an equal share of the width");
}

#[test]
fn layout_is_local_under_sibling_permutation() {
    let x = || {
        stack(
            StackSpec::new(Axis::X).with_spacing(2.0),
            [boxed(3.0, 4.0).named("x1"), boxed(5.0, 1.0).named("x2")],
        )
        .named("x")
    };
    let y = || boxed(7.0, 2.0).named("y");
    let z = || stack_y(1.0, [boxed(2.0, 2.0).named("z1"), boxed(6.0, 3.0)]).named("z");

    let a = layout(&opts(), layer(LayerSpec::new(), [x(), y(), z()])).unwrap();
    let b = layout(&opts(), layer(LayerSpec::new(), [z(), x(), y()])).unwrap();
    for name in ["x", "x1", "x2", "y", "z", "z1"] {
        let ia = a.intrinsic(a.find(name).unwrap()).unwrap();
        let ib = b.intrinsic(b.find(name).unwrap()).unwrap();
        assert_eq!(ia, ib, "{name} moved when its siblings were permuted");
    }
}

#[test]
fn data_positions_map_through_the_root_scale() {
    let root = layer(
        LayerSpec::new(),
        [
            rect(RectSpec::new().with_x(v(0.0)).with_w(10.0).with_h(1.0)).named("lo"),
            rect(RectSpec::new().with_x(v(10.0)).with_w(10.0).with_h(1.0)).named("hi"),
        ],
    );
    let tree = layout(&RenderOptions::new(200.0, 50.0), root).unwrap();
    assert_eq!(dims_of(&tree, "lo")[0].lo(), 0.0);
    assert_eq!(dims_of(&tree, "hi")[0].lo(), 200.0);
}

#[test]
fn lone_data_positioned_rect_keeps_its_width() {
    let root = layer(
        LayerSpec::new(),
        [rect(RectSpec::new().with_x(v(5.0)).with_w(v(2.0)).with_h(3.0)).named("bar")],
    );
    let tree = layout(&RenderOptions::new(100.0, 100.0), root).unwrap();
    let bar = dims_of(&tree, "bar");
    assert_eq!(bar[0].extent(), 2.0, "{bar:?}");
    assert_eq!(bar[1].extent(), 3.0);
}

#[test]
fn widths_in_another_measure_ignore_the_position_scale() {
    let bar = |year: f64, name: &str| {
        rect(RectSpec::new().with_x(v_in(year, "year")).with_w(v_in(2.0, "count")).with_h(1.0))
            .named(name)
    };
    let root = layer(LayerSpec::new(), [bar(0.0, "first"), bar(10.0, "last")]);
    let tree = layout(&RenderOptions::new(200.0, 50.0), root).unwrap();
    let first = dims_of(&tree, "first")[0];
    let last = dims_of(&tree, "last")[0];
    assert_eq!((first.lo(), first.extent()), (0.0, 2.0));
    assert_eq!((last.lo(), last.extent()), (200.0, 2.0));
}

struct Geometry;

impl Drawer for Geometry {
    type Output = ShapeGeometry;

    fn draw(&mut self, primitive: &Primitive<'_>) -> ShapeGeometry {
        primitive.geometry()
    }
}

#[test]
fn polar_glyph_sits_at_the_mapped_point_regardless_of_size() {
    let glyph = || {
        coord(
            CoordSpec::new(Clock),
            [rect(RectSpec::new().with_x(0.5).with_w(0.2).with_y(30.0).with_h(4.0))],
        )
    };
    let expected = Clock.transform(Point::new(0.6, 32.0));
    for (w, h) in [(300.0, 300.0), (800.0, 120.0)] {
        let drawn = render(&mut Geometry, &RenderOptions::new(w, h), glyph()).unwrap();
        let leaves = drawn.leaves();
        let [ShapeGeometry::Glyph { center, .. }] = leaves.as_slice() else {
            panic!("expected one glyph, got {leaves:?}");
        };
        assert!((*center - expected).hypot() < 1e-9, "{center:?} at {w}x{h}");
    }
}

#[test]
fn coord_min_places_the_mapped_origin() {
    let space = |spec: CoordSpec| {
        layer(LayerSpec::new(), [coord(spec, [boxed(10.0, 10.0)]).named("space")])
    };
    let tree = layout(&opts(), space(CoordSpec::new(Linear).with_min(Axis::X, 30.0))).unwrap();
    let [x, y] = dims_of(&tree, "space");
    assert_eq!((x.lo(), x.hi()), (30.0, 40.0));
    assert_eq!((y.lo(), y.hi()), (0.0, 10.0), "no min keeps the box at the origin");

    let ring = CoordSpec::new(Clock).with_min(Axis::Y, 20.0);
    let tree = layout(&opts(), space(ring)).unwrap();
    let expected = Clock.transform(Point::new(0.0, 20.0)).y;
    assert!((dims_of(&tree, "space")[1].lo() - expected).abs() < 1e-9);
}

/// Counts grid lines; other primitives count as none.
struct GridLines;

impl Drawer for GridLines {
    type Output = usize;

    fn draw(&mut self, primitive: &Primitive<'_>) -> usize {
        match primitive.kind {
            PrimitiveKind::Grid { paths, .. } => paths.len(),
            _ => 0,
        }
    }
}

#[test]
fn coord_grid_is_drawn_after_its_children() {
    let stroke = Stroke::new(css::GRAY, 0.5);
    let root = coord(CoordSpec::new(Clock).with_grid(stroke), [boxed(1.0, 1.0)]);
    let drawn = render(&mut GridLines, &opts(), root).unwrap();
    assert_eq!(drawn.leaves(), [&0, &22]);

    let plain = coord(CoordSpec::new(Clock), [boxed(1.0, 1.0)]);
    let drawn = render(&mut GridLines, &opts(), plain).unwrap();
    assert_eq!(drawn.leaves(), [&0], "no grid unless asked for");
}

#[test]
fn unknown_ref_names_the_missing_identifier() {
    let root = layer(LayerSpec::new(), [boxed(1.0, 1.0).named("known"), reference("missing")]);
    let err = layout(&opts(), root).unwrap_err();
    assert_eq!(
        err,
        LayoutError::Lookup {
            name: "missing".into(),
            known: alloc::vec!["known".to_string()],
        }
    );
    assert!(err.to_string().contains("missing"));
}

#[test]
fn refs_resolve_relative_to_the_lowest_common_ancestor() {
    let bars = stack(
        StackSpec::new(Axis::X).with_spacing(10.0),
        [
            rect(RectSpec::new().with_w(10.0).with_h(10.0).with_fill(css::TOMATO)).named("a"),
            boxed(10.0, 20.0).named("b"),
        ],
    );
    let ribbons = layer(
        LayerSpec::new().with_min(Axis::Y, 50.0),
        [connect(ConnectSpec::new(Axis::X), [reference("a"), reference("b")]).named("ribbon")],
    );
    let tree = layout(&opts(), layer(LayerSpec::new(), [bars, ribbons])).unwrap();

    let ribbon = tree.find("ribbon").unwrap();
    let refs = tree.children(ribbon);
    let ra = tree.dims(refs[0]).unwrap();
    let rb = tree.dims(refs[1]).unwrap();
    // The ribbon's frame sits 50 below the bars' frame.
    assert_eq!((ra[0].lo(), ra[1].lo()), (0.0, -55.0));
    assert_eq!((rb[0].lo(), rb[1].lo()), (20.0, -60.0));

    let paths = tree.paths(ribbon).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(
        paths[0].elements()[..4],
        [
            PathEl::MoveTo(Point::new(10.0, -55.0)),
            PathEl::LineTo(Point::new(20.0, -60.0)),
            PathEl::LineTo(Point::new(20.0, -40.0)),
            PathEl::LineTo(Point::new(10.0, -45.0)),
        ]
    );
    assert_eq!(tree.fill(ribbon).unwrap(), Some(css::TOMATO), "first target's fill");
    assert!(tree.intrinsic(tree.find("a").unwrap()).unwrap()[0].embedded, "targets embed along x");
}

#[test]
fn keyed_fills_are_assigned_first_seen() {
    let root = stack_y(
        0.0,
        [
            rect(RectSpec::new().with_w(1.0).with_h(1.0).with_fill("oats")).named("a"),
            rect(RectSpec::new().with_w(1.0).with_h(1.0).with_fill("rye")).named("b"),
            rect(RectSpec::new().with_w(1.0).with_h(1.0).with_fill("oats")).named("c"),
        ],
    );
    let tree = layout(&opts(), root).unwrap();
    let fill = |n: &str| tree.fill(tree.find(n).unwrap()).unwrap();
    assert_eq!(fill("a"), Some(crate::PALETTE[0]));
    assert_eq!(fill("b"), Some(crate::PALETTE[1]));
    assert_eq!(fill("c"), fill("a"));
}

#[test]
fn position_with_two_children_is_malformed() {
    let root = Node::new(
        Operator::Position(PositionSpec::new().with_x(10.0)),
        [boxed(1.0, 1.0), boxed(1.0, 1.0)],
    );
    let err = layout(&opts(), root).unwrap_err();
    assert!(
        matches!(err, LayoutError::MalformedComposition { operator: "position", .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn position_centers_its_child() {
    let root = layer(
        LayerSpec::new(),
        [crate::position(
            PositionSpec::new().with_x(40.0).with_y(10.0),
            boxed(6.0, 4.0).named("dot"),
        )],
    );
    let tree = layout(&opts(), root).unwrap();
    let dot = dims_of(&tree, "dot");
    assert_eq!((dot[0].mid(), dot[1].mid()), (40.0, 10.0));
}

#[test]
fn dump_lists_every_node_with_its_bounds() {
    let root = stack_y(1.0, [boxed(2.0, 3.0).named("leaf"), reference("leaf")]);
    let tree = layout(&opts().with_debug(true), root).unwrap();
    let dump = tree.dump();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 3);
    // The ref is a zero-size placeholder while the stack lays out.
    assert!(lines[0].starts_with("stack x=[-1.00, 1.00] y=[0.00, 4.00]"), "{dump}");
    assert!(lines[1].starts_with("  rect \"leaf\""), "{dump}");
    assert!(lines[2].starts_with("  ref -> \"leaf\" x=[-1.00, 1.00] y=[0.00, 3.00]"), "{dump}");
}
