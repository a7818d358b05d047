// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping paths through coordinate transforms.

use kurbo::{BezPath, CubicBez, Line, ParamCurve, PathEl, PathSeg, Point, QuadBez};

use crate::coordinate::CoordinateTransform;

/// Map `path` through `transform`.
///
/// Linear transforms keep rectangles and beziers intact, so control points are mapped
/// directly. Otherwise every segment (including the implicit closing line of a closed
/// subpath) is sampled `subdivision` times and replaced by a polyline through the mapped
/// samples.
pub fn transform_path(
    path: &BezPath,
    transform: &dyn CoordinateTransform,
    subdivision: usize,
) -> BezPath {
    if transform.is_linear() {
        return map_control_points(path, transform);
    }

    let n = subdivision.max(1);
    let mut out = BezPath::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(transform.transform(p));
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                sample(&mut out, PathSeg::Line(Line::new(last, p)), transform, n);
                last = p;
            }
            PathEl::QuadTo(a, p) => {
                sample(&mut out, PathSeg::Quad(QuadBez::new(last, a, p)), transform, n);
                last = p;
            }
            PathEl::CurveTo(a, b, p) => {
                sample(&mut out, PathSeg::Cubic(CubicBez::new(last, a, b, p)), transform, n);
                last = p;
            }
            PathEl::ClosePath => {
                if last != start {
                    sample(&mut out, PathSeg::Line(Line::new(last, start)), transform, n);
                }
                out.close_path();
                last = start;
            }
        }
    }
    out
}

fn sample(out: &mut BezPath, seg: PathSeg, transform: &dyn CoordinateTransform, n: usize) {
    for i in 1..=n {
        let t = i as f64 / n as f64;
        out.line_to(transform.transform(seg.eval(t)));
    }
}

fn map_control_points(path: &BezPath, transform: &dyn CoordinateTransform) -> BezPath {
    let map = |p: Point| transform.transform(p);
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => PathEl::MoveTo(map(p)),
            PathEl::LineTo(p) => PathEl::LineTo(map(p)),
            PathEl::QuadTo(a, p) => PathEl::QuadTo(map(a), map(p)),
            PathEl::CurveTo(a, b, p) => PathEl::CurveTo(map(a), map(b), map(p)),
            PathEl::ClosePath => PathEl::ClosePath,
        })
        .collect()
}
