// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf geometry under a coordinate transform.
//!
//! How a leaf is drawn depends on which of its axes are embedded (data-driven):
//!
//! - neither: a glyph, an unwarped box centered on the mapped center;
//! - one: a stroke along the mapped midline of the embedded axis, as thick as the other axis;
//! - both: a filled region bounded by the four mapped, subdivided edges.
//!
//! Without a coordinate transform (or under a linear one) every leaf is a plain rectangle.

use kurbo::{BezPath, Point, Rect, Shape};

use crate::coordinate::CoordinateTransform;
use crate::dims::Dimensions;
use crate::path::transform_path;

/// Drawable geometry of one leaf, in the frame its primitive is drawn in.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeGeometry {
    /// An axis-aligned box around a mapped center.
    Glyph {
        /// Mapped center.
        center: Point,
        /// Unmapped width.
        width: f64,
        /// Unmapped height.
        height: f64,
    },
    /// A plain rectangle.
    Rect(Rect),
    /// A polyline drawn with a fixed thickness.
    Stroke {
        /// Mapped midline.
        path: BezPath,
        /// Stroke width.
        thickness: f64,
    },
    /// A closed, filled polygon.
    Area(BezPath),
}

/// Classify and build the geometry of a leaf occupying `dims`.
pub fn shape_geometry(
    dims: &Dimensions,
    coord: Option<&dyn CoordinateTransform>,
    subdivision: usize,
) -> ShapeGeometry {
    let [x, y] = dims;
    let bounds = Rect::new(x.lo(), y.lo(), x.hi(), y.hi()).abs();
    let Some(coord) = coord else {
        return ShapeGeometry::Rect(bounds);
    };

    match (x.embedded, y.embedded) {
        (false, false) => ShapeGeometry::Glyph {
            center: coord.transform(bounds.center()),
            width: bounds.width(),
            height: bounds.height(),
        },
        _ if coord.is_linear() => ShapeGeometry::Rect(Rect::from_points(
            coord.transform(Point::new(bounds.x0, bounds.y0)),
            coord.transform(Point::new(bounds.x1, bounds.y1)),
        )),
        (true, false) => {
            let mid = bounds.center().y;
            ShapeGeometry::Stroke {
                path: midline(Point::new(bounds.x0, mid), Point::new(bounds.x1, mid), coord, subdivision),
                thickness: bounds.height(),
            }
        }
        (false, true) => {
            let mid = bounds.center().x;
            ShapeGeometry::Stroke {
                path: midline(Point::new(mid, bounds.y0), Point::new(mid, bounds.y1), coord, subdivision),
                thickness: bounds.width(),
            }
        }
        (true, true) => ShapeGeometry::Area(transform_path(
            &bounds.to_path(0.1),
            coord,
            subdivision,
        )),
    }
}

fn midline(from: Point, to: Point, coord: &dyn CoordinateTransform, subdivision: usize) -> BezPath {
    let mut line = BezPath::new();
    line.move_to(from);
    line.line_to(to);
    transform_path(&line, coord, subdivision)
}
