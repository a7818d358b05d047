// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lay children out in a non-Euclidean space.
//!
//! Children see the transform's inner space (for radial transforms, a full turn of angle by
//! half the smaller side of radius) with no inherited scale factors or position scales. The
//! node reports the screen-space box of its mapped children. That box starts at its own
//! origin, or at the image of `min` when one is given.

use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect};
use smallvec::SmallVec;

use crate::coordinate::{CoordinateTransform, transformed_bounds};
use crate::dims::{Axis, Interval, Size, Transform};
use crate::error::Result;
use crate::node::{Node, Operator};
use crate::path::transform_path;
use crate::tree::{LayoutInput, LayoutTree, NodeId, Placement};
use crate::value::Stroke;

/// Lines per axis in a grid, edges included.
const GRID_LINES: usize = 11;

/// Samples per grid line under a non-linear transform.
const GRID_SUBDIVISION: usize = 100;

/// Parameters of a coordinate space.
#[derive(Clone, Debug)]
pub struct CoordSpec {
    /// The point mapping applied to every leaf below.
    pub transform: Arc<dyn CoordinateTransform>,
    /// Where the space is placed, in its own input coordinates.
    pub min: Size<Option<f64>>,
    /// Draw evenly spaced domain lines with this stroke.
    pub grid: Option<Stroke>,
}

impl CoordSpec {
    /// A space mapped through `transform`.
    pub fn new(transform: impl CoordinateTransform + 'static) -> Self {
        Self {
            transform: Arc::new(transform),
            min: [None, None],
            grid: None,
        }
    }

    /// Builder-style setter for the minimum along `axis`.
    pub fn with_min(mut self, axis: Axis, min: f64) -> Self {
        self.min[axis.index()] = Some(min);
        self
    }

    /// Builder-style setter for the grid stroke.
    pub fn with_grid(mut self, stroke: Stroke) -> Self {
        self.grid = Some(stroke);
        self
    }
}

/// Lay `children` out in the space described by `spec`.
pub fn coord(spec: CoordSpec, children: impl IntoIterator<Item = Node>) -> Node {
    Node::new(Operator::Coord(spec), children)
}

/// Lines of constant `x` then lines of constant `y` across the transform's domain, mapped to
/// the screen.
pub(crate) fn grid_lines(transform: &dyn CoordinateTransform) -> Vec<BezPath> {
    let [dx, dy] = transform.domain();
    let step = |d: &Interval, k: usize| d.lo() + d.extent() * k as f64 / (GRID_LINES - 1) as f64;
    let mut lines = Vec::with_capacity(2 * GRID_LINES);
    for k in 0..GRID_LINES {
        let x = step(&dx, k);
        lines.push((Point::new(x, dy.lo()), Point::new(x, dy.hi())));
    }
    for k in 0..GRID_LINES {
        let y = step(&dy, k);
        lines.push((Point::new(dx.lo(), y), Point::new(dx.hi(), y)));
    }
    lines
        .into_iter()
        .map(|(from, to)| {
            let mut line = BezPath::new();
            line.move_to(from);
            line.line_to(to);
            transform_path(&line, transform, GRID_SUBDIVISION)
        })
        .collect()
}

pub(crate) fn layout(
    tree: &mut LayoutTree,
    id: NodeId,
    spec: &CoordSpec,
    input: &LayoutInput,
) -> Result<Placement> {
    let transform = spec.transform.as_ref();
    let child_input = LayoutInput::new(transform.inner_size(input.size));
    tracing::debug!(
        transform = transform.name(),
        inner = ?child_input.size,
        "laying out coordinate space"
    );

    let children: SmallVec<[NodeId; 8]> = tree.children(id).iter().copied().collect();
    let mut lo = [0.0_f64; 2];
    let mut hi = [0.0_f64; 2];
    for (n, &child) in children.iter().enumerate() {
        tree.layout_node(child, &child_input)?;
        tree.place(child, [Some(0.0), Some(0.0)]);
        let dims = tree.dims(child)?;
        for i in 0..2 {
            if n == 0 {
                lo[i] = dims[i].lo();
                hi[i] = dims[i].hi();
            } else {
                lo[i] = lo[i].min(dims[i].lo());
                hi[i] = hi[i].max(dims[i].hi());
            }
        }
    }

    let screen = transformed_bounds(lo[0], hi[0], lo[1], hi[1], transform).unwrap_or(Rect::ZERO);
    let at = transform.transform(Point::new(
        spec.min[0].unwrap_or(0.0),
        spec.min[1].unwrap_or(0.0),
    ));
    let translate = [
        spec.min[0].map_or(-screen.x0, |_| at.x - screen.x0),
        spec.min[1].map_or(-screen.y0, |_| at.y - screen.y0),
    ];
    let mut placement = Placement::new(
        [
            Interval::span(screen.x0, screen.width()),
            Interval::span(screen.y0, screen.height()),
        ],
        Transform::translate(translate.map(Some)),
    );
    if spec.grid.is_some() {
        placement.paths = grid_lines(transform);
    }
    Ok(placement)
}
