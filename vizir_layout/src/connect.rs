// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connectors: ribbons or lines between consecutive children, usually `ref`s.
//!
//! Paths are built once every node has been placed, because the boxes they join may live
//! anywhere in the tree. They are stored untransformed in the connector's frame; drawing
//! subdivides and maps them through the active coordinate transform.

use alloc::vec::Vec;

use kurbo::{BezPath, Point};
use smallvec::SmallVec;

use crate::dims::{Axis, Dimensions, Interval, StackMode, Transform};
use crate::error::Result;
use crate::node::{Node, Operator};
use crate::tree::{LayoutInput, LayoutTree, NodeId, Placement};
use crate::value::{Paint, Stroke};

/// Edge shape of a ribbon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Straight edges.
    #[default]
    Linear,
    /// Cubic edges that leave and enter each box horizontally along the direction.
    Bezier,
}

/// Parameters of a connector.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectSpec {
    /// Axis the connector runs along.
    pub direction: Axis,
    /// Edge shape.
    pub interpolation: Interpolation,
    /// Join opposing edges (ribbons) or centers (lines).
    pub mode: StackMode,
    /// Fill; defaults to the first connected node's fill.
    pub fill: Option<Paint>,
    /// Optional outline.
    pub stroke: Option<Stroke>,
    /// Opacity in `0..=1`.
    pub opacity: f64,
}

impl ConnectSpec {
    /// An opaque straight-edged ribbon along `direction`.
    pub fn new(direction: Axis) -> Self {
        Self {
            direction,
            interpolation: Interpolation::Linear,
            mode: StackMode::EdgeToEdge,
            fill: None,
            stroke: None,
            opacity: 1.0,
        }
    }

    /// Builder-style setter for `interpolation`.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Builder-style setter for `mode`.
    pub fn with_mode(mut self, mode: StackMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder-style setter for `fill`.
    pub fn with_fill(mut self, fill: impl Into<Paint>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Builder-style setter for `stroke`.
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Builder-style setter for `opacity`.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Connect consecutive `children`.
pub fn connect(spec: ConnectSpec, children: impl IntoIterator<Item = Node>) -> Node {
    Node::new(Operator::Connect(spec), children)
}

pub(crate) fn layout(tree: &mut LayoutTree, id: NodeId, input: &LayoutInput) -> Result<Placement> {
    let children: SmallVec<[NodeId; 8]> = tree.children(id).iter().copied().collect();
    for child in children {
        tree.layout_node(child, input)?;
    }
    // Takes no room of its own; paths may extend anywhere.
    Ok(Placement::new(
        [Interval::unplaced(0.0), Interval::unplaced(0.0)],
        Transform::translate([Some(0.0), Some(0.0)]),
    ))
}

/// Build the connector's paths from its children's final bounds.
///
/// Runs after every `ref` below the connector has been linked to its target.
pub(crate) fn link(tree: &mut LayoutTree, id: NodeId, spec: &ConnectSpec) -> Result<()> {
    let children: SmallVec<[NodeId; 8]> = tree.children(id).iter().copied().collect();
    if spec.mode == StackMode::EdgeToEdge {
        for &child in &children {
            tree.embed(child, spec.direction);
        }
    }
    let mut boxes = Vec::with_capacity(children.len());
    for &child in &children {
        boxes.push(tree.dims(child)?);
    }
    let paths = connector_paths(spec, &boxes);
    tracing::trace!(node = id.index(), paths = paths.len(), "built connector paths");
    tree.slot_mut(id).state.paths = paths;
    Ok(())
}

/// One path per consecutive pair of boxes.
pub(crate) fn connector_paths(spec: &ConnectSpec, boxes: &[Dimensions]) -> Vec<BezPath> {
    let d = spec.direction.index();
    let c = spec.direction.cross().index();
    // (along, across) -> (x, y)
    let pt = |along: f64, across: f64| {
        if d == 0 {
            Point::new(along, across)
        } else {
            Point::new(across, along)
        }
    };

    boxes
        .windows(2)
        .map(|pair| {
            let (b0, b1) = (&pair[0], &pair[1]);
            let mut path = BezPath::new();
            if spec.mode == StackMode::CenterToCenter {
                path.move_to(pt(b0[d].mid(), b0[c].mid()));
                path.line_to(pt(b1[d].mid(), b1[c].mid()));
                return path;
            }
            let from = b0[d].hi();
            let to = b1[d].lo();
            match spec.interpolation {
                Interpolation::Linear => {
                    path.move_to(pt(from, b0[c].lo()));
                    path.line_to(pt(to, b1[c].lo()));
                    path.line_to(pt(to, b1[c].hi()));
                    path.line_to(pt(from, b0[c].hi()));
                }
                Interpolation::Bezier => {
                    let mid = (from + to) / 2.0;
                    path.move_to(pt(from, b0[c].lo()));
                    path.curve_to(pt(mid, b0[c].lo()), pt(mid, b1[c].lo()), pt(to, b1[c].lo()));
                    path.line_to(pt(to, b1[c].hi()));
                    path.curve_to(pt(mid, b1[c].hi()), pt(mid, b0[c].hi()), pt(from, b0[c].hi()));
                }
            }
            path.close_path();
            path
        })
        .collect()
}
