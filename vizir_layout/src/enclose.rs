// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Padded outlines around a group of children.

use peniko::color::palette::css;
use smallvec::SmallVec;

use crate::dims::{Axis, Interval, Size, Transform};
use crate::error::Result;
use crate::layer::max_children;
use crate::monotonic::Monotonic;
use crate::node::{Node, Operator};
use crate::tree::{LayoutInput, LayoutTree, NodeId, Placement};
use crate::value::Stroke;

/// Parameters of an enclosing outline.
#[derive(Clone, Debug, PartialEq)]
pub struct EncloseSpec {
    /// Gap between the children's bounding box and the outline.
    pub padding: f64,
    /// Corner radius of the outline.
    pub corner_radius: f64,
    /// Outline stroke.
    pub stroke: Stroke,
}

impl Default for EncloseSpec {
    fn default() -> Self {
        Self {
            padding: 2.0,
            corner_radius: 2.0,
            stroke: Stroke::new(css::BLACK, 1.0),
        }
    }
}

impl EncloseSpec {
    /// An outline with 2px padding and rounding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for `padding`.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Builder-style setter for `corner_radius`.
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    /// Builder-style setter for `stroke`.
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }
}

/// Outline `children`.
pub fn enclose(spec: EncloseSpec, children: impl IntoIterator<Item = Node>) -> Node {
    Node::new(Operator::Enclose(spec), children)
}

pub(crate) fn infer_size_domains(
    spec: &EncloseSpec,
    children: &[Size<Monotonic>],
) -> Size<Monotonic> {
    max_children(children).map(|m| m.offset(2.0 * spec.padding))
}

pub(crate) fn layout(
    tree: &mut LayoutTree,
    id: NodeId,
    spec: &EncloseSpec,
    input: &LayoutInput,
) -> Result<Placement> {
    let pad = spec.padding;
    let mut child_input = *input;
    child_input.size = input.size.map(|s| (s - 2.0 * pad).max(0.0));

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

    let intrinsic = Axis::BOTH.map(|axis| {
        let i = axis.index();
        Interval::span(lo[i] - pad, hi[i] - lo[i] + 2.0 * pad)
    });
    Ok(Placement::new(intrinsic, Transform::default()))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn padding_is_added_on_both_sides() {
        let spec = EncloseSpec::new().with_padding(3.0);
        let [w, h] = infer_size_domains(
            &spec,
            &[[Monotonic::linear(2.0, 0.0), Monotonic::constant(4.0)]],
        );
        assert_eq!(w.run(5.0), 16.0);
        assert_eq!(h.run(5.0), 10.0);
    }

    #[test]
    fn default_outline_is_thin_black() {
        let spec = EncloseSpec::default();
        assert_eq!(spec.padding, 2.0);
        assert_eq!(spec.stroke, Stroke::new(css::BLACK, 1.0));
    }
}
