// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers overlay their children in one shared frame.

use smallvec::SmallVec;

use crate::dims::{Axis, Interval, Size, Transform};
use crate::domain::{Domain, PosScale};
use crate::error::Result;
use crate::monotonic::Monotonic;
use crate::node::{Node, Operator};
use crate::tree::{LayoutInput, LayoutTree, NodeId, Placement};

/// Parameters of a layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    /// Where the layer's bounding box starts, per axis.
    pub min: Size<Option<f64>>,
    /// Fixed pixel extent per axis; children that carry data positions are scaled into it.
    pub size: Size<Option<f64>>,
    /// Scale applied to the whole layer.
    pub scale: Size,
}

impl Default for LayerSpec {
    fn default() -> Self {
        Self {
            min: [None, None],
            size: [None, None],
            scale: [1.0, 1.0],
        }
    }
}

impl LayerSpec {
    /// A layer with no bounds and unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the minimum along `axis`.
    pub fn with_min(mut self, axis: Axis, min: f64) -> Self {
        self.min[axis.index()] = Some(min);
        self
    }

    /// Builder-style setter for the fixed extent along `axis`.
    pub fn with_size(mut self, axis: Axis, size: f64) -> Self {
        self.size[axis.index()] = Some(size);
        self
    }

    /// Builder-style setter for the scale.
    pub fn with_scale(mut self, scale: Size) -> Self {
        self.scale = scale;
        self
    }
}

/// Overlay `children`.
pub fn layer(spec: LayerSpec, children: impl IntoIterator<Item = Node>) -> Node {
    Node::new(Operator::Layer(spec), children)
}

/// Per-axis unification of every child's domain.
pub(crate) fn unify_children(children: &[Size<Option<Domain>>]) -> Size<Option<Domain>> {
    Axis::BOTH.map(|axis| Domain::unify(children.iter().map(|c| c[axis.index()].as_ref())))
}

/// Per-axis maximum of every child's size.
pub(crate) fn max_children(children: &[Size<Monotonic>]) -> Size<Monotonic> {
    Axis::BOTH.map(|axis| Monotonic::max(children.iter().map(|c| c[axis.index()].clone())))
}

pub(crate) fn infer_size_domains(spec: &LayerSpec, children: &[Size<Monotonic>]) -> Size<Monotonic> {
    let mut out = max_children(children);
    for axis in Axis::BOTH {
        let i = axis.index();
        out[i] = match spec.size[i] {
            Some(fixed) => Monotonic::constant(fixed),
            None => out[i].clone().scaled(spec.scale[i]),
        };
    }
    out
}

pub(crate) fn layout(
    tree: &mut LayoutTree,
    id: NodeId,
    spec: &LayerSpec,
    input: &LayoutInput,
) -> Result<Placement> {
    let mut child_input = *input;
    let domains = tree.pos_domains(id)?.clone();
    for axis in Axis::BOTH {
        let i = axis.index();
        if let Some(fixed) = spec.size[i] {
            child_input.size[i] = fixed;
            if let Some(scale) = domains[i].as_ref().and_then(|d| PosScale::for_domain(d, fixed)) {
                child_input.pos_scales[i] = Some(scale);
            }
        }
    }

    let children: SmallVec<[NodeId; 8]> = tree.children(id).iter().copied().collect();
    let mut lo = [f64::INFINITY; 2];
    let mut hi = [f64::NEG_INFINITY; 2];
    for &child in &children {
        tree.layout_node(child, &child_input)?;
        tree.place(child, [Some(0.0), Some(0.0)]);
        let dims = tree.dims(child)?;
        for i in 0..2 {
            lo[i] = lo[i].min(dims[i].lo());
            hi[i] = hi[i].max(dims[i].hi());
        }
    }

    let mut intrinsic = [Interval::default(); 2];
    let mut translate = [None, None];
    for axis in Axis::BOTH {
        let i = axis.index();
        let s = spec.scale[i];
        let (start, extent) = if children.is_empty() {
            (0.0, spec.size[i].unwrap_or(0.0))
        } else {
            (lo[i], hi[i] - lo[i])
        };
        intrinsic[i] = Interval::span(s * start, s * extent);
        translate[i] = spec.min[i].map(|m| m - s * start);
    }
    Ok(Placement::new(
        intrinsic,
        Transform::translate(translate).with_scale(spec.scale),
    ))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::value::Measure;

    #[test]
    fn unify_skips_missing_and_rejects_mixed_measures() {
        let a = Domain::continuous(0.0, 2.0, Measure::from("a"));
        let b = Domain::continuous(1.0, 5.0, Measure::from("b"));
        let same = unify_children(&[[Some(a.clone()), None], [None, None], [Some(a.clone()), None]]);
        assert_eq!(same[0], Some(a.clone()));
        assert_eq!(same[1], None, "no child has a y domain");
        let mixed = unify_children(&[[Some(a), None], [Some(b), None]]);
        assert_eq!(mixed[0], None, "different measures do not unify");
    }

    #[test]
    fn fixed_size_is_constant_and_scale_multiplies_the_rest() {
        let spec = LayerSpec::new().with_size(Axis::X, 40.0).with_scale([1.0, 2.0]);
        let children = [
            [Monotonic::linear(1.0, 0.0), Monotonic::constant(3.0)],
            [Monotonic::linear(2.0, 0.0), Monotonic::constant(5.0)],
        ];
        let [w, h] = infer_size_domains(&spec, &children);
        assert!(w.is_constant());
        assert_eq!(w.run(100.0), 40.0);
        assert_eq!(h.run(1.0), 10.0, "max of 3 and 5, doubled");
    }
}
