// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render-scoped arena the pipeline phases run over.
//!
//! [`Node`] trees are owned and immutable. A render copies one into a [`LayoutTree`] whose
//! slots carry parent links and per-node [`NodeState`]. Each piece of state is produced by one
//! [`Phase`]; reading it earlier is a [`LayoutError::PhaseViolation`], not a silent default.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use kurbo::BezPath;
use peniko::Color;
use smallvec::SmallVec;

use crate::dims::{Axis, Dimensions, Size, Transform, translate_dims};
use crate::domain::{Domain, PosScale};
use crate::error::{LayoutError, Result};
use crate::monotonic::Monotonic;
use crate::node::{Node, Operator};
use crate::render::RenderOptions;
use crate::scope::{ColorScale, ScopeContext};

/// Index of a node inside a [`LayoutTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Pre-order position of the node in its tree.
    pub fn index(self) -> usize {
        self.0
    }
}

/// How far the pipeline has progressed for a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Freshly copied from the author tree.
    #[default]
    Unresolved,
    /// Names, refs and colors are resolved.
    NamesResolved,
    /// Position domains are known.
    DomainsKnown,
    /// Size is known as a function of the scale factor.
    SizedAsFunction,
    /// Intrinsic dimensions and transform are computed.
    Placed,
}

/// Per-node layout state, filled in phase order.
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeState {
    pub(crate) phase: Phase,
    pub(crate) visiting: bool,
    pub(crate) target: Option<NodeId>,
    pub(crate) fill: Option<Color>,
    pub(crate) pos_domains: Size<Option<Domain>>,
    pub(crate) size_domains: Option<Size<Monotonic>>,
    pub(crate) data_driven: Size<bool>,
    pub(crate) intrinsic: Dimensions,
    pub(crate) transform: Transform,
    pub(crate) paths: Vec<BezPath>,
}

#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) op: Operator,
    pub(crate) name: Option<String>,
    pub(crate) shared: Size<bool>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) state: NodeState,
}

/// What a parent hands a child when laying it out.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LayoutInput {
    /// Space on offer per axis.
    pub(crate) size: Size,
    /// Solved scale factors, if an ancestor solved one.
    pub(crate) scale_factors: Size<Option<f64>>,
    /// Data-to-pixel position scales in effect.
    pub(crate) pos_scales: Size<Option<PosScale>>,
}

impl LayoutInput {
    pub(crate) fn new(size: Size) -> Self {
        Self {
            size,
            scale_factors: [None, None],
            pos_scales: [None, None],
        }
    }
}

/// What an operator's layout produces for its own node.
#[derive(Clone, Debug, Default)]
pub(crate) struct Placement {
    pub(crate) intrinsic: Dimensions,
    pub(crate) transform: Transform,
    pub(crate) paths: Vec<BezPath>,
}

impl Placement {
    pub(crate) fn new(intrinsic: Dimensions, transform: Transform) -> Self {
        Self {
            intrinsic,
            transform,
            paths: Vec::new(),
        }
    }
}

/// A node tree being resolved for one render.
///
/// Owns the render-scoped [`ScopeContext`] and [`ColorScale`]; independent renders use
/// independent trees.
#[derive(Clone, Debug)]
pub struct LayoutTree {
    pub(crate) slots: Vec<Slot>,
    pub(crate) scope: ScopeContext,
    pub(crate) colors: ColorScale,
    pub(crate) options: RenderOptions,
}

impl LayoutTree {
    /// Copy an author tree into a fresh arena, checking operator arity.
    pub fn build(root: Node, options: RenderOptions) -> Result<Self> {
        let mut slots = Vec::new();
        insert(&mut slots, root, None)?;
        Ok(Self {
            slots,
            scope: ScopeContext::new(),
            colors: ColorScale::new(),
            options,
        })
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Options this tree is laid out with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The render's name table.
    pub fn scope(&self) -> &ScopeContext {
        &self.scope
    }

    /// The render's categorical colors.
    pub fn colors(&self) -> &ColorScale {
        &self.colors
    }

    pub(crate) fn slot(&self, id: NodeId) -> &Slot {
        &self.slots[id.0]
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        &mut self.slots[id.0]
    }

    /// The node registered under `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.scope.resolve(name).ok()
    }

    /// Operator of a node.
    pub fn op(&self, id: NodeId) -> &Operator {
        &self.slot(id).op
    }

    /// Name of a node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.slot(id).name.as_deref()
    }

    /// Parent of a node; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).parent
    }

    /// Children of a node, in author order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slot(id).children
    }

    /// Shared-scale flags of a node.
    pub fn shared(&self, id: NodeId) -> Size<bool> {
        self.slot(id).shared
    }

    /// How far the pipeline has got with a node.
    pub fn phase(&self, id: NodeId) -> Phase {
        self.slot(id).state.phase
    }

    pub(crate) fn require(&self, id: NodeId, needed: Phase) -> Result<()> {
        let actual = self.phase(id);
        if actual < needed {
            return Err(LayoutError::PhaseViolation {
                node: id,
                needed,
                actual,
            });
        }
        Ok(())
    }

    /// The node a `ref` resolved to.
    pub fn target(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.require(id, Phase::NamesResolved)?;
        Ok(self.slot(id).state.target)
    }

    /// Resolved fill color.
    pub fn fill(&self, id: NodeId) -> Result<Option<Color>> {
        self.require(id, Phase::NamesResolved)?;
        Ok(self.slot(id).state.fill)
    }

    /// Position domains reported by a node.
    pub fn pos_domains(&self, id: NodeId) -> Result<&Size<Option<Domain>>> {
        self.require(id, Phase::DomainsKnown)?;
        Ok(&self.slot(id).state.pos_domains)
    }

    /// Size as a function of the scale factor, per axis.
    pub fn size_domains(&self, id: NodeId) -> Result<&Size<Monotonic>> {
        self.require(id, Phase::SizedAsFunction)?;
        self.slot(id)
            .state
            .size_domains
            .as_ref()
            .ok_or(LayoutError::PhaseViolation {
                node: id,
                needed: Phase::SizedAsFunction,
                actual: Phase::DomainsKnown,
            })
    }

    /// Per axis, whether some extent below the node is a data value.
    ///
    /// Such an axis must be solved when shared, even if its size function came out constant.
    pub fn data_driven(&self, id: NodeId) -> Result<Size<bool>> {
        self.require(id, Phase::SizedAsFunction)?;
        Ok(self.slot(id).state.data_driven)
    }

    /// Bounds of a node in its own frame.
    pub fn intrinsic(&self, id: NodeId) -> Result<Dimensions> {
        self.require(id, Phase::Placed)?;
        Ok(self.slot(id).state.intrinsic)
    }

    /// Placement of a node relative to its parent.
    pub fn transform(&self, id: NodeId) -> Result<Transform> {
        self.require(id, Phase::Placed)?;
        Ok(self.slot(id).state.transform)
    }

    /// Bounds of a node in its parent's frame.
    pub fn dims(&self, id: NodeId) -> Result<Dimensions> {
        self.require(id, Phase::Placed)?;
        let state = &self.slot(id).state;
        Ok(translate_dims(&state.intrinsic, state.transform.offsets()))
    }

    /// Untransformed connector paths, in the connect node's frame.
    pub fn paths(&self, id: NodeId) -> Result<&[BezPath]> {
        self.require(id, Phase::Placed)?;
        Ok(&self.slot(id).state.paths)
    }

    /// Position a laid-out node.
    ///
    /// For each axis with a position: an unknown intrinsic minimum takes the position
    /// directly; otherwise an unset translate takes it, and a set translate is shifted by it.
    pub(crate) fn place(&mut self, id: NodeId, pos: Size<Option<f64>>) {
        let state = &mut self.slot_mut(id).state;
        for (i, p) in pos.into_iter().enumerate() {
            let Some(p) = p else { continue };
            if state.intrinsic[i].min.is_none() {
                state.intrinsic[i].min = Some(p);
            } else {
                let t = &mut state.transform.translate[i];
                *t = Some(t.unwrap_or(0.0) + p);
            }
        }
    }

    /// Position a laid-out node along one axis.
    pub(crate) fn place_on(&mut self, id: NodeId, axis: Axis, pos: f64) {
        let mut at = [None, None];
        at[axis.index()] = Some(pos);
        self.place(id, at);
    }

    /// Mark a node (or a ref's target) as data-driven along `axis`.
    pub(crate) fn embed(&mut self, id: NodeId, axis: Axis) {
        let id = self.slot(id).state.target.unwrap_or(id);
        self.slot_mut(id).state.intrinsic[axis.index()].embedded = true;
    }

    /// Ancestors of `id`, starting with `id` itself and ending at the root.
    pub(crate) fn path_to_root(&self, id: NodeId) -> SmallVec<[NodeId; 16]> {
        let mut path = SmallVec::new();
        let mut current = Some(id);
        while let Some(n) = current {
            path.push(n);
            current = self.parent(n);
        }
        path
    }

    /// The deepest node that is an ancestor of (or equal to) both `a` and `b`.
    pub fn lowest_common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
        let pa = self.path_to_root(a);
        let pb = self.path_to_root(b);
        let mut lca = self.root();
        for (x, y) in pa.iter().rev().zip(pb.iter().rev()) {
            if x != y {
                break;
            }
            lca = *x;
        }
        lca
    }

    /// Sum of translates from `from` up to, but excluding, `stop`.
    pub(crate) fn translate_sum(&self, from: Option<NodeId>, stop: NodeId) -> Size {
        let mut sum = [0.0, 0.0];
        let mut current = from;
        while let Some(n) = current {
            if n == stop {
                break;
            }
            let offsets = self.slot(n).state.transform.offsets();
            sum[0] += offsets[0];
            sum[1] += offsets[1];
            current = self.parent(n);
        }
        sum
    }

    /// A human-readable dump of the resolved tree, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root(), 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let slot = self.slot(id);
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(slot.op.kind());
        if let Some(name) = &slot.name {
            let _ = write!(out, " {name:?}");
        }
        if let Operator::Ref(target) = &slot.op {
            let _ = write!(out, " -> {target:?}");
        }
        let state = &slot.state;
        if state.phase >= Phase::Placed {
            let d = translate_dims(&state.intrinsic, state.transform.offsets());
            let _ = write!(
                out,
                " x=[{:.2}, {:.2}] y=[{:.2}, {:.2}]",
                d[0].lo(),
                d[0].hi(),
                d[1].lo(),
                d[1].hi()
            );
            if d[0].embedded || d[1].embedded {
                let _ = write!(out, " embedded=[{}, {}]", d[0].embedded, d[1].embedded);
            }
        } else {
            let _ = write!(out, " ({:?})", state.phase);
        }
        out.push('\n');
        for child in slot.children.iter() {
            self.dump_node(*child, depth + 1, out);
        }
    }
}

fn insert(slots: &mut Vec<Slot>, node: Node, parent: Option<NodeId>) -> Result<NodeId> {
    let Node {
        op,
        name,
        shared,
        children,
    } = node;
    op.validate(children.len())?;
    let id = NodeId(slots.len());
    slots.push(Slot {
        op,
        name,
        shared,
        parent,
        children: SmallVec::new(),
        state: NodeState::default(),
    });
    for child in children {
        let child = insert(slots, child, Some(id))?;
        slots[id.0].children.push(child);
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::layer::{LayerSpec, layer};
    use crate::rect::{RectSpec, rect};

    fn leaf() -> Node {
        rect(RectSpec::new().with_w(1.0).with_h(1.0))
    }

    #[test]
    fn build_flattens_in_pre_order_with_parent_links() {
        let tree = LayoutTree::build(
            layer(
                LayerSpec::new(),
                [layer(LayerSpec::new(), [leaf(), leaf()]), leaf()],
            ),
            RenderOptions::new(10.0, 10.0),
        )
        .unwrap();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.children(NodeId(0)), &[NodeId(1), NodeId(4)]);
        assert_eq!(tree.children(NodeId(1)), &[NodeId(2), NodeId(3)]);
        assert_eq!(tree.parent(NodeId(3)), Some(NodeId(1)));
        assert_eq!(tree.lowest_common_ancestor(NodeId(2), NodeId(3)), NodeId(1));
        assert_eq!(tree.lowest_common_ancestor(NodeId(2), NodeId(4)), NodeId(0));
        assert_eq!(tree.lowest_common_ancestor(NodeId(1), NodeId(3)), NodeId(1));
    }

    #[test]
    fn reading_state_before_its_phase_is_an_error() {
        let tree = LayoutTree::build(leaf(), RenderOptions::new(10.0, 10.0)).unwrap();
        let err = tree.dims(tree.root()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::PhaseViolation {
                node: NodeId(0),
                needed: Phase::Placed,
                actual: Phase::Unresolved,
            }
        );
        assert!(tree.pos_domains(tree.root()).is_err(), "domains not inferred yet");
        assert!(tree.size_domains(tree.root()).is_err(), "sizes not inferred yet");
    }

    #[test]
    fn place_sets_unknown_min_then_composes_translate() {
        let mut tree = LayoutTree::build(leaf(), RenderOptions::new(10.0, 10.0)).unwrap();
        let root = tree.root();
        tree.slot_mut(root).state.intrinsic = [
            crate::dims::Interval::unplaced(4.0),
            crate::dims::Interval::from_extent(2.0),
        ];
        tree.slot_mut(root).state.phase = Phase::Placed;
        tree.place(root, [Some(3.0), Some(5.0)]);
        tree.place(root, [Some(1.0), Some(2.0)]);
        let d = tree.dims(root).unwrap();
        assert_eq!(d[0].min, Some(4.0), "min set directly, then translated by 1");
        assert_eq!(d[1].min, Some(7.0), "translate composes additively");
    }
}
