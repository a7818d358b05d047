// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four layout phases over a [`LayoutTree`].
//!
//! 1. Names and colors: register names, assign categorical colors, resolve `ref`s.
//! 2. Position domains, bottom-up.
//! 3. Size as a function of the scale factor, bottom-up.
//! 4. Layout, top-down, ending with a link step that places `ref`s relative to their targets
//!    and builds connector paths.
//!
//! Phases 2 and 3 are memoized per node so a `ref` can pull its target's result on demand,
//! wherever the target sits in the tree.

use alloc::format;
use alloc::vec::Vec;

use peniko::color::palette::css;
use smallvec::SmallVec;

use crate::dims::{Axis, Size, Transform};
use crate::domain::{Domain, PosScale};
use crate::error::{LayoutError, Result};
use crate::monotonic::Monotonic;
use crate::node::{Node, Operator};
use crate::render::RenderOptions;
use crate::tree::{LayoutInput, LayoutTree, NodeId, Phase, Placement};
use crate::value::Paint;
use crate::{connect, coord, enclose, layer, position, rect, stack};

/// Run every layout phase over `root`.
///
/// The returned tree can be inspected through its phase-checked accessors or handed to
/// [`LayoutTree::draw`].
pub fn layout(options: &RenderOptions, root: Node) -> Result<LayoutTree> {
    let mut tree = LayoutTree::build(root, *options)?;
    tracing::debug!(nodes = tree.len(), "layout started");

    tree.resolve_names()?;
    let root = tree.root();
    tree.infer_pos(root)?;
    tracing::debug!("position domains inferred");
    tree.infer_sizes(root)?;
    tracing::debug!("size functions inferred");

    let spans = [options.width, options.height];
    let domains = tree.pos_domains(root)?.clone();
    let mut input = LayoutInput::new(spans);
    for axis in Axis::BOTH {
        let i = axis.index();
        input.pos_scales[i] = domains[i]
            .as_ref()
            .and_then(|d| PosScale::for_domain(d, spans[i]));
    }
    tree.layout_node(root, &input)?;
    tree.place(root, [Some(options.origin.x), Some(options.origin.y)]);
    tree.link()?;
    tracing::debug!("layout finished");

    if options.debug {
        tracing::debug!(tree = %tree.dump(), "resolved layout");
    }
    Ok(tree)
}

impl LayoutTree {
    pub(crate) fn resolve_names(&mut self) -> Result<()> {
        for i in 0..self.len() {
            if let Some(name) = &self.slots[i].name {
                self.scope.register(name, NodeId(i));
            }
        }

        for i in 0..self.len() {
            let fill = match self.slots[i].op.fill() {
                Some(Paint::Key(key)) => Some(self.colors.assign(key)),
                Some(Paint::Color(color)) => Some(*color),
                None => None,
            };
            self.slots[i].state.fill = fill;
        }

        for i in 0..self.len() {
            if let Operator::Ref(name) = &self.slots[i].op {
                let target = self.scope.resolve(name)?;
                self.slots[i].state.target = Some(target);
            }
        }

        // Connectors without a fill take their first node's.
        for i in 0..self.len() {
            let slot = &self.slots[i];
            if !matches!(slot.op, Operator::Connect(_)) || slot.state.fill.is_some() {
                continue;
            }
            let fill = slot
                .children
                .first()
                .map(|&c| self.slot(c).state.target.unwrap_or(c))
                .and_then(|c| self.slot(c).state.fill)
                .unwrap_or(css::BLACK);
            self.slots[i].state.fill = Some(fill);
        }

        for slot in &mut self.slots {
            slot.state.phase = Phase::NamesResolved;
        }
        tracing::debug!(
            names = self.scope.len(),
            colors = self.colors.len(),
            "names resolved"
        );
        Ok(())
    }

    fn enter(&mut self, id: NodeId) -> Result<()> {
        let slot = self.slot_mut(id);
        if slot.state.visiting {
            return Err(LayoutError::MalformedComposition {
                operator: slot.op.kind(),
                reason: format!("reference cycle through node {}", id.index()),
            });
        }
        slot.state.visiting = true;
        Ok(())
    }

    fn child_ids(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        self.children(id).iter().copied().collect()
    }

    pub(crate) fn infer_pos(&mut self, id: NodeId) -> Result<()> {
        if self.phase(id) >= Phase::DomainsKnown {
            return Ok(());
        }
        self.enter(id)?;
        let children = self.child_ids(id);
        for &child in &children {
            self.infer_pos(child)?;
        }
        let target = self.slot(id).state.target;
        if let Some(target) = target {
            self.infer_pos(target)?;
        }

        let child_domains: Vec<Size<Option<Domain>>> = children
            .iter()
            .map(|&c| self.slot(c).state.pos_domains.clone())
            .collect();
        let domains = match &self.slot(id).op {
            Operator::Rect(spec) => rect::infer_pos_domains(spec),
            Operator::Stack(spec) => stack::infer_pos_domains(spec, &child_domains),
            Operator::Layer(_) | Operator::Coord(_) => layer::unify_children(&child_domains),
            Operator::Position(spec) => position::infer_pos_domains(spec),
            Operator::Enclose(_) | Operator::Connect(_) => [None, None],
            Operator::Ref(_) => match target {
                Some(target) => self.slot(target).state.pos_domains.clone(),
                None => [None, None],
            },
        };

        let state = &mut self.slot_mut(id).state;
        state.pos_domains = domains;
        state.visiting = false;
        state.phase = Phase::DomainsKnown;
        Ok(())
    }

    pub(crate) fn infer_sizes(&mut self, id: NodeId) -> Result<()> {
        if self.phase(id) >= Phase::SizedAsFunction {
            return Ok(());
        }
        self.require(id, Phase::DomainsKnown)?;
        self.enter(id)?;
        let children = self.child_ids(id);
        for &child in &children {
            self.infer_sizes(child)?;
        }
        let target = self.slot(id).state.target;
        if let Some(target) = target {
            self.infer_sizes(target)?;
        }

        let mut child_sizes: Vec<Size<Monotonic>> = Vec::with_capacity(children.len());
        let mut any_data = [false, false];
        for &child in &children {
            child_sizes.push(self.size_domains(child)?.clone());
            let data = self.data_driven(child)?;
            any_data = [any_data[0] || data[0], any_data[1] || data[1]];
        }
        let zero = || [Monotonic::constant(0.0), Monotonic::constant(0.0)];
        let sizes = match &self.slot(id).op {
            Operator::Rect(spec) => rect::infer_size_domains(spec),
            Operator::Stack(spec) => stack::infer_size_domains(spec, &child_sizes),
            Operator::Layer(spec) => layer::infer_size_domains(spec, &child_sizes),
            Operator::Coord(_) => layer::max_children(&child_sizes),
            Operator::Enclose(spec) => enclose::infer_size_domains(spec, &child_sizes),
            Operator::Position(_) => child_sizes.into_iter().next().unwrap_or_else(zero),
            Operator::Connect(_) => zero(),
            Operator::Ref(_) => match target {
                Some(target) => self.size_domains(target)?.clone(),
                None => zero(),
            },
        };

        let data_driven = match &self.slot(id).op {
            Operator::Rect(spec) => rect::data_driven(spec),
            Operator::Stack(spec) => stack::data_driven(spec, any_data),
            Operator::Layer(spec) => [0, 1].map(|i| spec.size[i].is_none() && any_data[i]),
            Operator::Coord(_) | Operator::Enclose(_) | Operator::Position(_) => any_data,
            Operator::Connect(_) => [false, false],
            Operator::Ref(_) => match target {
                Some(target) => self.data_driven(target)?,
                None => [false, false],
            },
        };

        let state = &mut self.slot_mut(id).state;
        state.size_domains = Some(sizes);
        state.data_driven = data_driven;
        state.visiting = false;
        state.phase = Phase::SizedAsFunction;
        Ok(())
    }

    /// Lay out one node and record its placement.
    ///
    /// Operators lay out and place their own children from here.
    pub(crate) fn layout_node(&mut self, id: NodeId, input: &LayoutInput) -> Result<()> {
        self.require(id, Phase::SizedAsFunction)?;
        let op = self.slot(id).op.clone();
        let placement = match &op {
            Operator::Rect(spec) => rect::layout(spec, input),
            Operator::Stack(spec) => stack::layout(self, id, spec, input)?,
            Operator::Layer(spec) => layer::layout(self, id, spec, input)?,
            Operator::Position(spec) => position::layout(self, id, spec, input)?,
            Operator::Enclose(spec) => enclose::layout(self, id, spec, input)?,
            Operator::Connect(_) => connect::layout(self, id, input)?,
            Operator::Coord(spec) => coord::layout(self, id, spec, input)?,
            // Linked once everything else is placed.
            Operator::Ref(_) => Placement::default(),
        };
        tracing::trace!(node = id.index(), kind = op.kind(), "placed");
        let state = &mut self.slot_mut(id).state;
        state.intrinsic = placement.intrinsic;
        state.transform = placement.transform;
        state.paths = placement.paths;
        state.phase = Phase::Placed;
        Ok(())
    }

    /// Place every `ref` relative to its target, then build connector paths.
    ///
    /// A ref's translate is the translate sum from its target up to their lowest common
    /// ancestor, minus the same sum from the ref's parent; its intrinsic bounds are the
    /// target's.
    pub(crate) fn link(&mut self) -> Result<()> {
        for i in 0..self.len() {
            let id = NodeId(i);
            if !matches!(self.slot(id).op, Operator::Ref(_)) {
                continue;
            }
            let Some(target) = self.slot(id).state.target else {
                continue;
            };
            self.require(target, Phase::Placed)?;
            let lca = self.lowest_common_ancestor(target, id);
            let down = self.translate_sum(Some(target), lca);
            let up = self.translate_sum(self.parent(id), lca);
            let intrinsic = self.slot(target).state.intrinsic;
            let state = &mut self.slot_mut(id).state;
            state.intrinsic = intrinsic;
            state.transform = Transform::translate([Some(down[0] - up[0]), Some(down[1] - up[1])]);
            tracing::trace!(node = i, target = target.index(), lca = lca.index(), "linked ref");
        }

        for i in 0..self.len() {
            let id = NodeId(i);
            if let Operator::Connect(spec) = &self.slot(id).op {
                let spec = spec.clone();
                connect::link(self, id, &spec)?;
            }
        }
        Ok(())
    }
}
