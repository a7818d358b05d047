// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The author-facing tree that operator factories build.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::connect::ConnectSpec;
use crate::coord::CoordSpec;
use crate::dims::Size;
use crate::enclose::EncloseSpec;
use crate::error::{LayoutError, Result};
use crate::layer::LayerSpec;
use crate::position::PositionSpec;
use crate::rect::RectSpec;
use crate::stack::StackSpec;
use crate::value::Paint;

/// One primitive or composition operator.
///
/// The kind set is closed; every pipeline phase matches on it.
#[derive(Clone, Debug)]
pub enum Operator {
    /// A leaf rectangle.
    Rect(RectSpec),
    /// Stack or spread children along an axis.
    Stack(StackSpec),
    /// Overlay children.
    Layer(LayerSpec),
    /// Center a single child on a point.
    Position(PositionSpec),
    /// Outline children with padding.
    Enclose(EncloseSpec),
    /// Join consecutive children with ribbons or lines.
    Connect(ConnectSpec),
    /// Lay children out in a non-Euclidean space.
    Coord(CoordSpec),
    /// Stand in for the node registered under a name.
    Ref(String),
}

impl Operator {
    /// A short lowercase name for the kind, used in errors and dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rect(_) => "rect",
            Self::Stack(_) => "stack",
            Self::Layer(_) => "layer",
            Self::Position(_) => "position",
            Self::Enclose(_) => "enclose",
            Self::Connect(_) => "connect",
            Self::Coord(_) => "coord",
            Self::Ref(_) => "ref",
        }
    }

    /// The fill channel, for operators that have one.
    pub(crate) fn fill(&self) -> Option<&Paint> {
        match self {
            Self::Rect(spec) => Some(&spec.fill),
            Self::Connect(spec) => spec.fill.as_ref(),
            _ => None,
        }
    }

    /// Check child-count preconditions.
    pub(crate) fn validate(&self, children: usize) -> Result<()> {
        let expected = match self {
            Self::Position(_) => Some(1),
            Self::Rect(_) | Self::Ref(_) => Some(0),
            _ => None,
        };
        match expected {
            Some(n) if n != children => Err(LayoutError::MalformedComposition {
                operator: self.kind(),
                reason: format!("expects exactly {n} child(ren), got {children}"),
            }),
            _ => Ok(()),
        }
    }
}

/// A node in the author-facing tree.
///
/// A node exclusively owns its children. Layout never mutates a `Node`; rendering copies the
/// tree into a [`LayoutTree`](crate::LayoutTree) and works there.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) op: Operator,
    pub(crate) name: Option<String>,
    pub(crate) shared: Size<bool>,
    pub(crate) children: Vec<Self>,
}

impl Node {
    /// A node with no name and no shared scales.
    pub fn new(op: Operator, children: impl IntoIterator<Item = Self>) -> Self {
        Self {
            op,
            name: None,
            shared: [false, false],
            children: children.into_iter().collect(),
        }
    }

    /// Register this node under `name` so `ref`s can find it.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Solve one scale factor per axis across all children instead of one per child.
    pub fn with_shared(mut self, shared: Size<bool>) -> Self {
        self.shared = shared;
        self
    }

    /// The operator.
    pub fn op(&self) -> &Operator {
        &self.op
    }

    /// The registered name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Per-axis shared-scale flags.
    pub fn shared(&self) -> Size<bool> {
        self.shared
    }

    /// Owned children.
    pub fn children(&self) -> &[Self] {
        &self.children
    }
}

/// A stand-in for the node registered under `name`.
///
/// Resolution happens when a render starts; an unknown name aborts it with
/// [`LayoutError::Lookup`].
pub fn reference(name: impl Into<String>) -> Node {
    Node::new(Operator::Ref(name.into()), [])
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::rect::{RectSpec, rect};

    #[test]
    fn position_requires_exactly_one_child() {
        let op = Operator::Position(PositionSpec::new());
        assert!(op.validate(1).is_ok(), "one child is fine");
        let err = op.validate(2).unwrap_err();
        assert!(
            matches!(err, LayoutError::MalformedComposition { operator: "position", .. }),
            "unexpected error: {err:?}"
        );
        assert!(op.validate(0).is_err(), "zero children is malformed");
    }

    #[test]
    fn builder_records_name_and_shared_flags() {
        let node = rect(RectSpec::new().with_w(4.0).with_h(2.0))
            .named("bar")
            .with_shared([true, false]);
        assert_eq!(node.name(), Some("bar"));
        assert_eq!(node.shared(), [true, false]);
        assert_eq!(node.op().kind(), "rect");
        assert!(node.children().is_empty(), "rects are leaves");
    }
}
