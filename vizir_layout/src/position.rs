// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Center a single child on a point.

use crate::dims::{Axis, Size, Transform};
use crate::domain::Domain;
use crate::error::Result;
use crate::node::{Node, Operator};
use crate::tree::{LayoutInput, LayoutTree, NodeId, Placement};
use crate::value::MaybeValue;

/// The point a child is centered on; unset axes leave the child where it is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionSpec {
    /// Per-axis center, in pixels or data.
    pub pos: Size<Option<MaybeValue<f64>>>,
}

impl PositionSpec {
    /// A position with neither axis set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the horizontal center.
    pub fn with_x(mut self, x: impl Into<MaybeValue<f64>>) -> Self {
        self.pos[0] = Some(x.into());
        self
    }

    /// Builder-style setter for the vertical center.
    pub fn with_y(mut self, y: impl Into<MaybeValue<f64>>) -> Self {
        self.pos[1] = Some(y.into());
        self
    }
}

/// Center `child` on the point described by `spec`.
pub fn position(spec: PositionSpec, child: Node) -> Node {
    Node::new(Operator::Position(spec), [child])
}

pub(crate) fn infer_pos_domains(spec: &PositionSpec) -> Size<Option<Domain>> {
    spec.pos.each_ref().map(|p| match p {
        Some(MaybeValue::Value(v)) => Some(Domain::continuous(v.datum, v.datum, v.measure.clone())),
        _ => None,
    })
}

pub(crate) fn layout(
    tree: &mut LayoutTree,
    id: NodeId,
    spec: &PositionSpec,
    input: &LayoutInput,
) -> Result<Placement> {
    let child = tree.children(id)[0];
    tree.layout_node(child, input)?;
    tree.place(child, [Some(0.0), Some(0.0)]);

    for axis in Axis::BOTH {
        let i = axis.index();
        let at = match &spec.pos[i] {
            Some(MaybeValue::Value(v)) => match &input.pos_scales[i] {
                Some(scale) => scale.map(v.datum),
                None => v.datum,
            },
            Some(MaybeValue::Literal(p)) => *p,
            None => continue,
        };
        let center = tree.dims(child)?[i].mid();
        tree.place_on(child, axis, at - center);
    }

    Ok(Placement::new(tree.dims(child)?, Transform::default()))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::value::{Measure, v_in};

    #[test]
    fn data_position_reports_a_point_domain() {
        let spec = PositionSpec::new().with_x(v_in(3.0, "day")).with_y(12.0);
        let [x, y] = infer_pos_domains(&spec);
        assert_eq!(x, Some(Domain::continuous(3.0, 3.0, Measure::from("day"))));
        assert_eq!(y, None, "literal positions have no domain");
    }
}
