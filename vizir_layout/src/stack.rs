// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack and spread: distribute children along one axis, align them on the other.
//!
//! Edge-to-edge stacks lay footprints end to end with `spacing` between them. Center-to-center
//! spreads put child *centers* `spacing` apart, so footprints may overlap; ribbons and sankeys
//! use this.
//!
//! With a shared scale, one factor per axis is solved from the stack's own size function so
//! that the children together fill the space on offer, then handed down to every child.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::dims::{Alignment, Axis, AxisExtent, Interval, Size, StackMode, Transform};
use crate::domain::Domain;
use crate::error::Result;
use crate::monotonic::{Monotonic, SolveOptions};
use crate::node::{Node, Operator};
use crate::tree::{LayoutInput, LayoutTree, NodeId, Placement};
use crate::value::MaybeValue;

/// Parameters of a stack or spread.
#[derive(Clone, Debug, PartialEq)]
pub struct StackSpec {
    /// Axis children are distributed along.
    pub direction: Axis,
    /// Gap between footprints (edge-to-edge) or between centers (center-to-center).
    pub spacing: f64,
    /// Cross-axis placement.
    pub alignment: Alignment,
    /// Distribution mode.
    pub mode: StackMode,
    /// Distribute in reverse author order.
    pub reverse: bool,
    /// Solve one scale factor on both axes for all children.
    pub shared_scale: bool,
    /// The stack's own per-axis bounds.
    pub extents: Size<AxisExtent>,
}

impl StackSpec {
    /// An edge-to-edge stack with no spacing and middle alignment.
    pub fn new(direction: Axis) -> Self {
        Self {
            direction,
            spacing: 0.0,
            alignment: Alignment::Middle,
            mode: StackMode::EdgeToEdge,
            reverse: false,
            shared_scale: false,
            extents: [AxisExtent::none(), AxisExtent::none()],
        }
    }

    /// A center-to-center spread.
    pub fn spread(direction: Axis, spacing: f64) -> Self {
        Self::new(direction)
            .with_spacing(spacing)
            .with_mode(StackMode::CenterToCenter)
    }

    /// Builder-style setter for `spacing`.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Builder-style setter for `alignment`.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Builder-style setter for `mode`.
    pub fn with_mode(mut self, mode: StackMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder-style setter for `reverse`.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Builder-style setter for `shared_scale`.
    pub fn with_shared_scale(mut self, shared_scale: bool) -> Self {
        self.shared_scale = shared_scale;
        self
    }

    /// Builder-style setter for the stack's own minimum along `axis`.
    pub fn with_min(mut self, axis: Axis, min: impl Into<MaybeValue<f64>>) -> Self {
        self.extents[axis.index()].min = Some(min.into());
        self
    }

    /// Builder-style setter for the stack's own extent along `axis`.
    pub fn with_size(mut self, axis: Axis, size: impl Into<MaybeValue<f64>>) -> Self {
        self.extents[axis.index()].size = Some(size.into());
        self
    }

    fn stack_axis_size(&self, children: &[Monotonic]) -> Monotonic {
        if let Some(own) = self.extents[self.direction.index()].size_domain() {
            return own;
        }
        let gaps = self.spacing * children.len().saturating_sub(1) as f64;
        match self.mode {
            StackMode::EdgeToEdge => Monotonic::sum(children.iter().cloned()).offset(gaps),
            StackMode::CenterToCenter => match (children.first(), children.last()) {
                (Some(first), Some(last)) => {
                    Monotonic::sum([first.clone().scaled(0.5), last.clone().scaled(0.5)])
                        .offset(gaps)
                }
                _ => Monotonic::constant(0.0),
            },
        }
    }
}

/// Stack `children` as described by `spec`.
pub fn stack(spec: StackSpec, children: impl IntoIterator<Item = Node>) -> Node {
    let shared = [spec.shared_scale; 2];
    Node::new(Operator::Stack(spec), children).with_shared(shared)
}

/// A horizontal edge-to-edge stack with `spacing`.
pub fn stack_x(spacing: f64, children: impl IntoIterator<Item = Node>) -> Node {
    stack(StackSpec::new(Axis::X).with_spacing(spacing), children)
}

/// A vertical edge-to-edge stack with `spacing`.
pub fn stack_y(spacing: f64, children: impl IntoIterator<Item = Node>) -> Node {
    stack(StackSpec::new(Axis::Y).with_spacing(spacing), children)
}

/// Spread `children` center-to-center along `direction`.
pub fn spread(direction: Axis, spacing: f64, children: impl IntoIterator<Item = Node>) -> Node {
    stack(StackSpec::spread(direction, spacing), children)
}

pub(crate) fn infer_pos_domains(
    spec: &StackSpec,
    children: &[Size<Option<Domain>>],
) -> Size<Option<Domain>> {
    Axis::BOTH.map(|axis| {
        let i = axis.index();
        Domain::unify(children.iter().map(|c| c[i].as_ref()))
            .or_else(|| spec.extents[i].pos_domain())
    })
}

pub(crate) fn infer_size_domains(spec: &StackSpec, children: &[Size<Monotonic>]) -> Size<Monotonic> {
    let s = spec.direction.index();
    let a = spec.direction.cross().index();
    let mut along: Vec<Monotonic> = children.iter().map(|c| c[s].clone()).collect();
    if spec.reverse {
        along.reverse();
    }
    let across = spec.extents[a].size_domain().unwrap_or_else(|| {
        Monotonic::max(children.iter().map(|c| c[a].clone()))
    });
    let mut out = [Monotonic::constant(0.0), Monotonic::constant(0.0)];
    out[s] = spec.stack_axis_size(&along);
    out[a] = across;
    out
}

pub(crate) fn data_driven(spec: &StackSpec, children: Size<bool>) -> Size<bool> {
    [0, 1].map(|i| match &spec.extents[i].size {
        Some(size) => size.is_value(),
        None => children[i],
    })
}

/// Solve the factor that makes `measurement` fill `available` on a shared axis.
///
/// Axes with no data-driven extent have nothing to solve and keep `inherited`. A data-driven
/// axis whose measurement ignores the factor (all values zero, say) cannot be solved and is
/// a [`LayoutError::Convergence`](crate::LayoutError::Convergence).
pub(crate) fn solve_shared(
    measurement: &Monotonic,
    data_driven: bool,
    available: f64,
    axis: Axis,
    inherited: Option<f64>,
    options: &SolveOptions,
) -> Result<Option<f64>> {
    if !data_driven {
        tracing::debug!(?axis, "shared axis has no data-driven extent; nothing to solve");
        return Ok(inherited);
    }
    let mut options = *options;
    if available > options.lower_bound {
        options.upper_bound_guess = available;
    }
    let factor = measurement.inverse(available, &options)?;
    tracing::debug!(?axis, target = available, factor, "solved shared scale factor");
    Ok(Some(factor))
}

pub(crate) fn layout(
    tree: &mut LayoutTree,
    id: NodeId,
    spec: &StackSpec,
    input: &LayoutInput,
) -> Result<Placement> {
    let s = spec.direction;
    let a = s.cross();
    let (si, ai) = (s.index(), a.index());

    let mut children: SmallVec<[NodeId; 8]> = tree.children(id).iter().copied().collect();
    if spec.reverse {
        children.reverse();
    }

    let stack_pos = spec.extents[si].resolve_min(input.pos_scales[si].as_ref());
    let align_pos = spec.extents[ai].resolve_min(input.pos_scales[ai].as_ref());
    let size: Size = Axis::BOTH.map(|axis| {
        let i = axis.index();
        spec.extents[i].resolve_size(input.scale_factors[i], input.size[i])
    });

    let mut factors = input.scale_factors;
    let shared = tree.shared(id);
    if shared[0] || shared[1] {
        let measurement = tree.size_domains(id)?.clone();
        let data = tree.data_driven(id)?;
        let options = tree.options.solve;
        for axis in Axis::BOTH {
            let i = axis.index();
            if shared[i] {
                factors[i] =
                    solve_shared(&measurement[i], data[i], size[i], axis, factors[i], &options)?;
            }
        }
    }

    // Each child gets an equal share of the stack axis as an upper bound.
    let n = children.len();
    let gaps = spec.spacing * n.saturating_sub(1) as f64;
    let mut slot = size;
    slot[si] = if n == 0 { 0.0 } else { (size[si] - gaps) / n as f64 };
    let child_input = LayoutInput {
        size: slot,
        scale_factors: factors,
        pos_scales: input.pos_scales,
    };
    for &child in &children {
        tree.layout_node(child, &child_input)?;
    }

    for &child in &children {
        let hangs = tree.intrinsic(child)?[ai].hangs;
        let dims = tree.dims(child)?[ai];
        let lo = match (spec.alignment, hangs) {
            (Alignment::Start, false) | (Alignment::End, true) => 0.0,
            (Alignment::Start, true) | (Alignment::End, false) => -dims.extent(),
            (Alignment::Middle, _) => -dims.extent() / 2.0,
        };
        tree.place_on(child, a, lo - dims.lo());
    }

    match spec.mode {
        // Footprints that hang below their origin grow downwards from 0, the rest upwards.
        StackMode::EdgeToEdge => {
            let (mut up, mut down) = (0.0, 0.0);
            for &child in &children {
                let hangs = tree.intrinsic(child)?[si].hangs;
                let dims = tree.dims(child)?[si];
                let lo = if hangs {
                    let lo = down - dims.extent();
                    down = lo - spec.spacing;
                    lo
                } else {
                    let lo = up;
                    up += dims.extent() + spec.spacing;
                    lo
                };
                tree.place_on(child, s, lo - dims.lo());
            }
        }
        StackMode::CenterToCenter => {
            let mut center = match children.first() {
                Some(&first) => tree.dims(first)?[si].extent() / 2.0,
                None => 0.0,
            };
            for &child in &children {
                let dims = tree.dims(child)?[si];
                tree.place_on(child, s, center - dims.mid());
                center += spec.spacing;
            }
        }
    }

    let mut lo = [0.0_f64; 2];
    let mut hi = [0.0_f64; 2];
    let mut hangs = [n > 0; 2];
    for (k, &child) in children.iter().enumerate() {
        let dims = tree.dims(child)?;
        for i in 0..2 {
            hangs[i] &= dims[i].hangs;
            if k == 0 {
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
        Interval::span(lo[i], hi[i] - lo[i]).with_hangs(hangs[i])
    });
    let mut translate = [None, None];
    translate[si] = stack_pos;
    translate[ai] = align_pos.map(|p| p - lo[ai]);
    Ok(Placement::new(intrinsic, Transform::translate(translate)))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::value::{Measure, v_in};

    fn sizes(along: &[f64]) -> Vec<Size<Monotonic>> {
        along
            .iter()
            .map(|&h| [Monotonic::constant(4.0), Monotonic::constant(h)])
            .collect()
    }

    #[test]
    fn edge_to_edge_size_is_sum_plus_gaps() {
        let spec = StackSpec::new(Axis::Y).with_spacing(5.0);
        let [w, h] = infer_size_domains(&spec, &sizes(&[10.0, 20.0, 30.0]));
        assert_eq!(h.run(1.0), 70.0);
        assert_eq!(w.run(1.0), 4.0, "cross axis is the max");
    }

    #[test]
    fn center_to_center_size_is_half_first_plus_gaps_plus_half_last() {
        let spec = StackSpec::spread(Axis::Y, 5.0);
        let [_, h] = infer_size_domains(&spec, &sizes(&[10.0, 20.0, 30.0]));
        assert!(h.is_linear(), "linear children keep the spread linear");
        assert_eq!(h.run(1.0), 5.0 + 10.0 + 15.0);
    }

    #[test]
    fn own_value_size_overrides_children() {
        let spec = StackSpec::new(Axis::X).with_size(Axis::X, v_in(3.0, "count"));
        let [w, _] = infer_size_domains(&spec, &sizes(&[1.0]));
        assert_eq!(w.run(2.0), 6.0);
    }

    #[test]
    fn pos_domains_unify_then_fall_back_to_own_min() {
        let count = |lo, hi| Some(Domain::continuous(lo, hi, Measure::from("count")));
        let spec = StackSpec::new(Axis::X).with_min(Axis::Y, v_in(9.0, "count"));
        let unified = infer_pos_domains(&spec, &[[count(0.0, 1.0), None], [count(2.0, 3.0), None]]);
        assert_eq!(unified[0], count(0.0, 3.0));
        assert_eq!(unified[1], count(9.0, 9.0), "no child domain; own min wins");
    }

    #[test]
    fn shared_solve_skips_axes_without_data() {
        let opts = SolveOptions::default();
        let kept = solve_shared(&Monotonic::constant(8.0), false, 100.0, Axis::X, Some(2.0), &opts);
        assert_eq!(kept, Ok(Some(2.0)));
        let solved =
            solve_shared(&Monotonic::linear(4.0, 20.0), true, 100.0, Axis::X, None, &opts);
        assert_eq!(solved, Ok(Some(20.0)));
    }

    #[test]
    fn shared_solve_rejects_data_that_ignores_the_factor() {
        let opts = SolveOptions::default();
        let err = solve_shared(&Monotonic::linear(0.0, 0.0), true, 100.0, Axis::Y, None, &opts)
            .unwrap_err();
        assert!(
            matches!(err, crate::LayoutError::Convergence { target, .. } if target == 100.0),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn own_size_decides_whether_an_axis_is_data_driven() {
        let spec = StackSpec::new(Axis::X)
            .with_size(Axis::X, 40.0)
            .with_size(Axis::Y, v_in(2.0, "count"));
        assert_eq!(data_driven(&spec, [true, false]), [false, true]);
        assert_eq!(data_driven(&StackSpec::new(Axis::X), [true, false]), [true, false]);
    }
}
