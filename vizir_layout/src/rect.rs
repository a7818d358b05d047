// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle leaves.

use crate::dims::{Axis, AxisExtent, Interval, Size, Transform};
use crate::domain::Domain;
use crate::monotonic::Monotonic;
use crate::node::{Node, Operator};
use crate::scope::PALETTE;
use crate::tree::{LayoutInput, Placement};
use crate::value::{MaybeValue, Paint, Stroke};

/// A rectangle whose bounds may be literal pixels or data values.
#[derive(Clone, Debug, PartialEq)]
pub struct RectSpec {
    /// Per-axis bounds.
    pub extents: Size<AxisExtent>,
    /// Fill paint.
    pub fill: Paint,
    /// Optional outline.
    pub stroke: Option<Stroke>,
    /// Corner radius in pixels.
    pub corner_radius: f64,
}

impl Default for RectSpec {
    fn default() -> Self {
        Self {
            extents: [AxisExtent::none(), AxisExtent::none()],
            fill: Paint::Color(PALETTE[0]),
            stroke: None,
            corner_radius: 0.0,
        }
    }
}

impl RectSpec {
    /// A rect with no bounds set; unset sizes fill the space on offer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the minimum along `axis`.
    pub fn with_min(mut self, axis: Axis, min: impl Into<MaybeValue<f64>>) -> Self {
        self.extents[axis.index()].min = Some(min.into());
        self
    }

    /// Builder-style setter for the extent along `axis`.
    pub fn with_size(mut self, axis: Axis, size: impl Into<MaybeValue<f64>>) -> Self {
        self.extents[axis.index()].size = Some(size.into());
        self
    }

    /// Shorthand for `with_min(Axis::X, x)`.
    pub fn with_x(self, x: impl Into<MaybeValue<f64>>) -> Self {
        self.with_min(Axis::X, x)
    }

    /// Shorthand for `with_min(Axis::Y, y)`.
    pub fn with_y(self, y: impl Into<MaybeValue<f64>>) -> Self {
        self.with_min(Axis::Y, y)
    }

    /// Shorthand for `with_size(Axis::X, w)`.
    pub fn with_w(self, w: impl Into<MaybeValue<f64>>) -> Self {
        self.with_size(Axis::X, w)
    }

    /// Shorthand for `with_size(Axis::Y, h)`.
    pub fn with_h(self, h: impl Into<MaybeValue<f64>>) -> Self {
        self.with_size(Axis::Y, h)
    }

    /// Builder-style setter for the fill.
    pub fn with_fill(mut self, fill: impl Into<Paint>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Builder-style setter for the outline.
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Builder-style setter for the corner radius.
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }
}

/// A rectangle leaf.
pub fn rect(spec: RectSpec) -> Node {
    Node::new(Operator::Rect(spec), [])
}

pub(crate) fn infer_pos_domains(spec: &RectSpec) -> Size<Option<Domain>> {
    [spec.extents[0].pos_domain(), spec.extents[1].pos_domain()]
}

/// An unset size contributes nothing to its parent's size function; at layout it takes
/// whatever space the parent offers instead.
pub(crate) fn infer_size_domains(spec: &RectSpec) -> Size<Monotonic> {
    spec.extents
        .each_ref()
        .map(|e| e.size_domain().unwrap_or_else(|| Monotonic::constant(0.0)))
}

pub(crate) fn data_driven(spec: &RectSpec) -> Size<bool> {
    spec.extents.each_ref().map(|e| e.size_measure().is_some())
}

pub(crate) fn layout(spec: &RectSpec, input: &LayoutInput) -> Placement {
    let mut intrinsic = [Interval::default(); 2];
    let mut translate = [None, None];
    for axis in Axis::BOTH {
        let i = axis.index();
        let extent = &spec.extents[i];
        // Only the minimum is a position; the size is a magnitude in its own measure.
        let size = extent.resolve_size(input.scale_factors[i], input.size[i]);
        intrinsic[i] = Interval::from_extent(size).with_embedded(extent.embedded());
        translate[i] = extent.resolve_min(input.pos_scales[i].as_ref());
    }
    Placement::new(intrinsic, Transform::translate(translate))
}
