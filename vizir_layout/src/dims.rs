// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-axis bounds and placement transforms.

use kurbo::{Affine, Vec2};

use crate::domain::{Domain, PosScale};
use crate::monotonic::Monotonic;
use crate::value::{MaybeValue, Measure};

/// One of the two layout axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical (y grows upwards; surfaces flip when drawing).
    Y,
}

impl Axis {
    /// Both axes in index order.
    pub const BOTH: [Self; 2] = [Self::X, Self::Y];

    /// Index of this axis into `[x, y]` pairs.
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }

    /// The other axis.
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// A per-axis pair, indexed by [`Axis::index`].
pub type Size<T = f64> = [T; 2];

/// Bounds of a node along one axis.
///
/// Fields stay `None` until layout produces them. `embedded` records whether the axis is
/// data-driven and therefore subject to the active coordinate transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub min: Option<f64>,
    /// Midpoint.
    pub center: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
    /// Extent (`max - min`).
    pub size: Option<f64>,
    /// Whether this axis follows the coordinate transform.
    pub embedded: bool,
    /// Whether the extent came from a negative size and runs down from the origin.
    pub hangs: bool,
}

impl Interval {
    /// An interval starting at `min` with the given non-negative extent.
    pub fn span(min: f64, size: f64) -> Self {
        Self {
            min: Some(min),
            center: Some(min + size / 2.0),
            max: Some(min + size),
            size: Some(size),
            embedded: false,
            hangs: false,
        }
    }

    /// An interval between two bounds, in either order.
    pub fn between(a: f64, b: f64) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self::span(lo, hi - lo)
    }

    /// The anchor-at-origin interval a shape occupies.
    ///
    /// Non-negative extents start at `0`; negative extents end at `0` and hang.
    pub fn from_extent(extent: f64) -> Self {
        Self::between(0.0, extent).with_hangs(extent < 0.0)
    }

    /// An interval with a known extent and no position yet.
    pub fn unplaced(size: f64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Builder-style setter for [`Interval::embedded`].
    pub fn with_embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    /// Builder-style setter for [`Interval::hangs`].
    pub fn with_hangs(mut self, hangs: bool) -> Self {
        self.hangs = hangs;
        self
    }

    /// The extent, or `0` when unknown.
    pub fn extent(&self) -> f64 {
        self.size.unwrap_or(0.0)
    }

    /// This interval shifted by `offset`.
    ///
    /// Unknown bounds are read as `0`, so the result is always fully populated.
    pub fn translated(&self, offset: f64) -> Self {
        let min = self.min.unwrap_or(0.0);
        Self {
            min: Some(min + offset),
            center: Some(self.center.unwrap_or(min + self.extent() / 2.0) + offset),
            max: Some(self.max.unwrap_or(min + self.extent()) + offset),
            size: Some(self.extent()),
            embedded: self.embedded,
            hangs: self.hangs,
        }
    }

    /// Lower bound, reading unknown as `0`.
    pub fn lo(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    /// Upper bound, reading unknown as `lo + extent`.
    pub fn hi(&self) -> f64 {
        self.max.unwrap_or(self.lo() + self.extent())
    }

    /// Midpoint, reading unknown as the middle of `lo..hi`.
    pub fn mid(&self) -> f64 {
        self.center.unwrap_or((self.lo() + self.hi()) / 2.0)
    }
}

/// Bounds on both axes.
pub type Dimensions = [Interval; 2];

/// Shift both intervals by a per-axis offset.
pub fn translate_dims(dims: &Dimensions, offset: Size) -> Dimensions {
    [dims[0].translated(offset[0]), dims[1].translated(offset[1])]
}

/// Placement of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Per-axis translation; `None` until something places the node.
    pub translate: Size<Option<f64>>,
    /// Per-axis scale applied to the node's subtree.
    pub scale: Size,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: [None, None],
            scale: [1.0, 1.0],
        }
    }
}

impl Transform {
    /// A transform with the given per-axis translation.
    pub fn translate(translate: Size<Option<f64>>) -> Self {
        Self {
            translate,
            ..Self::default()
        }
    }

    /// Builder-style setter for the scale.
    pub fn with_scale(mut self, scale: Size) -> Self {
        self.scale = scale;
        self
    }

    /// Translation along `axis`, reading unknown as `0`.
    pub fn offset(&self, axis: Axis) -> f64 {
        self.translate[axis.index()].unwrap_or(0.0)
    }

    /// Translation on both axes, reading unknown as `0`.
    pub fn offsets(&self) -> Size {
        [self.offset(Axis::X), self.offset(Axis::Y)]
    }

    /// The transform that applies `inner` first, then `self`.
    pub fn then(&self, inner: &Self) -> Self {
        let [ox, oy] = self.offsets();
        let [ix, iy] = inner.offsets();
        Self {
            translate: [
                Some(ox + self.scale[0] * ix),
                Some(oy + self.scale[1] * iy),
            ],
            scale: [self.scale[0] * inner.scale[0], self.scale[1] * inner.scale[1]],
        }
    }

    /// This transform as an affine map.
    pub fn to_affine(&self) -> Affine {
        let [x, y] = self.offsets();
        Affine::translate(Vec2::new(x, y)) * Affine::scale_non_uniform(self.scale[0], self.scale[1])
    }
}

/// Cross-axis placement of stacked children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Every child's cross-axis minimum sits at `0`.
    Start,
    /// Children are centered on a common line.
    #[default]
    Middle,
    /// Every child's cross-axis maximum sits on the container's edge.
    End,
}

/// How a stack distributes children along its axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StackMode {
    /// Footprints are contiguous, separated by `spacing`.
    #[default]
    EdgeToEdge,
    /// Centers are `spacing` apart; footprints may overlap.
    CenterToCenter,
}

/// Author-facing inputs for one axis of a shape or operator.
///
/// Either field may be a literal pixel quantity or a data value that is resolved through a
/// position scale (`min`) or a scale factor (`size`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisExtent {
    /// Lower bound.
    pub min: Option<MaybeValue<f64>>,
    /// Extent.
    pub size: Option<MaybeValue<f64>>,
}

impl AxisExtent {
    /// An extent with neither bound set.
    pub const fn none() -> Self {
        Self {
            min: None,
            size: None,
        }
    }

    /// Builder-style setter for `min`.
    pub fn with_min(mut self, min: impl Into<MaybeValue<f64>>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Builder-style setter for `size`.
    pub fn with_size(mut self, size: impl Into<MaybeValue<f64>>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Whether this axis is data-driven.
    ///
    /// True iff `size` is a data value and `min` is absent, a literal, or a value sharing the
    /// size's measure.
    pub fn embedded(&self) -> bool {
        let Some(MaybeValue::Value(size)) = &self.size else {
            return false;
        };
        match &self.min {
            None | Some(MaybeValue::Literal(_)) => true,
            Some(MaybeValue::Value(min)) => min.measure == size.measure,
        }
    }

    /// The degenerate domain `[v, v]` of a data-driven minimum.
    pub fn pos_domain(&self) -> Option<Domain> {
        match &self.min {
            Some(MaybeValue::Value(v)) => {
                Some(Domain::continuous(v.datum, v.datum, v.measure.clone()))
            }
            _ => None,
        }
    }

    /// The measure of a data-driven size, if any.
    pub fn size_measure(&self) -> Option<&Measure> {
        match &self.size {
            Some(MaybeValue::Value(v)) => Some(&v.measure),
            _ => None,
        }
    }

    /// Size as a function of the scale factor, or `None` when no size was given.
    ///
    /// Data values grow with the factor (`linear(v, 0)`); literals are constant
    /// (`linear(0, s)`).
    pub fn size_domain(&self) -> Option<Monotonic> {
        self.size.as_ref().map(|size| match size {
            MaybeValue::Value(v) => Monotonic::linear(v.datum, 0.0),
            MaybeValue::Literal(s) => Monotonic::constant(*s),
        })
    }

    /// Pixel extent given the axis scale factor and the space on offer.
    ///
    /// A data value with no solved factor is read in pixels.
    pub fn resolve_size(&self, scale_factor: Option<f64>, available: f64) -> f64 {
        match &self.size {
            Some(MaybeValue::Value(v)) => v.datum * scale_factor.unwrap_or(1.0),
            Some(MaybeValue::Literal(s)) => *s,
            None => available,
        }
    }

    /// Pixel position of the minimum, mapping data values through `pos_scale`.
    ///
    /// A data value with no position scale is read in pixels.
    pub fn resolve_min(&self, pos_scale: Option<&PosScale>) -> Option<f64> {
        match &self.min {
            Some(MaybeValue::Value(v)) => Some(match pos_scale {
                Some(scale) => scale.map(v.datum),
                None => {
                    tracing::debug!(datum = v.datum, "no position scale; reading datum as pixels");
                    v.datum
                }
            }),
            Some(MaybeValue::Literal(l)) => Some(*l),
            None => None,
        }
    }
}
