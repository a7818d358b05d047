// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grammar-of-graphics layout for VizIR.
//!
//! Charts are written as trees of shapes and composition operators:
//! - **Shapes** (`rect`) whose positions and sizes may be literal pixels or data values.
//! - **Operators** (`stack`/`spread`, `layer`, `position`, `enclose`, `connect`, `coord`)
//!   that arrange their children.
//! - **References** (`reference`) that stand in for a named node elsewhere in the tree, so
//!   connectors can join bars that live in different stacks.
//!
//! A render runs four phases over the tree: names and colors are resolved, data domains are
//! inferred bottom-up, every node's size is inferred as a function of an unknown scale
//! factor, and finally layout runs top-down. Containers that share a scale solve that factor
//! (in closed form when possible, by bracketing and bisection otherwise) so their children
//! exactly fill the space on offer.
//!
//! Drawing to a concrete surface is left to a [`Drawer`], which receives resolved
//! [`Primitive`]s; under a non-linear [`CoordinateTransform`] each primitive knows whether it
//! is a glyph, a stroke or a filled area.
//!
//! ```
//! use vizir_layout::{Axis, RectSpec, RenderOptions, StackSpec, layout, rect, stack, v};
//!
//! let bars = stack(
//!     StackSpec::new(Axis::X).with_spacing(5.0).with_shared_scale(true),
//!     [2.0, 3.0, 5.0].map(|h| rect(RectSpec::new().with_w(v(1.0)).with_h(v(h)))),
//! );
//! let tree = layout(&RenderOptions::new(110.0, 100.0), bars).unwrap();
//! let width = tree.dims(tree.root()).unwrap()[0].extent();
//! assert!((width - 110.0).abs() < 1e-6);
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod connect;
mod coord;
mod coordinate;
mod dims;
mod domain;
mod enclose;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod layer;
mod monotonic;
mod node;
mod path;
mod pipeline;
#[cfg(test)]
mod pipeline_tests;
mod position;
mod rect;
mod render;
mod scope;
mod shape;
mod stack;
mod tree;
mod value;

pub use connect::{ConnectSpec, Interpolation, connect};
pub use coord::{CoordSpec, coord};
pub use coordinate::{
    ArcLengthPolar, Bipolar, Clock, CoordinateTransform, Linear, Polar, PolarTransposed, Wavy,
    transformed_bounds,
};
pub use dims::{
    Alignment, Axis, AxisExtent, Dimensions, Interval, Size, StackMode, Transform, translate_dims,
};
pub use domain::{Domain, PosScale};
pub use enclose::{EncloseSpec, enclose};
pub use error::{LayoutError, Result};
pub use layer::{LayerSpec, layer};
pub use monotonic::{Monotonic, SolveOptions, find_target};
pub use node::{Node, Operator, reference};
pub use path::transform_path;
pub use pipeline::layout;
pub use position::{PositionSpec, position};
pub use rect::{RectSpec, rect};
pub use render::{Drawable, Drawer, Primitive, PrimitiveKind, RenderOptions, render};
pub use scope::{ColorScale, PALETTE, ScopeContext};
pub use shape::{ShapeGeometry, shape_geometry};
pub use stack::{StackSpec, spread, stack, stack_x, stack_y};
pub use tree::{LayoutTree, NodeId, Phase};
pub use value::{MaybeValue, Measure, Paint, Stroke, Value, v, v_in};
