// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render entry point and the drawer interface.
//!
//! [`render`] lays a tree out and walks it, handing every leaf to a [`Drawer`] as a
//! [`Primitive`]. Composition operators become [`Drawable::Group`]s carrying their
//! placement; a `coord` flattens its whole subtree into leaves with accumulated transforms,
//! because only leaves are meaningful once points are mapped through a non-linear space.

use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Point};
use peniko::Color;

use crate::coordinate::CoordinateTransform;
use crate::dims::{Dimensions, Interval, Transform};
use crate::error::Result;
use crate::monotonic::SolveOptions;
use crate::node::{Node, Operator};
use crate::path::transform_path;
use crate::pipeline::layout;
use crate::scope::PALETTE;
use crate::shape::{ShapeGeometry, shape_geometry};
use crate::tree::{LayoutTree, NodeId};
use crate::value::Stroke;

/// Options for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Width of the drawing area.
    pub width: f64,
    /// Height of the drawing area.
    pub height: f64,
    /// Where the root is placed.
    pub origin: Point,
    /// Emit the resolved tree at `debug` level once layout finishes.
    pub debug: bool,
    /// Root-finding tuning for shared scales.
    pub solve: SolveOptions,
    /// Samples per segment when mapping paths through a non-linear coordinate transform.
    pub subdivision: usize,
}

impl RenderOptions {
    /// Options for a `width × height` area with the root at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin: Point::ORIGIN,
            debug: false,
            solve: SolveOptions::default(),
            subdivision: 1000,
        }
    }

    /// Builder-style setter for `origin`.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Builder-style setter for `debug`.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builder-style setter for `solve`.
    pub fn with_solve(mut self, solve: SolveOptions) -> Self {
        self.solve = solve;
        self
    }

    /// Builder-style setter for `subdivision`.
    pub fn with_subdivision(mut self, subdivision: usize) -> Self {
        self.subdivision = subdivision;
        self
    }
}

/// What a leaf primitive is.
#[derive(Clone, Copy, Debug)]
pub enum PrimitiveKind<'a> {
    /// A rectangle leaf.
    Rect {
        /// Optional outline.
        stroke: Option<Stroke>,
        /// Corner radius.
        corner_radius: f64,
    },
    /// Connector paths, untransformed, in the connector's frame.
    Connector {
        /// One path per consecutive pair.
        paths: &'a [BezPath],
        /// Optional outline.
        stroke: Option<Stroke>,
        /// Opacity in `0..=1`.
        opacity: f64,
    },
    /// Domain lines of a `coord`, already mapped into its screen frame.
    Grid {
        /// One path per line.
        paths: &'a [BezPath],
        /// Line stroke.
        stroke: Stroke,
    },
    /// The outline of an `enclose`.
    Outline {
        /// Outline stroke.
        stroke: Stroke,
        /// Corner radius.
        corner_radius: f64,
    },
}

/// A resolved leaf handed to a [`Drawer`].
#[derive(Clone, Copy, Debug)]
pub struct Primitive<'a> {
    /// What to draw.
    pub kind: PrimitiveKind<'a>,
    /// The node this came from.
    pub node: NodeId,
    /// The node's registered name.
    pub name: Option<&'a str>,
    /// Intrinsic bounds, before `transform`.
    pub dims: Dimensions,
    /// Placement into the frame the primitive is drawn in.
    pub transform: Transform,
    /// The enclosing coordinate space, if any.
    pub coordinate_transform: Option<&'a dyn CoordinateTransform>,
    /// Resolved fill.
    pub fill: Color,
    /// Samples per segment for non-linear mapping.
    pub subdivision: usize,
}

impl Primitive<'_> {
    /// Bounds after `transform`, in the frame the primitive is drawn in.
    pub fn display_dims(&self) -> Dimensions {
        let t = self.transform.offsets();
        core::array::from_fn(|i| {
            let d = &self.dims[i];
            let s = self.transform.scale[i];
            Interval::between(t[i] + s * d.lo(), t[i] + s * d.hi()).with_embedded(d.embedded)
        })
    }

    /// Leaf geometry under the enclosing coordinate space.
    pub fn geometry(&self) -> ShapeGeometry {
        shape_geometry(
            &self.display_dims(),
            self.coordinate_transform,
            self.subdivision,
        )
    }

    /// Connector paths placed by `transform` and mapped through the coordinate space.
    ///
    /// Empty for other kinds.
    pub fn connector_paths(&self) -> Vec<BezPath> {
        let PrimitiveKind::Connector { paths, .. } = self.kind else {
            return Vec::new();
        };
        let affine = self.transform.to_affine();
        paths
            .iter()
            .map(|path| {
                let placed = affine * path.clone();
                match self.coordinate_transform {
                    Some(coord) => transform_path(&placed, coord, self.subdivision),
                    None => placed,
                }
            })
            .collect()
    }
}

/// Turns primitives into whatever a surface needs.
///
/// Drawers only ever see shared references into the laid-out tree.
pub trait Drawer {
    /// One drawn leaf.
    type Output;

    /// Draw one primitive.
    fn draw(&mut self, primitive: &Primitive<'_>) -> Self::Output;
}

/// The drawn tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Drawable<O> {
    /// Children drawn under a shared placement.
    Group {
        /// Placement of the group in its parent.
        transform: Affine,
        /// Drawn children, in tree order.
        children: Vec<Self>,
    },
    /// A drawn leaf.
    Leaf(O),
}

impl<O> Drawable<O> {
    /// Every leaf, depth first.
    pub fn leaves(&self) -> Vec<&O> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a O>) {
        match self {
            Self::Group { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            Self::Leaf(o) => out.push(o),
        }
    }
}

/// Lay `root` out and draw it.
pub fn render<D: Drawer>(
    drawer: &mut D,
    options: &RenderOptions,
    root: Node,
) -> Result<Drawable<D::Output>> {
    layout(options, root)?.draw(drawer)
}

impl LayoutTree {
    /// Draw an already laid-out tree.
    pub fn draw<D: Drawer>(&self, drawer: &mut D) -> Result<Drawable<D::Output>> {
        Ok(self
            .draw_node(self.root(), drawer)?
            .unwrap_or(Drawable::Group {
                transform: Affine::IDENTITY,
                children: Vec::new(),
            }))
    }

    fn primitive<'a>(
        &'a self,
        id: NodeId,
        kind: PrimitiveKind<'a>,
        transform: Transform,
        coordinate_transform: Option<&'a dyn CoordinateTransform>,
    ) -> Result<Primitive<'a>> {
        Ok(Primitive {
            kind,
            node: id,
            name: self.name(id),
            dims: self.intrinsic(id)?,
            transform,
            coordinate_transform,
            fill: self.fill(id)?.unwrap_or(PALETTE[0]),
            subdivision: self.options.subdivision,
        })
    }

    fn leaf_kind(&self, id: NodeId) -> Result<Option<PrimitiveKind<'_>>> {
        Ok(match self.op(id) {
            Operator::Rect(spec) => Some(PrimitiveKind::Rect {
                stroke: spec.stroke,
                corner_radius: spec.corner_radius,
            }),
            Operator::Connect(spec) => Some(PrimitiveKind::Connector {
                paths: self.paths(id)?,
                stroke: spec.stroke,
                opacity: spec.opacity,
            }),
            _ => None,
        })
    }

    fn draw_node<D: Drawer>(&self, id: NodeId, drawer: &mut D) -> Result<Option<Drawable<D::Output>>> {
        let transform = self.transform(id)?;
        if let Some(kind) = self.leaf_kind(id)? {
            let primitive = self.primitive(id, kind, transform, None)?;
            return Ok(Some(Drawable::Leaf(drawer.draw(&primitive))));
        }

        let mut children = Vec::new();
        match self.op(id) {
            Operator::Ref(_) => return Ok(None),
            Operator::Coord(spec) => {
                let coord = spec.transform.as_ref();
                for &child in self.children(id) {
                    self.flatten(child, Transform::default(), coord, drawer, &mut children)?;
                }
                if let Some(stroke) = spec.grid {
                    let kind = PrimitiveKind::Grid {
                        paths: self.paths(id)?,
                        stroke,
                    };
                    let mut grid = self.primitive(id, kind, Transform::default(), None)?;
                    grid.fill = Color::TRANSPARENT;
                    children.push(Drawable::Leaf(drawer.draw(&grid)));
                }
            }
            op => {
                for &child in self.children(id) {
                    if let Some(drawn) = self.draw_node(child, drawer)? {
                        children.push(drawn);
                    }
                }
                if let Operator::Enclose(spec) = op {
                    let kind = PrimitiveKind::Outline {
                        stroke: spec.stroke,
                        corner_radius: spec.corner_radius,
                    };
                    let mut outline = self.primitive(id, kind, Transform::default(), None)?;
                    outline.fill = Color::TRANSPARENT;
                    children.push(Drawable::Leaf(drawer.draw(&outline)));
                }
            }
        }
        Ok(Some(Drawable::Group {
            transform: transform.to_affine(),
            children,
        }))
    }

    /// Emit every leaf below `id` with its transform composed into `outer`.
    fn flatten<D: Drawer>(
        &self,
        id: NodeId,
        outer: Transform,
        coord: &dyn CoordinateTransform,
        drawer: &mut D,
        out: &mut Vec<Drawable<D::Output>>,
    ) -> Result<()> {
        let placed = outer.then(&self.transform(id)?);
        if let Some(kind) = self.leaf_kind(id)? {
            let primitive = self.primitive(id, kind, placed, Some(coord))?;
            out.push(Drawable::Leaf(drawer.draw(&primitive)));
            return Ok(());
        }
        match self.op(id) {
            Operator::Ref(_) => {}
            Operator::Coord(_) => {
                tracing::debug!(node = id.index(), "nested coordinate space drawn in the outer one");
                for &child in self.children(id) {
                    self.flatten(child, placed, coord, drawer, out)?;
                }
            }
            op => {
                for &child in self.children(id) {
                    self.flatten(child, placed, coord, drawer, out)?;
                }
                if let Operator::Enclose(spec) = op {
                    let kind = PrimitiveKind::Outline {
                        stroke: spec.stroke,
                        corner_radius: spec.corner_radius,
                    };
                    let mut outline = self.primitive(id, kind, placed, Some(coord))?;
                    outline.fill = Color::TRANSPARENT;
                    out.push(Drawable::Leaf(drawer.draw(&outline)));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::dims::Axis;
    use crate::enclose::{EncloseSpec, enclose};
    use crate::rect::{RectSpec, rect};
    use crate::stack::{StackSpec, stack};

    /// Records what it was asked to draw.
    struct Recorder;

    impl Drawer for Recorder {
        type Output = (NodeId, Dimensions, bool);

        fn draw(&mut self, primitive: &Primitive<'_>) -> Self::Output {
            let outline = matches!(primitive.kind, PrimitiveKind::Outline { .. });
            (primitive.node, primitive.display_dims(), outline)
        }
    }

    #[test]
    fn operators_become_groups_and_shapes_leaves() {
        let root = stack(
            StackSpec::new(Axis::X).with_spacing(2.0),
            [
                rect(RectSpec::new().with_w(3.0).with_h(4.0)),
                enclose(EncloseSpec::new(), [rect(RectSpec::new().with_w(1.0).with_h(1.0))]),
            ],
        );
        let drawn = render(&mut Recorder, &RenderOptions::new(100.0, 100.0), root).unwrap();
        let Drawable::Group { children, .. } = &drawn else {
            panic!("root stack should be a group");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], Drawable::Leaf(_)));
        let leaves = drawn.leaves();
        assert_eq!(leaves.len(), 3, "two rects and an outline");
        assert!(leaves[2].2, "the outline is drawn after the enclosed children");
        assert_eq!(leaves[0].1[0].min, Some(0.0));
    }

    #[test]
    fn display_dims_apply_scale_then_translate() {
        let p = Primitive {
            kind: PrimitiveKind::Rect {
                stroke: None,
                corner_radius: 0.0,
            },
            node: NodeId(0),
            name: None,
            dims: [Interval::span(1.0, 2.0), Interval::span(0.0, 1.0)],
            transform: Transform::translate([Some(10.0), None]).with_scale([2.0, -1.0]),
            coordinate_transform: None,
            fill: PALETTE[0],
            subdivision: 4,
        };
        let [x, y] = p.display_dims();
        assert_eq!((x.min, x.max), (Some(12.0), Some(16.0)));
        assert_eq!((y.min, y.max), (Some(-1.0), Some(0.0)));
        assert_eq!(p.geometry(), ShapeGeometry::Rect(kurbo::Rect::new(12.0, -1.0, 16.0, 0.0)));
        assert!(p.connector_paths().is_empty());
    }
}
