// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate transforms: point mappings from a layout space onto the screen.
//!
//! A transform declares the natural extent of its input space (`domain`) and, for radial
//! spaces, the inner size children should be laid out in. Only leaves are mapped; see
//! [`coord`](crate::coord).

use core::f64::consts::{PI, TAU};
use core::fmt::Debug;

use kurbo::{Point, Rect};

use crate::dims::{Interval, Size};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A pluggable mapping from layout coordinates to screen coordinates.
pub trait CoordinateTransform: Debug + Send + Sync {
    /// Short name, used in logs.
    fn name(&self) -> &'static str;

    /// Map one point.
    fn transform(&self, point: Point) -> Point;

    /// Natural extent of the input space per axis.
    fn domain(&self) -> [Interval; 2];

    /// Whether the mapping is affine, so rectangles stay rectangles.
    fn is_linear(&self) -> bool {
        false
    }

    /// Whether the first axis is an angle around a center.
    ///
    /// Radial spaces are sampled more densely when measuring bounds.
    fn is_radial(&self) -> bool {
        false
    }

    /// Layout-space size to lay children out in, given the space on offer.
    fn inner_size(&self, outer: Size) -> Size {
        outer
    }
}

fn radial_inner_size(outer: Size) -> Size {
    [TAU, outer[0].min(outer[1]) / 2.0]
}

fn radial_domain() -> [Interval; 2] {
    [Interval::span(0.0, TAU), Interval::span(0.0, 100.0)]
}

/// The identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct Linear;

impl CoordinateTransform for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn transform(&self, point: Point) -> Point {
        point
    }

    fn domain(&self) -> [Interval; 2] {
        [Interval::span(0.0, 100.0), Interval::span(0.0, 100.0)]
    }

    fn is_linear(&self) -> bool {
        true
    }
}

/// `[θ, r] → [r cos θ, r sin θ]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Polar;

impl CoordinateTransform for Polar {
    fn name(&self) -> &'static str {
        "polar"
    }

    fn transform(&self, point: Point) -> Point {
        let (theta, r) = (point.x, point.y);
        Point::new(r * theta.cos(), r * theta.sin())
    }

    fn domain(&self) -> [Interval; 2] {
        radial_domain()
    }

    fn is_radial(&self) -> bool {
        true
    }

    fn inner_size(&self, outer: Size) -> Size {
        radial_inner_size(outer)
    }
}

/// `[θ, r] → [r sin θ, r cos θ]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolarTransposed;

impl CoordinateTransform for PolarTransposed {
    fn name(&self) -> &'static str {
        "polar-transposed"
    }

    fn transform(&self, point: Point) -> Point {
        let (theta, r) = (point.x, point.y);
        Point::new(r * theta.sin(), r * theta.cos())
    }

    fn domain(&self) -> [Interval; 2] {
        radial_domain()
    }

    fn is_radial(&self) -> bool {
        true
    }

    fn inner_size(&self, outer: Size) -> Size {
        radial_inner_size(outer)
    }
}

/// Polar with `θ = 0` at 12 o'clock, increasing clockwise (for a y-up surface).
#[derive(Clone, Copy, Debug, Default)]
pub struct Clock;

impl CoordinateTransform for Clock {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn transform(&self, point: Point) -> Point {
        let (theta, r) = (point.x, point.y);
        let a = PI / 2.0 - theta;
        Point::new(r * a.cos(), r * a.sin())
    }

    fn domain(&self) -> [Interval; 2] {
        radial_domain()
    }

    fn is_radial(&self) -> bool {
        true
    }

    fn inner_size(&self, outer: Size) -> Size {
        radial_inner_size(outer)
    }
}

/// Bipolar coordinates `[τ, σ]` around two foci.
#[derive(Clone, Copy, Debug)]
pub struct Bipolar {
    /// Scale of the foci separation.
    pub foci_distance: f64,
}

impl Default for Bipolar {
    fn default() -> Self {
        Self {
            foci_distance: 100.0,
        }
    }
}

impl CoordinateTransform for Bipolar {
    fn name(&self) -> &'static str {
        "bipolar"
    }

    fn transform(&self, point: Point) -> Point {
        let (tau, sigma) = (point.x, point.y);
        let denominator = tau.cosh() - sigma.cos();
        Point::new(
            self.foci_distance * tau.sinh() / denominator,
            self.foci_distance * sigma.sin() / denominator,
        )
    }

    fn domain(&self) -> [Interval; 2] {
        [Interval::span(-PI, TAU), Interval::span(-PI, TAU)]
    }

    fn inner_size(&self, _outer: Size) -> Size {
        [TAU, TAU]
    }
}

/// `[r, s] → [r cos(s / r), r sin(s / r)]`: `s` is arc length along the circle of radius `r`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArcLengthPolar;

impl CoordinateTransform for ArcLengthPolar {
    fn name(&self) -> &'static str {
        "arc-length-polar"
    }

    fn transform(&self, point: Point) -> Point {
        let (r, s) = (point.x, point.y);
        Point::new(r * (s / r).cos(), r * (s / r).sin())
    }

    fn domain(&self) -> [Interval; 2] {
        [Interval::span(0.0, 100.0), Interval::span(0.0, TAU)]
    }
}

/// A gentle sinusoidal warp.
#[derive(Clone, Copy, Debug, Default)]
pub struct Wavy;

impl CoordinateTransform for Wavy {
    fn name(&self) -> &'static str {
        "wavy"
    }

    fn transform(&self, point: Point) -> Point {
        Point::new(
            point.x + 5.0 * (point.y / 10.0).sin(),
            point.y + 5.0 * (point.x / 10.0).sin(),
        )
    }

    fn domain(&self) -> [Interval; 2] {
        [Interval::span(0.0, 100.0), Interval::span(0.0, 100.0)]
    }
}

/// Screen-space bounds of the layout-space box `[min_x, max_x] × [min_y, max_y]`.
///
/// Samples corners and edges (denser for radial spaces, which also get the center and an
/// interior grid) and takes the bounds of the mapped points. Non-finite images are ignored;
/// `None` when nothing finite remains.
pub fn transformed_bounds(
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    transform: &dyn CoordinateTransform,
) -> Option<Rect> {
    let (w, h) = (max_x - min_x, max_y - min_y);
    let radial = transform.is_radial();
    let mut bounds: Option<Rect> = None;
    let mut add = |x: f64, y: f64| {
        let p = transform.transform(Point::new(x, y));
        if !p.is_finite() {
            return;
        }
        bounds = Some(match bounds {
            Some(b) => b.union_pt(p),
            None => Rect::from_points(p, p),
        });
    };

    add(min_x, min_y);
    add(max_x, min_y);
    add(min_x, max_y);
    add(max_x, max_y);

    let edge_samples = if radial { 50 } else { 20 };
    for i in 0..=edge_samples {
        let t = f64::from(i) / f64::from(edge_samples);
        add(min_x + w * t, min_y);
        add(min_x + w * t, max_y);
        add(min_x, min_y + h * t);
        add(max_x, min_y + h * t);
    }

    if radial {
        add((min_x + max_x) / 2.0, 0.0);
        for i in 0..=10 {
            let r = min_y + h * f64::from(i) / 10.0;
            for j in 0..=20 {
                add(min_x + w * f64::from(j) / 20.0, r);
            }
        }
    }

    bounds
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn clock_starts_at_twelve_and_runs_clockwise() {
        assert!(close(Clock.transform(Point::new(0.0, 10.0)), Point::new(0.0, 10.0)));
        assert!(close(Clock.transform(Point::new(PI / 2.0, 10.0)), Point::new(10.0, 0.0)));
    }

    #[test]
    fn polar_and_transposed_swap_axes() {
        let p = Point::new(0.3, 7.0);
        let a = Polar.transform(p);
        let b = PolarTransposed.transform(p);
        assert!((a.x - b.y).abs() < 1e-12 && (a.y - b.x).abs() < 1e-12);
    }

    #[test]
    fn full_polar_disc_bounds_are_symmetric() {
        let b = transformed_bounds(0.0, TAU, 0.0, 50.0, &Polar).unwrap();
        assert!((b.x0 + 50.0).abs() < 1e-9 && (b.x1 - 50.0).abs() < 1e-9, "{b:?}");
        assert!((b.y0 + 50.0).abs() < 0.1 && (b.y1 - 50.0).abs() < 0.1, "{b:?}");
    }

    #[test]
    fn bipolar_singularity_is_skipped() {
        let b = transformed_bounds(-1.0, 1.0, -1.0, 1.0, &Bipolar::default());
        assert!(b.is_some_and(|b| b.is_finite()));
    }

    #[test]
    fn linear_bounds_are_the_box() {
        let b = transformed_bounds(2.0, 8.0, -1.0, 3.0, &Linear).unwrap();
        assert_eq!(b, Rect::new(2.0, -1.0, 8.0, 3.0));
    }

    #[test]
    fn radial_inner_size_is_angle_by_radius() {
        assert_eq!(Polar.inner_size([300.0, 200.0]), [TAU, 100.0]);
        assert_eq!(Linear.inner_size([300.0, 200.0]), [300.0, 200.0]);
    }
}
