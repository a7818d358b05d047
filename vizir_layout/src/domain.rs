// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position domains and the scales built from them.

use crate::value::Measure;

/// The data range a subtree's positions span along one axis.
#[derive(Clone, Debug, PartialEq)]
pub enum Domain {
    /// A numeric range in one measure.
    Continuous {
        /// `(min, max)`.
        range: (f64, f64),
        /// What the range counts.
        measure: Measure,
    },
    /// An opaque value that never unifies with anything.
    Aesthetic(f64),
}

impl Domain {
    /// A continuous domain over `[min, max]`.
    pub fn continuous(min: f64, max: f64, measure: Measure) -> Self {
        Self::Continuous {
            range: (min, max),
            measure,
        }
    }

    /// `(min, max)` of a continuous domain.
    pub fn range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous { range, .. } => Some(*range),
            Self::Aesthetic(_) => None,
        }
    }

    /// The measure of a continuous domain.
    pub fn measure(&self) -> Option<&Measure> {
        match self {
            Self::Continuous { measure, .. } => Some(measure),
            Self::Aesthetic(_) => None,
        }
    }

    /// Unify sibling domains on one axis.
    ///
    /// Siblings without a domain are skipped. The rest unify (as the union of their ranges)
    /// only when every one is continuous and all share a measure; otherwise there is no shared
    /// domain and each sibling positions independently.
    pub fn unify<'a>(domains: impl IntoIterator<Item = Option<&'a Self>>) -> Option<Self> {
        let mut acc: Option<((f64, f64), &Measure)> = None;
        for domain in domains.into_iter().flatten() {
            let Self::Continuous { range, measure } = domain else {
                return None;
            };
            acc = match acc {
                None => Some((*range, measure)),
                Some(((lo, hi), m)) if m == measure => {
                    Some(((lo.min(range.0), hi.max(range.1)), m))
                }
                Some(_) => return None,
            };
        }
        acc.map(|(range, measure)| Self::Continuous {
            range,
            measure: measure.clone(),
        })
    }
}

/// Maps data positions in a continuous domain onto `[0, span]` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PosScale {
    /// Data range.
    pub domain: (f64, f64),
    /// Pixel span the domain maps onto.
    pub span: f64,
}

impl PosScale {
    /// Create a scale.
    pub fn new(domain: (f64, f64), span: f64) -> Self {
        Self { domain, span }
    }

    /// A scale over a continuous domain; aesthetic domains have none.
    pub fn for_domain(domain: &Domain, span: f64) -> Option<Self> {
        domain.range().map(|range| Self::new(range, span))
    }

    /// Map a data position to pixels.
    ///
    /// A degenerate domain maps everything to `0`.
    pub fn map(&self, pos: f64) -> f64 {
        let (d0, d1) = self.domain;
        let width = d1 - d0;
        if width == 0.0 {
            return 0.0;
        }
        (pos - d0) * self.span / width
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn cont(lo: f64, hi: f64, m: &'static str) -> Domain {
        Domain::continuous(lo, hi, Measure::from(m))
    }

    #[test]
    fn unify_takes_union_of_matching_measures() {
        let a = cont(0.0, 4.0, "count");
        let b = cont(-2.0, 3.0, "count");
        let u = Domain::unify([Some(&a), None, Some(&b)]);
        assert_eq!(u, Some(cont(-2.0, 4.0, "count")));
    }

    #[test]
    fn unify_fails_on_mixed_measures_or_aesthetics() {
        let a = cont(0.0, 4.0, "count");
        let b = cont(0.0, 4.0, "year");
        let c = Domain::Aesthetic(1.0);
        assert_eq!(Domain::unify([Some(&a), Some(&b)]), None);
        assert_eq!(Domain::unify([Some(&a), Some(&c)]), None);
    }

    #[test]
    fn unify_of_nothing_is_none() {
        assert_eq!(Domain::unify([None, None]), None);
    }

    #[test]
    fn pos_scale_maps_linearly_and_handles_degenerate_domain() {
        let s = PosScale::new((10.0, 20.0), 100.0);
        assert!((s.map(15.0) - 50.0).abs() < 1e-9, "midpoint maps to half span");
        assert!((s.map(20.0) - 100.0).abs() < 1e-9, "max maps to span");
        let d = PosScale::new((3.0, 3.0), 100.0);
        assert_eq!(d.map(3.0), 0.0, "degenerate domain maps to 0");
    }
}
