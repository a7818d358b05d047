// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizes as nondecreasing functions of a not-yet-solved scale factor.
//!
//! Many sizes in a chart are data values multiplied by a shared factor that is only known once
//! an ancestor fixes the available space. Each node reports its extent as a [`Monotonic`] in
//! that factor; the ancestor then inverts the combined function once instead of re-walking the
//! tree for every trial factor.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{LayoutError, Result};

/// Tuning for [`Monotonic::inverse`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveOptions {
    /// Accept a factor once `|f(x) - target|` drops below this.
    pub tolerance: f64,
    /// Cap on bracket doublings and, separately, on bisection steps.
    pub max_iterations: usize,
    /// Smallest factor considered.
    pub lower_bound: f64,
    /// First upper bound tried before doubling.
    pub upper_bound_guess: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 100,
            lower_bound: 0.0,
            upper_bound_guess: 10.0,
        }
    }
}

impl SolveOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for `tolerance`.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder-style setter for `max_iterations`.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder-style setter for `lower_bound`.
    pub fn with_lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    /// Builder-style setter for `upper_bound_guess`.
    pub fn with_upper_bound_guess(mut self, upper_bound_guess: f64) -> Self {
        self.upper_bound_guess = upper_bound_guess;
        self
    }
}

/// A nondecreasing `size(scale_factor)`.
#[derive(Clone)]
pub enum Monotonic {
    /// `slope * x + intercept`; inverted in closed form.
    Linear {
        /// Growth per unit of scale factor.
        slope: f64,
        /// Size at factor `0`.
        intercept: f64,
    },
    /// An opaque sampled function; inverted by bracketing and bisection.
    Unknown(Arc<dyn Fn(f64) -> f64>),
}

impl fmt::Debug for Monotonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear { slope, intercept } => f
                .debug_struct("Linear")
                .field("slope", slope)
                .field("intercept", intercept)
                .finish(),
            Self::Unknown(_) => f.debug_tuple("Unknown").field(&"<fn>").finish(),
        }
    }
}

impl Monotonic {
    /// `slope * x + intercept`.
    pub fn linear(slope: f64, intercept: f64) -> Self {
        Self::Linear { slope, intercept }
    }

    /// A size that ignores the factor.
    pub fn constant(size: f64) -> Self {
        Self::linear(0.0, size)
    }

    /// Wrap an opaque nondecreasing function.
    pub fn unknown(run: impl Fn(f64) -> f64 + 'static) -> Self {
        Self::Unknown(Arc::new(run))
    }

    /// Evaluate at a scale factor.
    pub fn run(&self, x: f64) -> f64 {
        match self {
            Self::Linear { slope, intercept } => slope * x + intercept,
            Self::Unknown(run) => run(x),
        }
    }

    /// Whether the closed-form path applies.
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear { .. })
    }

    /// Whether the factor has no influence on the result.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Linear { slope, .. } if *slope == 0.0)
    }

    /// The factor `x` with `run(x) == target`.
    pub fn inverse(&self, target: f64, options: &SolveOptions) -> Result<f64> {
        match self {
            Self::Linear { slope, intercept } => {
                if *slope == 0.0 {
                    return Err(LayoutError::Convergence {
                        target,
                        low: *intercept,
                        high: *intercept,
                        iterations: 0,
                    });
                }
                Ok((target - intercept) / slope)
            }
            Self::Unknown(run) => find_target(target, |x| run(x), options),
        }
    }

    /// Pointwise sum. Linear iff every operand is linear.
    pub fn sum(items: impl IntoIterator<Item = Self>) -> Self {
        let items: Vec<Self> = items.into_iter().collect();
        if items.iter().all(Self::is_linear) {
            let (slope, intercept) = items.iter().fold((0.0, 0.0), |(s, i), m| match m {
                Self::Linear { slope, intercept } => (s + slope, i + intercept),
                Self::Unknown(_) => (s, i),
            });
            return Self::linear(slope, intercept);
        }
        Self::unknown(move |x| items.iter().map(|m| m.run(x)).sum::<f64>())
    }

    /// Pointwise maximum.
    ///
    /// Stays linear only when every operand is linear and all share one intercept (compared
    /// exactly); the result is then the steepest operand. The empty maximum is `0`.
    pub fn max(items: impl IntoIterator<Item = Self>) -> Self {
        let items: Vec<Self> = items.into_iter().collect();
        let Some(first) = items.first() else {
            return Self::constant(0.0);
        };
        if let Self::Linear { intercept, .. } = first {
            let shared = *intercept;
            let mut steepest: Option<f64> = None;
            for m in &items {
                match m {
                    Self::Linear { slope, intercept } if *intercept == shared => {
                        steepest = Some(steepest.map_or(*slope, |s: f64| s.max(*slope)));
                    }
                    _ => {
                        steepest = None;
                        break;
                    }
                }
            }
            if let Some(slope) = steepest {
                return Self::linear(slope, shared);
            }
        }
        Self::unknown(move |x| {
            items
                .iter()
                .map(|m| m.run(x))
                .fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// `k * self`.
    pub fn scaled(self, k: f64) -> Self {
        match self {
            Self::Linear { slope, intercept } => Self::linear(k * slope, k * intercept),
            Self::Unknown(run) => Self::unknown(move |x| k * run(x)),
        }
    }

    /// `self + c`.
    pub fn offset(self, c: f64) -> Self {
        match self {
            Self::Linear { slope, intercept } => Self::linear(slope, intercept + c),
            Self::Unknown(run) => Self::unknown(move |x| run(x) + c),
        }
    }
}

/// Find `x >= options.lower_bound` with `|f(x) - target| < options.tolerance`.
///
/// The upper bound doubles (away from the lower bound) until `f(upper) >= target`, then the
/// bracket is bisected. Failing to bracket, or exhausting the bisection budget, is an error
/// carrying the last bracket.
pub fn find_target(target: f64, f: impl Fn(f64) -> f64, options: &SolveOptions) -> Result<f64> {
    let tolerance = options.tolerance;
    let mut low = options.lower_bound;
    let at_low = f(low);
    if (at_low - target).abs() < tolerance {
        return Ok(low);
    }
    if at_low > target {
        return Err(LayoutError::Convergence {
            target,
            low,
            high: low,
            iterations: 0,
        });
    }

    let mut high = if options.upper_bound_guess > low {
        options.upper_bound_guess
    } else {
        low + 1.0
    };
    let mut iterations = 0;
    while f(high) < target {
        if iterations >= options.max_iterations {
            return Err(LayoutError::Convergence {
                target,
                low,
                high,
                iterations,
            });
        }
        low = high;
        high = options.lower_bound + 2.0 * (high - options.lower_bound);
        iterations += 1;
    }

    for _ in 0..options.max_iterations {
        let mid = (low + high) / 2.0;
        let value = f(mid);
        if (value - target).abs() < tolerance {
            return Ok(mid);
        }
        if value < target {
            low = mid;
        } else {
            high = mid;
        }
        iterations += 1;
    }
    Err(LayoutError::Convergence {
        target,
        low,
        high,
        iterations,
    })
}
