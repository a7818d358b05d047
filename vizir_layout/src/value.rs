// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Literal vs. data-driven quantities.

use alloc::borrow::Cow;
use alloc::string::String;

use peniko::Color;

/// The unit or field a data value is denominated in.
///
/// Only domains that share a measure unify.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Measure(Cow<'static, str>);

impl Measure {
    /// The measure used when none is given.
    pub const UNIT: Self = Self(Cow::Borrowed("unit"));

    /// A named measure.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The measure's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Measure {
    fn default() -> Self {
        Self::UNIT
    }
}

impl From<&'static str> for Measure {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for Measure {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// A datum tagged with its measure.
#[derive(Clone, Debug, PartialEq)]
pub struct Value<T> {
    /// The raw datum.
    pub datum: T,
    /// What the datum counts.
    pub measure: Measure,
}

/// Either a literal pixel quantity or a data value resolved later through a scale.
#[derive(Clone, Debug, PartialEq)]
pub enum MaybeValue<T> {
    /// Used as-is.
    Literal(T),
    /// Deferred until domains and scale factors are known.
    Value(Value<T>),
}

impl<T> MaybeValue<T> {
    /// Whether this is a data value.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// The raw number regardless of kind.
    pub fn raw(&self) -> &T {
        match self {
            Self::Literal(t) => t,
            Self::Value(v) => &v.datum,
        }
    }
}

impl<T> From<Value<T>> for MaybeValue<T> {
    fn from(value: Value<T>) -> Self {
        Self::Value(value)
    }
}

impl From<f64> for MaybeValue<f64> {
    fn from(literal: f64) -> Self {
        Self::Literal(literal)
    }
}

/// A data value in the default measure.
pub fn v<T>(datum: T) -> Value<T> {
    Value {
        datum,
        measure: Measure::UNIT,
    }
}

/// A data value in a named measure.
pub fn v_in<T>(datum: T, measure: impl Into<Measure>) -> Value<T> {
    Value {
        datum,
        measure: measure.into(),
    }
}

/// A fill that is either a concrete color or a key looked up in the render's color scale.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// A concrete color.
    Color(Color),
    /// A categorical key; the first key seen gets the first palette entry.
    Key(String),
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

impl From<&str> for Paint {
    fn from(key: &str) -> Self {
        Self::Key(key.into())
    }
}

impl From<String> for Paint {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

/// A solid outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Outline color.
    pub color: Color,
    /// Outline width in pixels.
    pub width: f64,
}

impl Stroke {
    /// A solid outline.
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}
