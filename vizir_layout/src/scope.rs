// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-scoped lookup tables: node names and categorical colors.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::palette::css;

use crate::error::{LayoutError, Result};
use crate::tree::NodeId;

/// Name → node table for one render.
///
/// Populated before any layout read so that `ref`s may point forwards in the tree.
#[derive(Clone, Debug, Default)]
pub struct ScopeContext {
    names: HashMap<String, NodeId>,
}

impl ScopeContext {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, replacing any earlier node with the same name.
    pub fn register(&mut self, name: &str, id: NodeId) {
        if let Some(previous) = self.names.insert(name.into(), id) {
            tracing::debug!(name, ?previous, replacement = ?id, "duplicate node name");
        }
    }

    /// Look up a name, failing with every known name when absent.
    pub fn resolve(&self, name: &str) -> Result<NodeId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| LayoutError::Lookup {
                name: name.into(),
                known: self.known(),
            })
    }

    /// All registered names, sorted.
    pub fn known(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The six-entry categorical palette keys cycle through.
pub const PALETTE: [Color; 6] = [
    css::CORNFLOWER_BLUE,
    css::TOMATO,
    css::MEDIUM_SEA_GREEN,
    css::GOLDENROD,
    css::SLATE_BLUE,
    css::HOT_PINK,
];

/// Key → color assignments for one render. The first key seen gets the first color.
#[derive(Clone, Debug, Default)]
pub struct ColorScale {
    colors: HashMap<String, Color>,
}

impl ColorScale {
    /// An empty scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// The color for `key`, assigning the next palette entry on first sight.
    pub fn assign(&mut self, key: &str) -> Color {
        let next = PALETTE[self.colors.len() % PALETTE.len()];
        *self.colors.entry(key.into()).or_insert(next)
    }

    /// The color already assigned to `key`.
    pub fn get(&self, key: &str) -> Option<Color> {
        self.colors.get(key).copied()
    }

    /// Number of keys seen.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether no key has been seen.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    #[test]
    fn resolve_reports_missing_name_and_known_names() {
        let mut scope = ScopeContext::new();
        scope.register("b", NodeId(1));
        scope.register("a", NodeId(0));
        let err = scope.resolve("c").unwrap_err();
        assert_eq!(
            err,
            LayoutError::Lookup {
                name: "c".into(),
                known: vec!["a".into(), "b".into()],
            }
        );
        assert_eq!(scope.resolve("a"), Ok(NodeId(0)));
    }

    #[test]
    fn later_registration_wins() {
        let mut scope = ScopeContext::new();
        scope.register("x", NodeId(3));
        scope.register("x", NodeId(7));
        assert_eq!(scope.resolve("x"), Ok(NodeId(7)));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn first_seen_key_wins_and_palette_cycles() {
        let mut colors = ColorScale::new();
        let apple = colors.assign("apple");
        let pear = colors.assign("pear");
        assert_eq!(apple, PALETTE[0]);
        assert_eq!(pear, PALETTE[1]);
        assert_eq!(colors.assign("apple"), apple, "reassigning keeps the first color");
        for i in 0..5 {
            colors.assign(&std::format!("k{i}"));
        }
        assert_eq!(colors.get("k4"), Some(PALETTE[0]), "seventh key wraps");
    }
}
