// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while resolving a layout.

use alloc::string::String;
use alloc::vec::Vec;

use crate::tree::{NodeId, Phase};

/// A failure that aborts a whole render.
///
/// The pipeline is pure, so every variant is deterministic: retrying with the same tree
/// reproduces the same error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// A `ref` names a node that was never registered.
    #[error("can't find {name:?}; available nodes: {known:?}")]
    Lookup {
        /// The missing name.
        name: String,
        /// Every name registered in the scope table, sorted.
        known: Vec<String>,
    },
    /// Root finding could not bracket or converge on the target size.
    #[error(
        "no scale factor reaches {target} (last bracket [{low}, {high}] after {iterations} iterations)"
    )]
    Convergence {
        /// The size that was being solved for.
        target: f64,
        /// Lower end of the last bracket.
        low: f64,
        /// Upper end of the last bracket.
        high: f64,
        /// Iterations spent before giving up.
        iterations: usize,
    },
    /// An operator was built with inputs it cannot lay out.
    #[error("malformed {operator}: {reason}")]
    MalformedComposition {
        /// Operator kind, e.g. `"position"`.
        operator: &'static str,
        /// What was wrong.
        reason: String,
    },
    /// Layout state was read before the phase that produces it ran.
    #[error("node {node:?} read at phase {actual:?}, needs {needed:?}")]
    PhaseViolation {
        /// The node whose state was read.
        node: NodeId,
        /// The phase the read requires.
        needed: Phase,
        /// The phase the node had reached.
        actual: Phase,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = LayoutError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn lookup_message_names_missing_identifier() {
        let err = LayoutError::Lookup {
            name: "flow".into(),
            known: vec!["a".into(), "b".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"flow\""), "message was {msg}");
        assert!(msg.contains("\"a\""), "message was {msg}");
    }
}
