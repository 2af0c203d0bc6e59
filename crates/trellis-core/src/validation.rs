//! Tree-wide validation pass
//!
//! [`validate_tree`] visits every node in pre-order, asks its construct for
//! problems, and tags each one with the node's path. It never short-circuits:
//! a failing subtree does not hide problems in its siblings.

use crate::path::NodePath;
use crate::tree::{ConstructTree, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One problem reported by a node during validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Problem {
    /// Path of the reporting node
    pub path: NodePath,

    /// Human-readable description
    pub message: String,
}

impl Problem {
    /// Create new problem
    #[inline]
    #[must_use]
    pub fn new(path: NodePath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.path, self.message)
    }
}

/// Validate every node of the tree
///
/// Problems come back in pre-order traversal order, and within a node in the
/// order its construct reported them.
#[must_use]
pub fn validate_tree(tree: &ConstructTree) -> Vec<Problem> {
    validate_subtree(tree, tree.root())
}

/// Validate `start` and all of its descendants
#[must_use]
pub fn validate_subtree(tree: &ConstructTree, start: NodeId) -> Vec<Problem> {
    let mut problems = Vec::new();
    let mut visited = 0usize;

    for node in tree.traverse_from(start) {
        visited += 1;
        let reported = node.construct().validate();
        if reported.is_empty() {
            continue;
        }

        let path = node.path();
        tracing::debug!("{} reported {} problem(s)", path, reported.len());
        problems.extend(reported.into_iter().map(|msg| Problem::new(path.clone(), msg)));
    }

    if problems.is_empty() {
        tracing::debug!("validated {} node(s), no problems", visited);
    } else {
        tracing::warn!(
            "validated {} node(s), found {} problem(s)",
            visited,
            problems.len()
        );
    }

    problems
}
