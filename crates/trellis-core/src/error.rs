//! Error types for trellis-core
//!
//! Two kinds of failure exist:
//! - Synchronous construction errors (identity, capacity, wiring) that abort
//!   the offending call immediately
//! - [`ConstructError::ValidationFailed`], raised once at synthesis and
//!   carrying every [`Problem`] found by the validation pass

use crate::path::{NodePath, PathError};
use crate::tree::NodeId;
use crate::validation::Problem;
use std::fmt::Write as _;

/// Main construct error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    /// A sibling with the same id already exists
    #[error("there is already a construct with id '{id}' in '{parent}'")]
    DuplicateIdentity {
        /// Path of the parent node
        parent: NodePath,
        /// Colliding id
        id: String,
    },

    /// Id cannot be used as a path segment
    #[error("invalid construct id '{id}': {reason}")]
    InvalidIdentity {
        /// Rejected id
        id: String,
        /// Why it was rejected
        reason: PathError,
    },

    /// Handle does not belong to this tree
    #[error("node {0} not found in tree")]
    NodeNotFound(NodeId),

    /// Handle points at a construct of another kind
    #[error("construct at '{path}' is not a {expected}")]
    ConstructMismatch {
        /// Path of the node
        path: NodePath,
        /// Kind the caller asked for
        expected: &'static str,
    },

    /// Sink already holds its maximum number of connections
    #[error("cannot connect more producers to sink '{sink}': maximum is {max}")]
    CapacityExceeded {
        /// Path of the sink
        sink: NodePath,
        /// Configured cap
        max: usize,
    },

    /// Node cannot deliver to a sink
    #[error("construct at '{path}' cannot be connected to a sink")]
    NotAProducer {
        /// Path of the node
        path: NodePath,
    },

    /// Validation pass reported problems; nothing was synthesized
    #[error("{}", render_problems(.problems))]
    ValidationFailed {
        /// Every problem, in traversal order
        problems: Vec<Problem>,
    },
}

impl ConstructError {
    /// Check if error came from the deferred validation pass
    #[inline]
    #[must_use]
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Problems carried by a validation failure (empty otherwise)
    #[inline]
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        match self {
            Self::ValidationFailed { problems } => problems,
            _ => &[],
        }
    }
}

fn render_problems(problems: &[Problem]) -> String {
    let mut out = format!("validation failed with {} problem(s):", problems.len());
    for problem in problems {
        let _ = write!(out, "\n  {problem}");
    }
    out
}

/// Result type for construct operations
pub type ConstructResult<T> = Result<T, ConstructError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failed_lists_every_problem() {
        let err = ConstructError::ValidationFailed {
            problems: vec![
                Problem::new(NodePath::single("App").child("A"), "first"),
                Problem::new(NodePath::single("App").child("B"), "second"),
            ],
        };

        let rendered = err.to_string();
        assert!(rendered.starts_with("validation failed with 2 problem(s):"));
        assert!(rendered.contains("[App/A] first"));
        assert!(rendered.contains("[App/B] second"));
        assert!(err.is_validation_failure());
        assert_eq!(err.problems().len(), 2);
    }

    #[test]
    fn synchronous_errors_carry_no_problems() {
        let err = ConstructError::CapacityExceeded {
            sink: NodePath::single("App").child("Sink"),
            max: 3,
        };
        assert!(!err.is_validation_failure());
        assert!(err.problems().is_empty());
        assert_eq!(
            err.to_string(),
            "cannot connect more producers to sink 'App/Sink': maximum is 3"
        );
    }
}
