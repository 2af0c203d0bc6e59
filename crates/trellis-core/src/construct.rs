//! Construct kinds and their capabilities
//!
//! Every node in a [`ConstructTree`](crate::tree::ConstructTree) holds a boxed
//! [`Construct`]. The trait is the dispatch table for behaviour that differs
//! between node kinds: deferred validation and, for fan-in sources, the
//! [`Producer`] capability.

use crate::declaration::Declaration;
use crate::path::NodePath;
use std::any::Any;
use std::fmt;

/// Upcast helper so typed handles can be recovered from `dyn Construct`
pub trait AsAny {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour attached to a node
///
/// # Validation
/// `validate()` is only called by the validation pass, after the tree is
/// fully assembled. It must not have side effects and must report every
/// problem it sees rather than stopping at the first.
pub trait Construct: AsAny + fmt::Debug + 'static {
    /// Kind name (for diagnostics and typed lookups)
    fn kind(&self) -> &'static str;

    /// Report problems with this node
    ///
    /// Default: no problems.
    fn validate(&self) -> Vec<String> {
        Vec::new()
    }

    /// Fan-in capability, if this construct can deliver to a sink
    fn as_producer(&self) -> Option<&dyn Producer> {
        None
    }
}

/// Something that can be told to deliver to a sink
pub trait Producer {
    /// Declaration recording that the producer at `own_path` delivers to `sink`
    ///
    /// The returned declaration is appended to the producer's own node, so
    /// wiring is visible on both ends of the connection.
    fn subscription(&self, own_path: &NodePath, sink: &NodePath) -> Declaration;
}

/// Plain grouping construct (apps, stacks, folders)
///
/// Declares nothing and never reports problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Group;

impl Construct for Group {
    fn kind(&self) -> &'static str {
        "Group"
    }
}
