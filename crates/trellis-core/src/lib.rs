//! Trellis Core
//!
//! Hierarchical construct trees with a two-phase build discipline.
//!
//! # Two-Phase Architecture
//!
//! 1. **Construction Phase**: assemble a [`ConstructTree`]. Identity
//!    collisions and capacity violations fail immediately.
//! 2. **Synthesis Phase**: [`Synthesizer::synthesize`] validates every node
//!    and, only if no node reports a problem, collects all declarations into
//!    a [`Manifest`].
//!
//! # Core Concepts
//!
//! - [`ConstructTree`]: arena of nodes with sibling-unique ids
//! - [`NodePath`]: root-to-node addressing key
//! - [`Construct`]: per-kind behaviour (validation, producer capability)
//! - [`Declaration`]: opaque resource payload owned by a node
//! - [`Problem`]: deferred validation report
//!
//! # Example
//!
//! ```rust
//! use trellis_core::prelude::*;
//!
//! let mut tree = ConstructTree::new("App")?;
//! let root = tree.root();
//! let bucket = tree.add_child(root, "Bucket", Group)?;
//! tree.declare(bucket, Declaration::new("Bucket"))?;
//!
//! let manifest = Synthesizer::new().synthesize(&tree)?;
//! assert_eq!(manifest.len(), 1);
//! # Ok::<(), trellis_core::ConstructError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod construct;
mod declaration;
mod error;
mod path;
mod synth;
mod tree;
mod validation;

// Re-exports
pub use construct::{AsAny, Construct, Group, Producer};
pub use declaration::Declaration;
pub use error::{ConstructError, ConstructResult};
pub use path::{NodePath, PathError, PATH_SEPARATOR};
pub use synth::{Manifest, SynthConfig, Synthesizer};
pub use tree::{ConstructTree, Node, NodeId, PreOrder};
pub use validation::{validate_subtree, validate_tree, Problem};

/// Convenience re-exports for building trees
pub mod prelude {
    pub use crate::{
        Construct, ConstructError, ConstructResult, ConstructTree, Declaration, Group, Manifest,
        NodeId, NodePath, Problem, Producer, SynthConfig, Synthesizer,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
