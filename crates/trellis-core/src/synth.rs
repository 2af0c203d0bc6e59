//! Synthesis: validated tree → manifest
//!
//! [`Synthesizer::synthesize`] is the build boundary. It runs the full
//! validation pass first and refuses to produce any output while a single
//! problem remains. On success it walks the tree in the same pre-order as
//! validation and collects each node's declarations under its path.

use crate::declaration::Declaration;
use crate::error::{ConstructError, ConstructResult};
use crate::path::NodePath;
use crate::tree::ConstructTree;
use crate::validation::validate_tree;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Synthesis options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthConfig {
    /// Emit an entry for nodes that own no declarations
    pub include_empty: bool,
}

impl SynthConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With empty-node entries
    #[inline]
    #[must_use]
    pub fn with_include_empty(mut self, include_empty: bool) -> Self {
        self.include_empty = include_empty;
        self
    }
}

/// Synthesis output: node path → declarations, in traversal order
///
/// Equality is order-sensitive: two manifests are equal only if they list
/// the same entries in the same order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: IndexMap<NodePath, Vec<Declaration>>,
}

impl Manifest {
    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if manifest has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declarations owned by `path`
    #[inline]
    #[must_use]
    pub fn get(&self, path: &NodePath) -> Option<&[Declaration]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Entry paths in traversal order
    #[inline]
    pub fn paths(&self) -> impl Iterator<Item = &NodePath> {
        self.entries.keys()
    }

    /// Entries in traversal order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&NodePath, &[Declaration])> {
        self.entries.iter().map(|(p, d)| (p, d.as_slice()))
    }

    /// Total declarations across all entries
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Pretty JSON rendering
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl PartialEq for Manifest {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

/// Orchestrates validation and collection
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    /// Create synthesizer with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create synthesizer with custom configuration
    #[inline]
    #[must_use]
    pub fn with_config(config: SynthConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> SynthConfig {
        self.config
    }

    /// Validate the whole tree, then collect every declaration
    ///
    /// Calling this twice on an unchanged tree yields equal manifests.
    ///
    /// # Errors
    /// Returns [`ConstructError::ValidationFailed`] with every problem found;
    /// no partial manifest is produced in that case
    pub fn synthesize(&self, tree: &ConstructTree) -> ConstructResult<Manifest> {
        let problems = validate_tree(tree);
        if !problems.is_empty() {
            tracing::warn!("synthesis aborted: {} validation problem(s)", problems.len());
            return Err(ConstructError::ValidationFailed { problems });
        }

        let mut entries = IndexMap::new();
        for node in tree.traverse() {
            if node.declarations().is_empty() && !self.config.include_empty {
                continue;
            }
            entries.insert(node.path().clone(), node.declarations().to_vec());
        }

        let manifest = Manifest { entries };
        tracing::info!(
            "synthesized {} entr(ies) with {} declaration(s)",
            manifest.len(),
            manifest.declaration_count()
        );
        Ok(manifest)
    }
}
