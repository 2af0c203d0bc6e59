//! Buckets and bucket groups
//!
//! [`BucketGroup`] is a reusable composite: it owns `N` child buckets and
//! can grant a principal read access to all of them at once.

use serde_json::json;
use trellis_core::{Construct, ConstructResult, ConstructTree, Declaration, NodeId};

/// Declaration kind of a bucket
pub const BUCKET_KIND: &str = "Bucket";

/// Declaration kind of a read grant on a bucket
pub const BUCKET_GRANT_KIND: &str = "BucketGrant";

/// Actions granted by [`BucketGroup::grant_read`]
pub const READ_ACTIONS: [&str; 3] = ["s3:GetObject*", "s3:GetBucket*", "s3:List*"];

/// Storage bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bucket;

impl Bucket {
    /// Add a bucket under `parent` and declare it
    ///
    /// # Errors
    /// Propagates identity errors from [`ConstructTree::add_child`]
    pub fn create(
        tree: &mut ConstructTree,
        parent: NodeId,
        id: impl Into<String>,
    ) -> ConstructResult<NodeId> {
        let node = tree.add_child(parent, id, Self)?;
        tree.declare(node, Declaration::new(BUCKET_KIND))?;
        Ok(node)
    }

    /// Grant `principal` read access to one bucket
    ///
    /// # Errors
    /// Returns [`trellis_core::ConstructError::NodeNotFound`] for a foreign handle
    pub fn grant_read(tree: &mut ConstructTree, bucket: NodeId, principal: &str) -> ConstructResult<()> {
        tree.declare(
            bucket,
            Declaration::new(BUCKET_GRANT_KIND)
                .with_property("Principal", principal)
                .with_property("Actions", json!(READ_ACTIONS))
                .with_property("Resource", "*"),
        )
    }
}

impl Construct for Bucket {
    fn kind(&self) -> &'static str {
        BUCKET_KIND
    }
}

/// Group of `N` buckets named `Bucket-0`, `Bucket-1`, ...
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketGroup {
    buckets: Vec<NodeId>,
}

impl BucketGroup {
    /// Add a group with `count` buckets under `parent`
    ///
    /// # Errors
    /// Propagates identity errors from [`ConstructTree::add_child`]
    pub fn create(
        tree: &mut ConstructTree,
        parent: NodeId,
        id: impl Into<String>,
        count: usize,
    ) -> ConstructResult<NodeId> {
        let group = tree.add_child(parent, id, Self::default())?;
        for i in 0..count {
            let bucket = Bucket::create(tree, group, format!("Bucket-{i}"))?;
            tree.construct_mut::<Self>(group)?.buckets.push(bucket);
        }
        Ok(group)
    }

    /// Grant `principal` read access on every bucket of the group
    ///
    /// # Errors
    /// Returns [`trellis_core::ConstructError::ConstructMismatch`] if `group`
    /// is not a bucket group
    pub fn grant_read(tree: &mut ConstructTree, group: NodeId, principal: &str) -> ConstructResult<()> {
        let buckets = tree.construct::<Self>(group)?.buckets.clone();
        tracing::debug!("granting read on {} bucket(s) to {}", buckets.len(), principal);
        for bucket in buckets {
            Bucket::grant_read(tree, bucket, principal)?;
        }
        Ok(())
    }

    /// Bucket handles in creation order
    #[inline]
    #[must_use]
    pub fn buckets(&self) -> &[NodeId] {
        &self.buckets
    }
}

impl Construct for BucketGroup {
    fn kind(&self) -> &'static str {
        "BucketGroup"
    }
}
