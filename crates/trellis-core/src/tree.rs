//! Construct tree
//!
//! Arena-backed tree of [`Node`]s. Ownership flows strictly from the arena;
//! parent links are plain [`NodeId`] indices, so there are no reference
//! cycles. Nodes are only ever appended, which keeps every handle valid for
//! the life of the tree.
//!
//! Every tree draws a process-unique identity at creation and stamps it into
//! each handle it issues, so a handle from another tree is rejected even when
//! its index happens to be in range.
//!
//! # Identity
//! Ids are unique among siblings only. Two nodes in different subtrees may
//! share an id; their paths still differ.

use crate::construct::{Construct, Group};
use crate::declaration::Declaration;
use crate::error::{ConstructError, ConstructResult};
use crate::path::NodePath;
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Handle of a node within one [`ConstructTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    tree: u64,
    index: usize,
}

impl NodeId {
    /// Arena index
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.tree)
    }
}

/// One node of the tree
#[derive(Debug)]
pub struct Node {
    handle: NodeId,
    path: NodePath,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    declarations: Vec<Declaration>,
    construct: Box<dyn Construct>,
}

impl Node {
    /// Handle of this node
    #[inline]
    #[must_use]
    pub fn handle(&self) -> NodeId {
        self.handle
    }

    /// Local id (unique among siblings)
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        self.path.id().unwrap_or_default()
    }

    /// Full path from the root
    #[inline]
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Parent handle (`None` for the root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Declarations in the order they were added
    #[inline]
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Behaviour attached to this node
    #[inline]
    #[must_use]
    pub fn construct(&self) -> &dyn Construct {
        &*self.construct
    }
}

/// Tree of constructs with sibling-unique ids
#[derive(Debug)]
pub struct ConstructTree {
    id: u64,
    nodes: Vec<Node>,
}

impl ConstructTree {
    /// Create a tree whose root is a plain [`Group`]
    ///
    /// # Errors
    /// Returns [`ConstructError::InvalidIdentity`] if `root_id` is not a valid id
    pub fn new(root_id: impl Into<String>) -> ConstructResult<Self> {
        Self::with_root(root_id, Group)
    }

    /// Create a tree with a custom root construct
    ///
    /// # Errors
    /// Returns [`ConstructError::InvalidIdentity`] if `root_id` is not a valid id
    pub fn with_root(root_id: impl Into<String>, construct: impl Construct) -> ConstructResult<Self> {
        let id = root_id.into();
        check_id(&id)?;

        let tree = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("created construct tree {} rooted at '{}'", tree, id);

        Ok(Self {
            id: tree,
            nodes: vec![Node {
                handle: NodeId { tree, index: 0 },
                path: NodePath::single(id),
                parent: None,
                children: Vec::new(),
                declarations: Vec::new(),
                construct: Box::new(construct),
            }],
        })
    }

    /// Handle of the root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId {
            tree: self.id,
            index: 0,
        }
    }

    /// Number of nodes, root included
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a child construct under `parent`
    ///
    /// The child is appended after all existing children of `parent`.
    ///
    /// # Errors
    /// - [`ConstructError::NodeNotFound`] if `parent` is not in this tree
    /// - [`ConstructError::InvalidIdentity`] if `id` is empty or contains `/`
    /// - [`ConstructError::DuplicateIdentity`] if a sibling already uses `id`
    pub fn add_child(
        &mut self,
        parent: NodeId,
        id: impl Into<String>,
        construct: impl Construct,
    ) -> ConstructResult<NodeId> {
        self.add_boxed_child(parent, id, Box::new(construct))
    }

    /// Add an already boxed child construct under `parent`
    ///
    /// # Errors
    /// Same as [`ConstructTree::add_child`]
    pub fn add_boxed_child(
        &mut self,
        parent: NodeId,
        id: impl Into<String>,
        construct: Box<dyn Construct>,
    ) -> ConstructResult<NodeId> {
        let id = id.into();
        check_id(&id)?;

        let parent_node = self.node(parent)?;
        if self.child(parent, &id).is_some() {
            return Err(ConstructError::DuplicateIdentity {
                parent: parent_node.path.clone(),
                id,
            });
        }

        let handle = NodeId {
            tree: self.id,
            index: self.nodes.len(),
        };
        let path = parent_node.path.child(id);
        tracing::debug!("adding {} '{}'", construct.kind(), path);

        self.nodes.push(Node {
            handle,
            path,
            parent: Some(parent),
            children: Vec::new(),
            declarations: Vec::new(),
            construct,
        });
        self.nodes[parent.index].children.push(handle);

        Ok(handle)
    }

    /// Look up a node
    ///
    /// # Errors
    /// Returns [`ConstructError::NodeNotFound`] for a foreign handle
    #[inline]
    pub fn node(&self, node: NodeId) -> ConstructResult<&Node> {
        if !self.owns(node) {
            return Err(ConstructError::NodeNotFound(node));
        }
        Ok(&self.nodes[node.index])
    }

    #[inline]
    fn node_mut(&mut self, node: NodeId) -> ConstructResult<&mut Node> {
        if !self.owns(node) {
            return Err(ConstructError::NodeNotFound(node));
        }
        Ok(&mut self.nodes[node.index])
    }

    #[inline]
    fn owns(&self, node: NodeId) -> bool {
        node.tree == self.id && node.index < self.nodes.len()
    }

    /// Path of a node
    ///
    /// # Errors
    /// Returns [`ConstructError::NodeNotFound`] for a foreign handle
    #[inline]
    pub fn path(&self, node: NodeId) -> ConstructResult<NodePath> {
        self.node(node).map(|n| n.path.clone())
    }

    /// Parent of a node (`None` for the root)
    ///
    /// # Errors
    /// Returns [`ConstructError::NodeNotFound`] for a foreign handle
    #[inline]
    pub fn parent(&self, node: NodeId) -> ConstructResult<Option<NodeId>> {
        self.node(node).map(Node::parent)
    }

    /// Children of a node in insertion order
    ///
    /// # Errors
    /// Returns [`ConstructError::NodeNotFound`] for a foreign handle
    #[inline]
    pub fn children(&self, node: NodeId) -> ConstructResult<&[NodeId]> {
        self.node(node).map(Node::children)
    }

    /// Direct child of `parent` with the given id
    #[must_use]
    pub fn child(&self, parent: NodeId, id: &str) -> Option<NodeId> {
        self.node(parent)
            .ok()?
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.index].id() == id)
    }

    /// Resolve a full path (including the root id)
    #[must_use]
    pub fn find(&self, path: &NodePath) -> Option<NodeId> {
        let mut segments = path.iter();
        if segments.next()? != self.nodes[0].id() {
            return None;
        }
        segments.try_fold(self.root(), |node, id| self.child(node, id))
    }

    /// Append a declaration to a node
    ///
    /// # Errors
    /// Returns [`ConstructError::NodeNotFound`] for a foreign handle
    pub fn declare(&mut self, node: NodeId, declaration: Declaration) -> ConstructResult<()> {
        let node = self.node_mut(node)?;
        tracing::debug!("'{}' declares {}", node.path, declaration.kind);
        node.declarations.push(declaration);
        Ok(())
    }

    /// Declarations owned by a node
    ///
    /// # Errors
    /// Returns [`ConstructError::NodeNotFound`] for a foreign handle
    #[inline]
    pub fn declarations(&self, node: NodeId) -> ConstructResult<&[Declaration]> {
        self.node(node).map(Node::declarations)
    }

    /// Typed view of a node's construct
    ///
    /// # Errors
    /// - [`ConstructError::NodeNotFound`] for a foreign handle
    /// - [`ConstructError::ConstructMismatch`] if the node holds another kind
    pub fn construct<T: Construct>(&self, node: NodeId) -> ConstructResult<&T> {
        let node = self.node(node)?;
        let construct: &dyn Construct = &*node.construct;
        construct
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| ConstructError::ConstructMismatch {
                path: node.path.clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Mutable typed view of a node's construct
    ///
    /// # Errors
    /// Same as [`ConstructTree::construct`]
    pub fn construct_mut<T: Construct>(&mut self, node: NodeId) -> ConstructResult<&mut T> {
        let node = self.node_mut(node)?;
        let path = &node.path;
        let construct: &mut dyn Construct = &mut *node.construct;
        construct
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| ConstructError::ConstructMismatch {
                path: path.clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Pre-order walk of the whole tree
    #[inline]
    #[must_use]
    pub fn traverse(&self) -> PreOrder<'_> {
        self.traverse_from(self.root())
    }

    /// Pre-order walk of the subtree rooted at `start`
    ///
    /// A foreign handle yields an empty walk.
    #[must_use]
    pub fn traverse_from(&self, start: NodeId) -> PreOrder<'_> {
        let stack = if self.owns(start) {
            vec![start]
        } else {
            Vec::new()
        };
        PreOrder { tree: self, stack }
    }
}

/// Lazy pre-order iterator: a node is yielded before its children, children
/// in insertion order
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    tree: &'a ConstructTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.tree.nodes[self.stack.pop()?.index];
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn check_id(id: &str) -> ConstructResult<()> {
    NodePath::check_segment(id).map_err(|reason| ConstructError::InvalidIdentity {
        id: id.to_string(),
        reason,
    })
}
