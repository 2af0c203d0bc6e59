//! Topic: a fan-in producer that can deliver to sink queues

use trellis_core::{
    Construct, ConstructResult, ConstructTree, Declaration, NodeId, NodePath, Producer,
};

/// Declaration kind of a topic
pub const TOPIC_KIND: &str = "Topic";

/// Declaration kind of a topic → sink delivery
pub const SUBSCRIPTION_KIND: &str = "Subscription";

/// Publish/subscribe topic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topic {
    display_name: Option<String>,
}

impl Topic {
    /// Add a topic under `parent` and declare it
    ///
    /// # Errors
    /// Propagates identity errors from [`ConstructTree::add_child`]
    pub fn create(
        tree: &mut ConstructTree,
        parent: NodeId,
        id: impl Into<String>,
    ) -> ConstructResult<NodeId> {
        Self::create_with(tree, parent, id, Self::default())
    }

    /// Add a configured topic under `parent` and declare it
    ///
    /// # Errors
    /// Propagates identity errors from [`ConstructTree::add_child`]
    pub fn create_with(
        tree: &mut ConstructTree,
        parent: NodeId,
        id: impl Into<String>,
        topic: Self,
    ) -> ConstructResult<NodeId> {
        let mut declaration = Declaration::new(TOPIC_KIND);
        if let Some(name) = &topic.display_name {
            declaration = declaration.with_property("DisplayName", name.clone());
        }

        let node = tree.add_child(parent, id, topic)?;
        tree.declare(node, declaration)?;
        Ok(node)
    }

    /// With display name
    #[inline]
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Display name, if set
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

impl Construct for Topic {
    fn kind(&self) -> &'static str {
        TOPIC_KIND
    }

    fn as_producer(&self) -> Option<&dyn Producer> {
        Some(self)
    }
}

impl Producer for Topic {
    fn subscription(&self, own_path: &NodePath, sink: &NodePath) -> Declaration {
        Declaration::new(SUBSCRIPTION_KIND)
            .with_property("Protocol", "queue")
            .with_property("TopicRef", own_path.logical_id())
            .with_property("Endpoint", sink.to_string())
    }
}
