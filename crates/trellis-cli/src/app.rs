//! Build a construct tree from an [`AppConfig`]

use crate::config::{AppConfig, StackConfig};
use std::collections::HashMap;
use thiserror::Error;
use trellis_constructs::{BucketGroup, SinkQueue, Topic};
use trellis_core::{ConstructError, ConstructTree, Group, NodeId};

/// Errors turning a description into a tree
#[derive(Debug, Error)]
pub enum BuildError {
    /// Tree operation failed (duplicate id, cap exceeded, ...)
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// A sink names a topic its stack does not define
    #[error("sink '{sink}' in stack '{stack}' connects unknown topic '{topic}'")]
    UnknownTopic {
        /// Stack id
        stack: String,
        /// Sink id
        sink: String,
        /// Missing topic id
        topic: String,
    },
}

/// Build the tree described by `config`
///
/// Each stack is laid out as sinks, then topics, then bucket groups; sinks
/// are wired once all topics of the stack exist.
///
/// # Errors
/// Returns [`BuildError`] on the first failing tree operation
pub fn build_tree(config: &AppConfig) -> Result<ConstructTree, BuildError> {
    let mut tree = ConstructTree::new(config.app.as_str())?;
    let root = tree.root();

    for stack in &config.stacks {
        build_stack(&mut tree, root, stack)?;
    }

    tracing::info!(
        "built tree '{}' with {} node(s) across {} stack(s)",
        config.app,
        tree.node_count(),
        config.stacks.len()
    );
    Ok(tree)
}

fn build_stack(tree: &mut ConstructTree, root: NodeId, stack: &StackConfig) -> Result<(), BuildError> {
    let node = tree.add_child(root, stack.id.as_str(), Group)?;

    let mut sinks = Vec::with_capacity(stack.sinks.len());
    for sink in &stack.sinks {
        sinks.push(SinkQueue::create(tree, node, sink.id.as_str(), sink.props())?);
    }

    let mut topics = HashMap::with_capacity(stack.topics.len());
    for topic in &stack.topics {
        let mut construct = Topic::default();
        if let Some(name) = &topic.display_name {
            construct = construct.with_display_name(name.as_str());
        }
        let handle = Topic::create_with(tree, node, topic.id.as_str(), construct)?;
        topics.insert(topic.id.as_str(), handle);
    }

    for group in &stack.bucket_groups {
        let handle = BucketGroup::create(tree, node, group.id.as_str(), group.count)?;
        for principal in &group.grant_read {
            BucketGroup::grant_read(tree, handle, principal)?;
        }
    }

    for (sink, &handle) in stack.sinks.iter().zip(&sinks) {
        let producers = sink
            .connect
            .iter()
            .map(|id| {
                topics.get(id.as_str()).copied().ok_or_else(|| BuildError::UnknownTopic {
                    stack: stack.id.clone(),
                    sink: sink.id.clone(),
                    topic: id.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        SinkQueue::connect(tree, handle, &producers)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SinkConfig, TopicConfig};
    use serde_json::Map;

    fn stack(topics: &[&str], connect: &[&str], max: Option<usize>) -> AppConfig {
        AppConfig {
            stacks: vec![StackConfig {
                id: "Stack".to_string(),
                topics: topics
                    .iter()
                    .map(|id| TopicConfig {
                        id: (*id).to_string(),
                        display_name: None,
                    })
                    .collect(),
                sinks: vec![SinkConfig {
                    id: "MySinkQueue".to_string(),
                    max_connections: max,
                    unbounded: false,
                    expected_connections: None,
                    connect: connect.iter().map(|s| (*s).to_string()).collect(),
                    queue_properties: Map::new(),
                }],
                bucket_groups: Vec::new(),
            }],
            ..AppConfig::default()
        }
    }

    #[test]
    fn builds_and_wires() {
        let config = stack(&["Topic1", "Topic2"], &["Topic1", "Topic2"], None);
        let tree = build_tree(&config).unwrap();

        let sink = tree.find(&"App/Stack/MySinkQueue".parse().unwrap()).unwrap();
        assert_eq!(tree.construct::<SinkQueue>(sink).unwrap().actual_count(), 2);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn unknown_topic_is_reported() {
        let config = stack(&["Topic1"], &["Topic9"], None);
        let err = build_tree(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sink 'MySinkQueue' in stack 'Stack' connects unknown topic 'Topic9'"
        );
    }

    #[test]
    fn cap_violation_surfaces_as_construct_error() {
        let config = stack(&["A", "B"], &["A", "B"], Some(1));
        let err = build_tree(&config).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Construct(ConstructError::CapacityExceeded { max: 1, .. })
        ));
    }

    #[test]
    fn duplicate_topic_ids_are_rejected() {
        let config = stack(&["A", "A"], &[], None);
        let err = build_tree(&config).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Construct(ConstructError::DuplicateIdentity { .. })
        ));
    }
}
