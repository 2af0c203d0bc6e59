//! Testing utilities for the Trellis workspace
//!
//! Shared fixtures and test constructs.

#![allow(missing_docs)]

use trellis_constructs::{SinkProps, SinkQueue, Topic};
use trellis_core::{Construct, ConstructTree, Group, NodeId};

pub const APP_ID: &str = "App";
pub const STACK_ID: &str = "Stack";
pub const SINK_ID: &str = "MySinkQueue";

/// Construct that always reports the same problem
#[derive(Debug, Clone)]
pub struct FailingConstruct {
    pub message: String,
}

impl FailingConstruct {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Construct for FailingConstruct {
    fn kind(&self) -> &'static str {
        "Failing"
    }

    fn validate(&self) -> Vec<String> {
        vec![self.message.clone()]
    }
}

/// A sink with a set of unconnected topics next to it
#[derive(Debug)]
pub struct SinkFixture {
    pub tree: ConstructTree,
    pub stack: NodeId,
    pub sink: NodeId,
    pub topics: Vec<NodeId>,
}

impl SinkFixture {
    pub fn connect_all(&mut self) -> usize {
        SinkQueue::connect(&mut self.tree, self.sink, &self.topics).unwrap()
    }
}

pub fn create_app() -> ConstructTree {
    ConstructTree::new(APP_ID).unwrap()
}

pub fn create_app_with_stack() -> (ConstructTree, NodeId) {
    let mut tree = create_app();
    let root = tree.root();
    let stack = tree.add_child(root, STACK_ID, Group).unwrap();
    (tree, stack)
}

/// Topics `Topic1..=count` under `parent`
pub fn create_topics(tree: &mut ConstructTree, parent: NodeId, count: usize) -> Vec<NodeId> {
    (1..=count)
        .map(|i| Topic::create(tree, parent, format!("Topic{i}")).unwrap())
        .collect()
}

pub fn setup_sink(props: SinkProps, topic_count: usize) -> SinkFixture {
    let (mut tree, stack) = create_app_with_stack();
    let sink = SinkQueue::create(&mut tree, stack, SINK_ID, props).unwrap();
    let topics = create_topics(&mut tree, stack, topic_count);
    SinkFixture {
        tree,
        stack,
        sink,
        topics,
    }
}

pub fn traversal_paths(tree: &ConstructTree) -> Vec<String> {
    tree.traverse().map(|n| n.path().to_string()).collect()
}
