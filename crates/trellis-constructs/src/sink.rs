//! Sink queue: a queue aggregating messages from any number of producers
//!
//! Two independent invariants guard a sink:
//! - **Capacity** (eager): `connect` fails with
//!   [`ConstructError::CapacityExceeded`] once the cap is reached. Producers
//!   accepted earlier in the same call stay connected.
//! - **Expected count** (deferred): `validate` reports a problem while fewer
//!   producers than expected are connected, so a half-wired sink can be
//!   built and inspected but not synthesized.

use serde_json::{Map, Value};
use trellis_core::{Construct, ConstructError, ConstructResult, ConstructTree, Declaration, NodeId};

/// Cap applied when [`SinkProps::capacity`] is left at its default
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Declaration kind of the sink's own queue
pub const QUEUE_KIND: &str = "Queue";

/// Declaration kind recording one accepted producer on the sink
pub const QUEUE_POLICY_KIND: &str = "QueuePolicy";

/// Upper bound on connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// At most this many connections; `Bounded(0)` accepts none
    Bounded(usize),

    /// No cap
    Unbounded,
}

impl Capacity {
    /// Cap, if any
    #[inline]
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::Bounded(max) => Some(max),
            Self::Unbounded => None,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self::Bounded(DEFAULT_MAX_CONNECTIONS)
    }
}

/// Props for [`SinkQueue`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkProps {
    /// Eager cap on connections
    ///
    /// Default: `Bounded(DEFAULT_MAX_CONNECTIONS)`
    pub capacity: Capacity,

    /// Exact number of connections required before synthesis
    ///
    /// Default: no requirement
    pub expected_count: Option<usize>,

    /// Opaque properties of the queue itself
    pub queue_properties: Map<String, Value>,
}

impl SinkProps {
    /// Create default props
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require exactly `count` connections and refuse any beyond that
    #[inline]
    #[must_use]
    pub fn exactly(count: usize) -> Self {
        Self::new().with_max(count).with_expected(count)
    }

    /// With eager cap
    #[inline]
    #[must_use]
    pub fn with_max(mut self, max: usize) -> Self {
        self.capacity = Capacity::Bounded(max);
        self
    }

    /// Without eager cap
    #[inline]
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.capacity = Capacity::Unbounded;
        self
    }

    /// With deferred exact-count requirement
    ///
    /// Does not touch the cap: `with_expected(0)` still accepts up to the
    /// default cap. Use [`SinkProps::exactly`] to bound both.
    #[inline]
    #[must_use]
    pub fn with_expected(mut self, expected: usize) -> Self {
        self.expected_count = Some(expected);
        self
    }

    /// With queue properties
    #[inline]
    #[must_use]
    pub fn with_queue_properties(mut self, properties: Map<String, Value>) -> Self {
        self.queue_properties = properties;
        self
    }
}

/// Eager capacity state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// Below the cap (or no cap)
    Accepting,

    /// Cap reached; the next connection fails
    Full,
}

/// Deferred completeness state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Fewer connections than expected
    Incomplete {
        /// Required count
        expected: usize,
        /// Current count
        actual: usize,
    },

    /// Requirement met, or none configured
    Satisfied,
}

/// Queue fed by fan-in producers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkQueue {
    capacity: Capacity,
    expected_count: Option<usize>,
    actual_count: usize,
}

impl SinkQueue {
    /// Add a sink under `parent` and declare its queue
    ///
    /// # Errors
    /// Propagates identity errors from [`ConstructTree::add_child`]
    pub fn create(
        tree: &mut ConstructTree,
        parent: NodeId,
        id: impl Into<String>,
        props: SinkProps,
    ) -> ConstructResult<NodeId> {
        let sink = tree.add_child(
            parent,
            id,
            Self {
                capacity: props.capacity,
                expected_count: props.expected_count,
                actual_count: 0,
            },
        )?;
        tree.declare(
            sink,
            Declaration::new(QUEUE_KIND).with_properties(props.queue_properties),
        )?;
        Ok(sink)
    }

    /// Subscribe the sink to every producer, in order
    ///
    /// Each accepted producer is told to deliver to the sink (it declares a
    /// subscription at its own path) and the sink declares a policy entry
    /// naming the producer. Returns the sink's connection count afterwards.
    ///
    /// # Errors
    /// - [`ConstructError::CapacityExceeded`] when the cap is already reached;
    ///   producers earlier in `producers` remain connected
    /// - [`ConstructError::NotAProducer`] if a node cannot deliver to a sink
    /// - [`ConstructError::ConstructMismatch`] if `sink` is not a sink queue
    pub fn connect(
        tree: &mut ConstructTree,
        sink: NodeId,
        producers: &[NodeId],
    ) -> ConstructResult<usize> {
        let sink_path = tree.path(sink)?;

        for &producer in producers {
            let state = tree.construct::<Self>(sink)?;
            if state.state() == SinkState::Full {
                let max = state.capacity.limit().unwrap_or_default();
                tracing::warn!("sink '{}' is full ({} connections)", sink_path, max);
                return Err(ConstructError::CapacityExceeded {
                    sink: sink_path,
                    max,
                });
            }

            let node = tree.node(producer)?;
            let producer_path = node.path().clone();
            let subscription = node
                .construct()
                .as_producer()
                .ok_or_else(|| ConstructError::NotAProducer {
                    path: producer_path.clone(),
                })?
                .subscription(&producer_path, &sink_path);

            tree.declare(producer, subscription)?;
            tree.declare(
                sink,
                Declaration::new(QUEUE_POLICY_KIND)
                    .with_property("Source", producer_path.to_string()),
            )?;

            let state = tree.construct_mut::<Self>(sink)?;
            state.actual_count += 1;
            tracing::debug!(
                "connected '{}' to sink '{}' ({} connection(s))",
                producer_path,
                sink_path,
                state.actual_count
            );
        }

        Ok(tree.construct::<Self>(sink)?.actual_count)
    }

    /// Eager cap
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Deferred requirement
    #[inline]
    #[must_use]
    pub fn expected_count(&self) -> Option<usize> {
        self.expected_count
    }

    /// Connections accepted so far
    #[inline]
    #[must_use]
    pub fn actual_count(&self) -> usize {
        self.actual_count
    }

    /// Capacity state
    #[must_use]
    pub fn state(&self) -> SinkState {
        match self.capacity.limit() {
            Some(max) if self.actual_count >= max => SinkState::Full,
            _ => SinkState::Accepting,
        }
    }

    /// Completeness state
    #[must_use]
    pub fn completeness(&self) -> Completeness {
        match self.expected_count {
            Some(expected) if self.actual_count < expected => Completeness::Incomplete {
                expected,
                actual: self.actual_count,
            },
            _ => Completeness::Satisfied,
        }
    }
}

impl Construct for SinkQueue {
    fn kind(&self) -> &'static str {
        "SinkQueue"
    }

    // Over-count is never reported here; the cap handles that eagerly.
    fn validate(&self) -> Vec<String> {
        match self.completeness() {
            Completeness::Incomplete { expected, actual } => {
                vec![format!("expected {expected} connections, found {actual}")]
            }
            Completeness::Satisfied => Vec::new(),
        }
    }
}
