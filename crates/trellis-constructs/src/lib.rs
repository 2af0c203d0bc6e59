//! Trellis Constructs
//!
//! Reusable constructs built on [`trellis_core`].
//!
//! - [`SinkQueue`]: queue aggregating fan-in producers, with an eager cap
//!   and a deferred exact-count requirement
//! - [`Topic`]: producer that can be wired to sinks
//! - [`Bucket`], [`BucketGroup`]: a composite owning `N` buckets
//!
//! # Example
//!
//! ```rust
//! use trellis_constructs::{SinkProps, SinkQueue, Topic};
//! use trellis_core::{ConstructTree, Synthesizer};
//!
//! let mut tree = ConstructTree::new("App")?;
//! let root = tree.root();
//! let sink = SinkQueue::create(&mut tree, root, "MySinkQueue", SinkProps::exactly(2))?;
//! let t1 = Topic::create(&mut tree, root, "Topic1")?;
//! let t2 = Topic::create(&mut tree, root, "Topic2")?;
//!
//! // Half-wired: validation blocks synthesis
//! SinkQueue::connect(&mut tree, sink, &[t1])?;
//! assert!(Synthesizer::new().synthesize(&tree).is_err());
//!
//! SinkQueue::connect(&mut tree, sink, &[t2])?;
//! assert!(Synthesizer::new().synthesize(&tree).is_ok());
//! # Ok::<(), trellis_core::ConstructError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod bucket;
mod sink;
mod topic;

pub use bucket::{Bucket, BucketGroup, BUCKET_GRANT_KIND, BUCKET_KIND, READ_ACTIONS};
pub use sink::{
    Capacity, Completeness, SinkProps, SinkQueue, SinkState, DEFAULT_MAX_CONNECTIONS, QUEUE_KIND,
    QUEUE_POLICY_KIND,
};
pub use topic::{Topic, SUBSCRIPTION_KIND, TOPIC_KIND};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
