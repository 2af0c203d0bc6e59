//! Node paths for addressing within a construct tree
//!
//! Provides [`NodePath`], the root-to-node sequence of ids that keys every
//! synthesis entry and every validation problem.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between path segments
pub const PATH_SEPARATOR: char = '/';

/// Number of hex digits of the path digest appended to a logical id
const LOGICAL_ID_HASH_LEN: usize = 8;

/// Upper bound on the readable part of a logical id
const LOGICAL_ID_MAX_HUMAN_LEN: usize = 255 - LOGICAL_ID_HASH_LEN;

/// Path of a node within a construct tree
///
/// The first segment is always the root's id.
///
/// # Examples
/// - `["App"]` → `App`
/// - `["App", "Stack", "MySinkQueue"]` → `App/Stack/MySinkQueue`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Create path from a single segment
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path has no segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not the root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() <= 1 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Id of the addressed node
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Check if this path is an ancestor of another (strict prefix)
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Stable, provider-neutral logical id for this path
    ///
    /// Alphanumeric characters of every segment followed by the first eight
    /// upper-case hex digits of the SHA-256 of the rendered path. Two paths
    /// that only differ in punctuation still get distinct ids.
    #[must_use]
    pub fn logical_id(&self) -> String {
        let mut human: String = self
            .iter()
            .flat_map(str::chars)
            .filter(char::is_ascii_alphanumeric)
            .collect();
        human.truncate(LOGICAL_ID_MAX_HUMAN_LEN);

        let digest = Sha256::digest(self.to_string().as_bytes());
        let mut suffix = hex::encode_upper(digest);
        suffix.truncate(LOGICAL_ID_HASH_LEN);

        human + &suffix
    }

    /// Check that a single id is usable as a path segment
    ///
    /// # Errors
    /// Returns error if the id is empty or contains the separator
    pub fn check_segment(segment: &str) -> Result<(), PathError> {
        if segment.is_empty() {
            Err(PathError::EmptySegment)
        } else if segment.contains(PATH_SEPARATOR) {
            Err(PathError::InvalidSegment(segment.to_string()))
        } else {
            Ok(())
        }
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; 4];
        let separator: &str = PATH_SEPARATOR.encode_utf8(&mut buf);
        write!(f, "{}", self.0.join(separator))
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s
            .split(PATH_SEPARATOR)
            .map(|seg| Self::check_segment(seg).map(|()| seg.to_string()))
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for NodePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Errors related to node paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Segment contains the path separator
    #[error("invalid segment: {0} (must not contain '/')")]
    InvalidSegment(String),
}
