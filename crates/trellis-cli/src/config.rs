//! Stack description files
//!
//! A description names the app, its stacks, and what each stack contains.
//! Files are TOML or YAML, picked by extension:
//!
//! ```toml
//! app = "App"
//!
//! [synth]
//! include_empty = false
//!
//! [[stacks]]
//! id = "Stack"
//!
//! [[stacks.topics]]
//! id = "Topic1"
//!
//! [[stacks.sinks]]
//! id = "MySinkQueue"
//! max_connections = 3
//! connect = ["Topic1"]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use trellis_constructs::SinkProps;
use trellis_core::SynthConfig;

/// Default root id when a description omits `app`
pub const DEFAULT_APP_ID: &str = "App";

/// Errors loading a description file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid YAML
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Extension is neither TOML nor YAML
    #[error("unsupported description format: {0} (expected .toml, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

/// Description format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
}

impl Format {
    /// Format implied by a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Some(Self::Toml),
            Some("yaml" | "yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Whole-app description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Root id
    pub app: String,

    /// Synthesis options
    pub synth: SynthSection,

    /// Stacks under the root, in order
    pub stacks: Vec<StackConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: DEFAULT_APP_ID.to_string(),
            synth: SynthSection::default(),
            stacks: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load a description, picking the parser from the file extension
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file is unreadable, malformed, or has an
    /// unknown extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format =
            Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("loading {:?} description from {}", format, path.display());
        Self::parse(&content, format)
    }

    /// Parse a description from a string
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] or [`ConfigError::Yaml`] on malformed input
    pub fn parse(content: &str, format: Format) -> Result<Self, ConfigError> {
        Ok(match format {
            Format::Toml => toml::from_str(content)?,
            Format::Yaml => serde_yaml::from_str(content)?,
        })
    }
}

/// `[synth]` table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthSection {
    /// Emit entries for nodes without declarations
    pub include_empty: bool,
}

impl From<SynthSection> for SynthConfig {
    fn from(section: SynthSection) -> Self {
        SynthConfig::new().with_include_empty(section.include_empty)
    }
}

/// One stack and its contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackConfig {
    /// Stack id
    pub id: String,

    /// Topics
    #[serde(default)]
    pub topics: Vec<TopicConfig>,

    /// Sink queues
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,

    /// Bucket groups
    #[serde(default)]
    pub bucket_groups: Vec<BucketGroupConfig>,
}

/// A topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicConfig {
    /// Topic id
    pub id: String,

    /// Optional display name
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A sink queue and the topics wired to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkConfig {
    /// Sink id
    pub id: String,

    /// Eager cap; the library default applies when absent
    #[serde(default)]
    pub max_connections: Option<usize>,

    /// Remove the cap entirely; overrides `max_connections`
    #[serde(default)]
    pub unbounded: bool,

    /// Required number of connections before synthesis
    #[serde(default)]
    pub expected_connections: Option<usize>,

    /// Ids of topics in the same stack to connect, in order
    #[serde(default)]
    pub connect: Vec<String>,

    /// Opaque queue properties; must be a table/mapping
    #[serde(default)]
    pub queue_properties: Map<String, Value>,
}

impl SinkConfig {
    /// Library props for this sink
    #[must_use]
    pub fn props(&self) -> SinkProps {
        let mut props = SinkProps::new().with_queue_properties(self.queue_properties.clone());
        if self.unbounded {
            props = props.unbounded();
        } else if let Some(max) = self.max_connections {
            props = props.with_max(max);
        }
        if let Some(expected) = self.expected_connections {
            props = props.with_expected(expected);
        }
        props
    }
}

/// A group of buckets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketGroupConfig {
    /// Group id
    pub id: String,

    /// Number of buckets
    pub count: usize,

    /// Principals granted read on every bucket
    #[serde(default)]
    pub grant_read: Vec<String>,
}
