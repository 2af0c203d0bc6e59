//! Subcommand implementations
//!
//! Each command returns a [`Report`]: text for stdout plus any validation
//! problems. The binary decides where the text goes and the exit code.

use crate::app::{build_tree, BuildError};
use crate::config::AppConfig;
use std::fmt::Write as _;
use thiserror::Error;
use trellis_core::{validate_tree, ConstructError, Problem, SynthConfig, Synthesizer};

/// Errors running a command
#[derive(Debug, Error)]
pub enum CommandError {
    /// Tree could not be built
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Manifest could not be rendered
    #[error("failed to render manifest: {0}")]
    Render(#[from] serde_json::Error),
}

/// Command output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Text for stdout
    pub output: String,

    /// Validation problems, in traversal order
    pub problems: Vec<Problem>,
}

impl Report {
    /// True when no problems were reported
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Build, validate and synthesize; output is the manifest JSON
///
/// # Errors
/// Returns [`CommandError`] if the tree cannot be built or rendered.
/// Validation problems are reported in the [`Report`], not as an error.
pub fn synth(config: &AppConfig) -> Result<Report, CommandError> {
    let tree = build_tree(config)?;
    let synthesizer = Synthesizer::with_config(SynthConfig::from(config.synth));

    match synthesizer.synthesize(&tree) {
        Ok(manifest) => Ok(Report {
            output: manifest.to_json_pretty()?,
            problems: Vec::new(),
        }),
        Err(ConstructError::ValidationFailed { problems }) => Ok(Report {
            output: String::new(),
            problems,
        }),
        Err(other) => Err(BuildError::from(other).into()),
    }
}

/// Build and validate only
///
/// # Errors
/// Returns [`CommandError::Build`] if the tree cannot be built
pub fn validate(config: &AppConfig) -> Result<Report, CommandError> {
    let tree = build_tree(config)?;
    let problems = validate_tree(&tree);
    let output = if problems.is_empty() {
        format!("{}: ok ({} node(s))\n", config.app, tree.node_count())
    } else {
        String::new()
    };
    Ok(Report { output, problems })
}

/// Build and list every node as `path  logical-id`, in pre-order
///
/// # Errors
/// Returns [`CommandError::Build`] if the tree cannot be built
pub fn tree(config: &AppConfig) -> Result<Report, CommandError> {
    let tree = build_tree(config)?;
    let mut output = String::new();
    for node in tree.traverse() {
        let _ = writeln!(output, "{}  {}", node.path(), node.path().logical_id());
    }
    Ok(Report {
        output,
        problems: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Format;

    const CONFIG: &str = r#"
[[stacks]]
id = "Stack"
topics = [{ id = "Topic1" }, { id = "Topic2" }]
sinks = [{ id = "Sink", expected_connections = 2, connect = ["Topic1"] }]
"#;

    fn config() -> AppConfig {
        AppConfig::parse(CONFIG, Format::Toml).unwrap()
    }

    #[test]
    fn synth_reports_problems_instead_of_output() {
        let report = synth(&config()).unwrap();
        assert!(!report.is_success());
        assert!(report.output.is_empty());
        assert_eq!(report.problems[0].to_string(), "[App/Stack/Sink] expected 2 connections, found 1");
    }

    #[test]
    fn validate_and_synth_agree() {
        let config = config();
        assert_eq!(validate(&config).unwrap().problems, synth(&config).unwrap().problems);
    }

    #[test]
    fn tree_lists_every_node() {
        let report = tree(&config()).unwrap();
        let lines: Vec<_> = report.output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("App  App"));
        assert!(lines[2].starts_with("App/Stack/Sink  AppStackSink"));
    }
}
