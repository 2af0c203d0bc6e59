//! Trellis CLI
//!
//! Library half of the `trellis` binary: description loading, tree
//! building, and the `synth`, `validate` and `tree` commands.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod app;
pub mod commands;
pub mod config;

pub use app::{build_tree, BuildError};
pub use commands::{CommandError, Report};
pub use config::{AppConfig, ConfigError, Format};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
