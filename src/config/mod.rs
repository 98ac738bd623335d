//! Configuration file handling for rsbuild
//!
//! This module contains data structures for:
//! - `rsbuild.yaml` - Project configuration (compiler, directories, verbosity)

pub mod project;

pub use project::{CONFIG_FILE, ProjectConfig, Verbosity};
