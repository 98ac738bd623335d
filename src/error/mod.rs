//! Error types and handling for rsbuild
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`config`]: Configuration errors
//! - [`depfile`]: Dependency file errors
//! - [`fs`]: File system errors
//! - [`state`]: Persisted build state errors
//! - [`tool`]: External compiler errors

pub mod config;
pub mod depfile;
pub mod fs;
pub mod state;
pub mod tool;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for rsbuild operations
#[derive(Error, Diagnostic, Debug)]
pub enum RsBuildError {
    // Project errors
    #[error("Project directory not found: {path}")]
    #[diagnostic(
        code(rsbuild::project::not_found),
        help("Pass an existing directory with --project or set RSBUILD_PROJECT")
    )]
    ProjectNotFound { path: String },

    #[error("Source file is not inside the project: {path}")]
    #[diagnostic(code(rsbuild::project::source_outside))]
    SourceOutsideProject { path: String },

    // Build errors
    #[error("{count} source(s) failed to compile")]
    #[diagnostic(
        code(rsbuild::build::failed),
        help("Run 'rsbuild status' to list the markers, or rebuild with --verbose")
    )]
    BuildFailed { count: usize },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(rsbuild::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(rsbuild::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code(rsbuild::config::invalid),
        help("Check rsbuild.yaml in the project root")
    )]
    ConfigInvalid { message: String },

    // Compiler errors
    #[error("Error executing compiler. Please check {name} is present at {command}")]
    #[diagnostic(
        code(rsbuild::tool::invocation_failed),
        help("Set `compiler` in rsbuild.yaml or pass --compiler")
    )]
    ToolInvocationFailed {
        name: String,
        command: String,
        reason: String,
    },

    // Dependency file errors
    #[error("Malformed dependency file {path}: {reason}")]
    #[diagnostic(
        code(rsbuild::depfile::corrupt),
        help("Delete the file and rebuild; it is regenerated by the compiler")
    )]
    DependencyFileCorrupt { path: String, reason: String },

    // State errors
    #[error("Failed to parse build state: {path}: {reason}")]
    #[diagnostic(
        code(rsbuild::state::parse_failed),
        help("Run 'rsbuild clean' to reset the build state")
    )]
    StateParseFailed { path: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(rsbuild::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(rsbuild::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(rsbuild::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to remove file: {path}")]
    #[diagnostic(code(rsbuild::fs::remove_failed))]
    FileRemoveFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(rsbuild::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for RsBuildError {
    fn from(err: std::io::Error) -> Self {
        RsBuildError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RsBuildError {
    fn from(err: serde_yaml::Error) -> Self {
        RsBuildError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RsBuildError {
    fn from(err: serde_json::Error) -> Self {
        RsBuildError::StateParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<walkdir::Error> for RsBuildError {
    fn from(err: walkdir::Error) -> Self {
        RsBuildError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RsBuildError>;
