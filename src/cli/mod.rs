//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - build: Build command arguments
//! - status: Status command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod build;
pub mod completions;
pub mod status;

pub use build::BuildArgs;
pub use completions::CompletionsArgs;
pub use status::StatusArgs;

/// rsbuild - incremental RenderScript builder
///
/// Compiles the scripts of a project, turning compiler output into markers
/// and tracking which files every script produced and depends on.
#[derive(Parser, Debug)]
#[command(
    name = "rsbuild",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Incremental RenderScript builder",
    long_about = "rsbuild compiles the RenderScript sources of a project with llvm-rs-cc, \
                  recompiling only what changed, and keeps the compiler's diagnostics \
                  as markers between runs.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  rsbuild build                          \x1b[90m# Compile what changed\x1b[0m\n   \
                  rsbuild build --force                  \x1b[90m# Compile every source\x1b[0m\n   \
                  rsbuild build src/blur.rs              \x1b[90m# Compile one source\x1b[0m\n   \
                  rsbuild -p ./app status                \x1b[90m# Show bundles and markers\x1b[0m\n   \
                  rsbuild clean                          \x1b[90m# Delete everything the compiler produced\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'p', global = true, env = "RSBUILD_PROJECT")]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Compiler to run instead of the configured one
    #[arg(long, global = true, env = "RSBUILD_COMPILER")]
    pub compiler: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile sources that are out of date
    Build(BuildArgs),

    /// Remove compiler outputs, dependency files and markers
    Clean,

    /// Show bundles, pending sources and markers
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
