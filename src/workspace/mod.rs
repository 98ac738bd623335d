//! Workspace capability for rsbuild
//!
//! The coordinator never touches markers, console output or directory
//! refreshes directly. It talks to a [`Workspace`], which this module
//! defines together with the file-system backed [`ProjectWorkspace`].
//!
//! ## Project Structure
//!
//! ```text
//! <project>/
//! ├── rsbuild.yaml          # Project configuration (optional)
//! ├── src/                  # Sources (`*.rs`)
//! ├── gen/                  # Generated code (-p)
//! ├── res/raw/              # Generated resources (-o)
//! ├── bin/                  # Dependency files (-d), one `.d` per source
//! └── .rsbuild/
//!     ├── state.yaml        # Known sources, hashes, pending sources
//!     └── markers.json      # Problems from the last build
//! ```

use std::path::{Path, PathBuf};

pub mod markers;
pub mod project;

pub use markers::{Marker, MarkerKind, MarkerSet, Severity};
pub use project::ProjectWorkspace;

use crate::path_utils::project_relative;

/// Directory holding rsbuild's own bookkeeping files
pub const STATE_DIR: &str = ".rsbuild";

/// Everything the coordinator needs from the project it builds.
///
/// File arguments are project-relative paths.
pub trait Workspace {
    /// Absolute, canonical project root
    fn root(&self) -> &Path;

    /// Resolve a path reported by the compiler to a project-relative path,
    /// or `None` when it lies outside the project
    fn resolve(&self, reported: &Path) -> Option<PathBuf> {
        project_relative(self.root(), reported)
    }

    /// Absolute location of a project-relative path
    fn location(&self, relative: &Path) -> PathBuf {
        self.root().join(relative)
    }

    /// Attach a problem to a file at a line
    fn mark_file(
        &mut self,
        file: &Path,
        kind: MarkerKind,
        message: &str,
        line: u32,
        severity: Severity,
    );

    /// Attach a problem to the project itself
    fn mark_project(&mut self, kind: MarkerKind, message: &str, severity: Severity);

    /// Remove every marker of `kind` from `file`
    fn remove_markers(&mut self, file: &Path, kind: MarkerKind);

    /// Surface files generated under `directory` (absolute path), down to
    /// `depth` levels below it
    fn refresh(&mut self, directory: &Path, depth: usize);

    /// Echo lines on the project console
    fn print(&mut self, lines: &[String]);

    /// Echo lines on the project console as errors
    fn print_error(&mut self, lines: &[String]);
}
