//! Buildable source files

use std::path::{Path, PathBuf};

use crate::path_utils::project_relative;

/// A source file the compiler is run on
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceUnit {
    /// Path relative to the project root
    pub relative: PathBuf,

    /// Absolute path, passed to the compiler
    pub path: PathBuf,
}

impl SourceUnit {
    /// Source at a project-relative path
    pub fn new(root: &Path, relative: impl Into<PathBuf>) -> Self {
        let relative = relative.into();
        Self {
            path: root.join(&relative),
            relative,
        }
    }

    /// Source at an absolute path; `None` when it is outside `root`
    pub fn from_absolute(root: &Path, path: &Path) -> Option<Self> {
        project_relative(root, path).map(|relative| Self::new(root, relative))
    }
}
