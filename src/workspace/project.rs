//! File-system backed [`Workspace`] used by the `rsbuild` binary

use std::path::{Path, PathBuf};

use console::style;
use walkdir::WalkDir;

use super::markers::{MARKERS_FILE, Marker, MarkerKind, MarkerSet, Severity};
use super::{STATE_DIR, Workspace};
use crate::error::{Result, RsBuildError};
use crate::path_utils::project_relative;

/// A project directory on disk
#[derive(Debug)]
pub struct ProjectWorkspace {
    /// Canonical root directory of the project
    root: PathBuf,

    /// Project name used as console prefix
    name: String,

    markers: MarkerSet,

    /// Project-relative files surfaced by refreshes during this session
    refreshed: Vec<PathBuf>,
}

impl ProjectWorkspace {
    /// Open the project at `root`, loading markers from the previous build
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(RsBuildError::ProjectNotFound {
                path: root.display().to_string(),
            });
        }

        let root = dunce::canonicalize(root)?;
        let name = root
            .file_name()
            .map_or_else(|| "project".to_string(), |n| n.to_string_lossy().into_owned());
        let markers = MarkerSet::load(&Self::markers_path(&root))?;

        Ok(Self {
            root,
            name,
            markers,
            refreshed: Vec::new(),
        })
    }

    fn markers_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(MARKERS_FILE)
    }

    /// Persist the current markers
    pub fn save(&self) -> Result<()> {
        self.markers.save(&Self::markers_path(&self.root))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Remove project-level markers of `kind`, done at the start of a build
    pub fn remove_project_markers(&mut self, kind: MarkerKind) {
        self.markers.remove_project(kind);
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }

    /// Files surfaced by refreshes during this session
    pub fn refreshed(&self) -> &[PathBuf] {
        &self.refreshed
    }
}

impl Workspace for ProjectWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn mark_file(
        &mut self,
        file: &Path,
        kind: MarkerKind,
        message: &str,
        line: u32,
        severity: Severity,
    ) {
        self.markers.add(Marker {
            kind,
            severity,
            message: message.to_string(),
            file: Some(file.to_path_buf()),
            line: Some(line),
        });
    }

    fn mark_project(&mut self, kind: MarkerKind, message: &str, severity: Severity) {
        self.markers.add(Marker {
            kind,
            severity,
            message: message.to_string(),
            file: None,
            line: None,
        });
    }

    fn remove_markers(&mut self, file: &Path, kind: MarkerKind) {
        self.markers.remove_for_file(file, kind);
    }

    fn refresh(&mut self, directory: &Path, depth: usize) {
        if !directory.is_dir() {
            tracing::debug!(dir = %directory.display(), "refresh of missing directory skipped");
            return;
        }

        let mut found = 0usize;
        for entry in WalkDir::new(directory)
            .max_depth(depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            if let Some(relative) = project_relative(&self.root, entry.path()) {
                if !self.refreshed.contains(&relative) {
                    self.refreshed.push(relative);
                    found += 1;
                }
            }
        }

        tracing::debug!(dir = %directory.display(), found, "refreshed output directory");
    }

    fn print(&mut self, lines: &[String]) {
        for line in lines {
            println!("[{}] {}", self.name, line);
        }
    }

    fn print_error(&mut self, lines: &[String]) {
        for line in lines {
            eprintln!("{}", style(format!("[{}] {}", self.name, line)).red());
        }
    }
}
