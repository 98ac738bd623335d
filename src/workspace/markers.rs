//! Problem markers attached to project files or to the project itself

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, fs as fs_error, state};

/// Markers filename inside the state directory
pub const MARKERS_FILE: &str = "markers.json";

/// Who produced a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Diagnostics reported by the compiler
    Compile,
    /// Problems found by rsbuild itself (invocation, unparsed output, depfiles)
    Build,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub severity: Severity,
    pub message: String,

    /// Project-relative file, `None` for project-level markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match (&self.file, self.line) {
            (Some(file), Some(line)) => {
                write!(f, "{}:{}: {}: {}", file.display(), line, severity, self.message)
            }
            (Some(file), None) => write!(f, "{}: {}: {}", file.display(), severity, self.message),
            (None, _) => write!(f, "{}: {}", severity, self.message),
        }
    }
}

/// Ordered collection of markers, persisted as JSON between builds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load markers from `path`; a missing file is an empty set
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| fs_error::read_failed(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&content)
            .map_err(|e| state::parse_failed(path.display().to_string(), e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))
    }

    /// Add a marker unless an identical one is already present
    pub fn add(&mut self, marker: Marker) {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
    }

    /// Remove markers of `kind` attached to `file`
    pub fn remove_for_file(&mut self, file: &Path, kind: MarkerKind) {
        self.markers
            .retain(|m| !(m.kind == kind && m.file.as_deref() == Some(file)));
    }

    /// Remove project-level markers of `kind`
    pub fn remove_project(&mut self, kind: MarkerKind) {
        self.markers
            .retain(|m| !(m.kind == kind && m.file.is_none()));
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
