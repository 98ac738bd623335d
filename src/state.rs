//! Persisted build state (.rsbuild/state.yaml)
//!
//! Remembers which sources were compiled, the content hashes they were
//! compiled from, and which sources failed and must be retried. The
//! dependency files themselves stay the source of truth for outputs and
//! dependencies; this file only decides what is out of date.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Bundle;
use crate::error::{Result, fs as fs_error, state};
use crate::hash;
use crate::workspace::STATE_DIR;

/// State filename inside the state directory
pub const STATE_FILE: &str = "state.yaml";

/// Hashes recorded at the last successful compile of one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub hash: String,

    /// Dependency path -> hash; dependencies missing at compile time are not
    /// listed
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<PathBuf, String>,
}

/// Build state of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildState {
    #[serde(default)]
    pub sources: BTreeMap<PathBuf, SourceRecord>,

    /// Sources whose last compile failed
    #[serde(default)]
    pub pending: BTreeSet<PathBuf>,
}

impl BuildState {
    pub fn path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(STATE_FILE)
    }

    /// Load the state of the project at `root`; a missing file is an empty
    /// state
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| fs_error::read_failed(path.display().to_string(), e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| state::parse_failed(path.display().to_string(), e.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(&path, yaml)
            .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))
    }

    /// Every source a previous session knew about, compiled or pending
    pub fn known_sources(&self) -> BTreeSet<PathBuf> {
        self.sources
            .keys()
            .chain(self.pending.iter())
            .cloned()
            .collect()
    }

    pub fn is_pending(&self, source: &Path) -> bool {
        self.pending.contains(source)
    }

    pub fn record(&self, source: &Path) -> Option<&SourceRecord> {
        self.sources.get(source)
    }

    /// Record a successful compile: hash the source and every dependency
    /// its bundle lists
    pub fn record_success(&mut self, root: &Path, bundle: &Bundle) -> Result<()> {
        let hash = hash::hash_file(&root.join(&bundle.source))?;

        let mut dependencies = BTreeMap::new();
        for dependency in &bundle.dependencies {
            if let Some(dep_hash) = hash::hash_if_exists(&root.join(dependency))? {
                dependencies.insert(dependency.clone(), dep_hash);
            }
        }

        self.pending.remove(&bundle.source);
        self.sources.insert(
            bundle.source.clone(),
            SourceRecord { hash, dependencies },
        );
        Ok(())
    }

    /// Mark a source for recompilation on the next pass
    pub fn mark_pending(&mut self, source: &Path) {
        self.pending.insert(source.to_path_buf());
    }

    /// Drop everything known about a source
    pub fn forget(&mut self, source: &Path) {
        self.sources.remove(source);
        self.pending.remove(source);
    }

    pub fn clear(&mut self) {
        self.sources.clear();
        self.pending.clear();
    }
}
