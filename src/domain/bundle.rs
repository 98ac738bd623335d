//! Bundle domain types
//!
//! A bundle records what one source produced and what it read the last
//! time it compiled successfully.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::depfile::DependencyRecord;

/// Outputs and dependencies of one successfully compiled source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bundle {
    /// Project-relative source path
    pub source: PathBuf,

    /// Generated files, in compiler order
    pub outputs: Vec<PathBuf>,

    /// Files read while compiling, in compiler order (the source included)
    pub dependencies: Vec<PathBuf>,
}

impl Bundle {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            outputs: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Replace outputs and dependencies with a freshly parsed record
    pub fn update(&mut self, record: DependencyRecord) {
        self.outputs = record.outputs;
        self.dependencies = record.dependencies;
    }
}

/// In-memory bundles of one build session, keyed by project-relative source
#[derive(Debug, Clone, Default)]
pub struct BundleStore {
    bundles: BTreeMap<PathBuf, Bundle>,
}

impl BundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &Path) -> Option<&Bundle> {
        self.bundles.get(source)
    }

    /// Bundle for `source`, created empty if missing
    pub fn get_or_insert(&mut self, source: &Path) -> &mut Bundle {
        self.bundles
            .entry(source.to_path_buf())
            .or_insert_with(|| Bundle::new(source))
    }

    pub fn remove(&mut self, source: &Path) -> Option<Bundle> {
        self.bundles.remove(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bundle> {
        self.bundles.values()
    }

    pub fn sources(&self) -> Vec<PathBuf> {
        self.bundles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
