//! Decides which sources a build pass compiles and which bundles it removes

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ProjectConfig;
use crate::domain::{BundleStore, SourceUnit};
use crate::error::Result;
use crate::hash;
use crate::state::BuildState;

/// Work for one build pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    /// Sources to compile, in path order
    pub to_compile: Vec<SourceUnit>,

    /// Previously known sources that no longer exist
    pub to_remove: Vec<PathBuf>,
}

impl BuildPlan {
    pub fn is_empty(&self) -> bool {
        self.to_compile.is_empty() && self.to_remove.is_empty()
    }
}

/// Find every source with the configured extension under the source
/// directories, sorted by path. Missing source directories are skipped.
pub fn discover_sources(root: &Path, config: &ProjectConfig) -> Result<Vec<SourceUnit>> {
    let extension = config.source_extension();
    let mut sources = Vec::new();

    for dir in config.source_paths(root) {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "source directory missing");
            continue;
        }

        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.to_string_lossy() == extension);
            if !matches {
                continue;
            }
            if let Some(unit) = SourceUnit::from_absolute(root, entry.path()) {
                if !sources.contains(&unit) {
                    sources.push(unit);
                }
            }
        }
    }

    sources.sort();
    Ok(sources)
}

/// Compare discovered sources with the previous session.
///
/// With `force`, every discovered source is compiled.
pub fn plan(
    root: &Path,
    discovered: &[SourceUnit],
    state: &BuildState,
    bundles: &BundleStore,
    force: bool,
) -> Result<BuildPlan> {
    let mut plan = BuildPlan::default();

    for source in discovered {
        if force || needs_compile(root, source, state, bundles)? {
            plan.to_compile.push(source.clone());
        }
    }

    for known in state.known_sources().into_iter().chain(bundles.sources()) {
        let still_there = discovered.iter().any(|s| s.relative == known);
        if !still_there && !plan.to_remove.contains(&known) {
            plan.to_remove.push(known);
        }
    }

    Ok(plan)
}

fn needs_compile(
    root: &Path,
    source: &SourceUnit,
    state: &BuildState,
    bundles: &BundleStore,
) -> Result<bool> {
    if state.is_pending(&source.relative) {
        tracing::debug!(source = %source.relative.display(), "pending from a failed pass");
        return Ok(true);
    }

    let (Some(record), Some(bundle)) = (state.record(&source.relative), bundles.get(&source.relative))
    else {
        return Ok(true);
    };

    if hash::hash_file(&source.path)? != record.hash {
        tracing::debug!(source = %source.relative.display(), "source changed");
        return Ok(true);
    }

    for (dependency, recorded) in &record.dependencies {
        match hash::hash_if_exists(&root.join(dependency))? {
            Some(current) if &current == recorded => {}
            _ => {
                tracing::debug!(
                    source = %source.relative.display(),
                    dependency = %dependency.display(),
                    "dependency changed"
                );
                return Ok(true);
            }
        }
    }

    if let Some(missing) = bundle.outputs.iter().find(|o| !root.join(o).exists()) {
        tracing::debug!(
            source = %source.relative.display(),
            output = %missing.display(),
            "output missing"
        );
        return Ok(true);
    }

    Ok(false)
}
