//! Makefile-style dependency files written by the compiler (`-MD`)
//!
//! Format: `out1 out2 ... : dep1 dep2 ...`, usually continued over several
//! physical lines with a trailing `\`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, depfile, fs as fs_error};
use crate::path_utils::with_extension_file_name;

/// Extension of dependency files
pub const DEPENDENCY_EXTENSION: &str = "d";

/// Outputs and dependencies of one source, project-relative and in the
/// order the compiler wrote them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyRecord {
    pub outputs: Vec<PathBuf>,
    pub dependencies: Vec<PathBuf>,
}

/// Dependency file location for `source` inside `dep_dir`
pub fn dependency_file_for(dep_dir: &Path, source: &Path) -> Option<PathBuf> {
    with_extension_file_name(source, DEPENDENCY_EXTENSION).map(|name| dep_dir.join(name))
}

/// Parse dependency file text, mapping each path to a project file with
/// `resolve`.
///
/// Paths `resolve` rejects (system headers) are dropped. Duplicates are kept.
/// Returns the reason when the rule is malformed: no `:` at all, or nothing
/// after it. A truncated file must not read as "no dependencies".
pub fn parse<F>(raw: &str, resolve: F) -> std::result::Result<DependencyRecord, String>
where
    F: Fn(&Path) -> Option<PathBuf>,
{
    let mut joined = String::new();
    for line in raw.lines() {
        let line = line.trim();
        let line = line.strip_suffix('\\').unwrap_or(line);
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(line);
    }

    let Some((left, right)) = joined.split_once(':') else {
        return Err("missing ':' between outputs and dependencies".to_string());
    };
    if right.trim().is_empty() {
        return Err("no dependencies after ':'".to_string());
    }

    Ok(DependencyRecord {
        outputs: project_paths(left, &resolve),
        dependencies: project_paths(right, &resolve),
    })
}

fn project_paths<F>(tokens: &str, resolve: &F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> Option<PathBuf>,
{
    tokens
        .split_whitespace()
        .filter_map(|token| resolve(Path::new(token)))
        .collect()
}

/// Read and parse the dependency file at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read<F>(path: &Path, resolve: F) -> Result<Option<DependencyRecord>>
where
    F: Fn(&Path) -> Option<PathBuf>,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(fs_error::read_failed(
                path.display().to_string(),
                e.to_string(),
            ));
        }
    };

    parse(&content, resolve)
        .map(Some)
        .map_err(|reason| depfile::corrupt(path.display().to_string(), reason))
}
