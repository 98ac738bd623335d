//! Cross-platform path utilities for rsbuild
//!
//! Compiler output and dependency files name files by absolute OS paths.
//! Everything rsbuild tracks is keyed by project-relative paths instead, so
//! these helpers do the conversion in one place.

use std::path::{Component, Path, PathBuf};

/// Convert a path reported by the compiler into a project-relative path.
///
/// Absolute paths must lie under `root`; the root prefix and the leading
/// separator are stripped. Relative paths are taken to be relative to the
/// project root already. Returns `None` for anything that resolves outside
/// the project (system headers, `..` escapes) or to the root itself.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use rsbuild::path_utils::project_relative;
///
/// let root = Path::new("/proj");
/// assert_eq!(
///     project_relative(root, "/proj/src/a.rs"),
///     Some(PathBuf::from("src/a.rs"))
/// );
/// assert_eq!(project_relative(root, "/usr/include/rs_core.rsh"), None);
/// assert_eq!(project_relative(root, "/proj2/src/a.rs"), None);
/// ```
pub fn project_relative(root: &Path, reported: impl AsRef<Path>) -> Option<PathBuf> {
    let reported = reported.as_ref();

    let relative = if reported.is_absolute() || reported.has_root() {
        reported.strip_prefix(root).ok()?.to_path_buf()
    } else {
        reported.to_path_buf()
    };

    let mut normalized = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if normalized.as_os_str().is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Convert a path to a string with forward slashes, for stable display and
/// persisted state across platforms.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use rsbuild::path_utils::to_forward_slashes;
///
/// assert_eq!(to_forward_slashes(Path::new("src/a.rs")), "src/a.rs");
/// ```
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Replace the extension of `path` with `extension`, keeping only the
/// file name component.
///
/// `bin` directories hold one dependency file per source, so only the file
/// name matters: `src/fx/blur.rs` becomes `blur.d`.
pub fn with_extension_file_name(path: &Path, extension: &str) -> Option<PathBuf> {
    let stem = path.file_stem()?;
    let mut name = PathBuf::from(stem);
    name.set_extension(extension);
    Some(name)
}
