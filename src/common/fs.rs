//! Common file system operations with unified error handling

use std::fs;
use std::path::Path;

use crate::error::{Result, fs as fs_error};

/// Remove a file, treating an already missing file as success.
///
/// Returns whether a file was actually removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(fs_error::remove_failed(
            path.display().to_string(),
            e.to_string(),
        )),
    }
}

/// Create each directory (and its parents) if missing
pub fn ensure_dirs<'a, I>(dirs: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Path>,
{
    for dir in dirs {
        fs::create_dir_all(dir)
            .map_err(|e| fs_error::write_failed(dir.display().to_string(), e.to_string()))?;
    }
    Ok(())
}
