//! Dependency file errors

use super::RsBuildError;

/// Creates a corrupt dependency file error
pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> RsBuildError {
    RsBuildError::DependencyFileCorrupt {
        path: path.into(),
        reason: reason.into(),
    }
}
