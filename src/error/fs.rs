//! File system errors

use super::RsBuildError;

/// Creates a file not found error
pub fn not_found(path: impl Into<String>) -> RsBuildError {
    RsBuildError::FileNotFound { path: path.into() }
}

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> RsBuildError {
    RsBuildError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> RsBuildError {
    RsBuildError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file remove failed error
pub fn remove_failed(path: impl Into<String>, reason: impl Into<String>) -> RsBuildError {
    RsBuildError::FileRemoveFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
