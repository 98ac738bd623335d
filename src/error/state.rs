//! Build state errors

use super::RsBuildError;

/// Creates a state parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> RsBuildError {
    RsBuildError::StateParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
