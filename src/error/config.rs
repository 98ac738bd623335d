//! Configuration errors

use super::RsBuildError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> RsBuildError {
    RsBuildError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> RsBuildError {
    RsBuildError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> RsBuildError {
    RsBuildError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
