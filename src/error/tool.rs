//! External compiler errors

use super::RsBuildError;

/// Creates a tool invocation error
///
/// `name` is the compiler's file name, `command` the full path that was run.
pub fn invocation_failed(
    name: impl Into<String>,
    command: impl Into<String>,
    reason: impl Into<String>,
) -> RsBuildError {
    RsBuildError::ToolInvocationFailed {
        name: name.into(),
        command: command.into(),
        reason: reason.into(),
    }
}
