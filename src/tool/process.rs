//! Runs the compiler as a child process

use std::process::{Command, Stdio};

use super::{ExternalTool, ToolCommand, ToolOutput};
use crate::error::{Result, tool};

/// [`ExternalTool`] backed by `std::process::Command`.
///
/// There is no timeout: a compiler that never exits blocks the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTool;

impl ExternalTool for ProcessTool {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        tracing::debug!(command = %command.display_line(), "spawning compiler");

        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                tool::invocation_failed(
                    command.program_name(),
                    command.program().display().to_string(),
                    e.to_string(),
                )
            })?;

        let mut lines: Vec<String> = String::from_utf8_lossy(&output.stderr)
            .lines()
            .map(str::to_string)
            .collect();
        lines.extend(
            String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(str::to_string),
        );

        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(exit_code, lines = lines.len(), "compiler exited");

        Ok(ToolOutput { lines, exit_code })
    }
}
