//! External compiler capability
//!
//! The coordinator builds a [`ToolCommand`] per source from a
//! [`CompileTemplate`] and hands it to an [`ExternalTool`]. The binary uses
//! [`ProcessTool`]; tests substitute scripted tools.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

pub mod process;

pub use process::ProcessTool;

use crate::error::Result;

/// A fully built compiler invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// File name of the program, as shown in invocation errors
    pub fn program_name(&self) -> String {
        self.program.file_name().map_or_else(
            || self.program.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }

    /// The command line as echoed in verbose mode
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// What a finished compiler run left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Captured output, one entry per line: stderr first, then stdout
    pub lines: Vec<String>,

    /// Exit code; `-1` when the process was killed by a signal
    pub exit_code: i32,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Something that can run a compiler command to completion
pub trait ExternalTool {
    /// Run `command` and wait for it to exit.
    ///
    /// Returns [`crate::error::RsBuildError::ToolInvocationFailed`] when the
    /// process could not be started or waited on. A nonzero exit is not an
    /// error here.
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// The fixed-shape part of every compiler invocation; only the source
/// changes between files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileTemplate {
    pub compiler: PathBuf,
    pub include_dirs: [PathBuf; 2],
    pub gen_dir: PathBuf,
    pub res_dir: PathBuf,
    pub dep_dir: PathBuf,
}

impl CompileTemplate {
    /// `compiler -I inc1 -I inc2 -p gen -o res -d dep -MD source`
    pub fn command_for(&self, source: &Path) -> ToolCommand {
        ToolCommand::new(&self.compiler)
            .arg("-I")
            .arg(&self.include_dirs[0])
            .arg("-I")
            .arg(&self.include_dirs[1])
            .arg("-p")
            .arg(&self.gen_dir)
            .arg("-o")
            .arg(&self.res_dir)
            .arg("-d")
            .arg(&self.dep_dir)
            .arg("-MD")
            .arg(source)
    }
}
