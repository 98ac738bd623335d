//! Compiler output parsing
//!
//! The compiler reports problems one per line as
//! `<path>:<line>:<col>: <message>`. Lines are mapped back to project files;
//! anything that cannot be attributed makes the batch "not fully parsed",
//! which tells the caller to show the raw output instead.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// `<path>:<line>:<col>: <message>`, with the shortest path that fits.
///
/// The line field accepts any word so that a malformed line number is seen
/// as a broken diagnostic rather than as an unrelated line.
#[allow(clippy::unwrap_used)]
static DIAGNOSTIC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?):(\w+):(\d+):\s(.+)$").unwrap());

/// One problem reported by the compiler, attributed to a project file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Project-relative path of the offending file
    pub file: PathBuf,
    pub line: u32,
    pub message: String,
}

/// Result of parsing one compiler run's output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOutput {
    pub diagnostics: Vec<Diagnostic>,

    /// `false` when some line could not be attributed to a project file
    pub fully_parsed: bool,
}

impl ParsedOutput {
    fn unparseable() -> Self {
        Self {
            diagnostics: Vec::new(),
            fully_parsed: false,
        }
    }
}

/// Parse compiler output lines, mapping reported paths to project files
/// with `resolve`.
///
/// - Lines outside the grammar, or naming files `resolve` rejects, are
///   skipped and clear `fully_parsed`.
/// - A diagnostic whose line number is not an unsigned integer aborts the
///   whole parse: nothing is returned and `fully_parsed` is `false`.
pub fn parse<S, F>(lines: &[S], resolve: F) -> ParsedOutput
where
    S: AsRef<str>,
    F: Fn(&Path) -> Option<PathBuf>,
{
    let mut parsed = ParsedOutput {
        diagnostics: Vec::new(),
        fully_parsed: true,
    };

    for raw in lines {
        let raw = raw.as_ref();
        let Some(captures) = DIAGNOSTIC_LINE.captures(raw) else {
            parsed.fully_parsed = false;
            continue;
        };

        let Some(file) = resolve(Path::new(&captures[1])) else {
            tracing::debug!(line = raw, "diagnostic outside the project");
            parsed.fully_parsed = false;
            continue;
        };

        // group 3 is the column, unused
        let Ok(line) = captures[2].parse::<u32>() else {
            tracing::debug!(line = raw, "malformed line number, discarding output");
            return ParsedOutput::unparseable();
        };

        parsed.diagnostics.push(Diagnostic {
            file,
            line,
            message: captures[4].to_string(),
        });
    }

    parsed
}
