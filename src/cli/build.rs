use clap::Parser;
use std::path::PathBuf;

/// Arguments for build command
#[derive(Parser, Debug, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Compile what changed since the last build:\n    rsbuild build\n\n\
                  Compile every source:\n    rsbuild build --force\n\n\
                  Compile selected sources:\n    rsbuild build src/blur.rs src/fx/sharpen.rs")]
pub struct BuildArgs {
    /// Compile every source, ignoring recorded hashes
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Sources to compile (project-relative or absolute); all out-of-date
    /// sources when omitted
    pub sources: Vec<PathBuf>,
}
