use clap::Parser;

/// Arguments for status command
#[derive(Parser, Debug, Default)]
pub struct StatusArgs {
    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}
