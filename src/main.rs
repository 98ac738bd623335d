//! rsbuild - incremental RenderScript builder
//!
//! Command line entry point: parses arguments, sets up logging and runs the
//! selected command.

use clap::Parser;

use rsbuild::cli::{Cli, Commands};
use rsbuild::commands;
use rsbuild::commands::helpers::ProjectOptions;

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = ProjectOptions {
        project: cli.project,
        compiler: cli.compiler,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Build(args) => commands::build::run(&options, args),
        Commands::Clean => commands::clean::run(&options),
        Commands::Status(args) => commands::status::run(&options, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
