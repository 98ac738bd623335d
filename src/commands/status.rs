//! Status command implementation
//!
//! Shows the bundle of every compiled source, the sources a build would
//! compile next, and the markers left by the last build.

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::cli::StatusArgs;
use crate::domain::Bundle;
use crate::error::Result;
use crate::path_utils::to_forward_slashes;
use crate::planner;
use crate::workspace::{Marker, Workspace};

use super::helpers::{ProjectOptions, Session};

/// Everything `status` reports, also its JSON shape
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    project: String,
    root: PathBuf,
    bundles: Vec<&'a Bundle>,
    pending: Vec<PathBuf>,
    out_of_date: Vec<PathBuf>,
    removed: Vec<PathBuf>,
    markers: Vec<&'a Marker>,
}

/// Run status command
pub fn run(options: &ProjectOptions, args: StatusArgs) -> Result<()> {
    let session = Session::open(options)?;
    let root = session.root().to_path_buf();

    let discovered = planner::discover_sources(&root, &session.config)?;
    let plan = planner::plan(
        &root,
        &discovered,
        &session.state,
        session.coordinator.bundles(),
        false,
    )?;

    let workspace = session.coordinator.workspace();
    let report = StatusReport {
        project: workspace.name().to_string(),
        root: workspace.root().to_path_buf(),
        bundles: session.coordinator.bundles().iter().collect(),
        pending: session.state.pending.iter().cloned().collect(),
        out_of_date: plan.to_compile.iter().map(|s| s.relative.clone()).collect(),
        removed: plan.to_remove.clone(),
        markers: workspace.markers().iter().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &StatusReport<'_>) {
    let bold = Style::new().bold();

    println!(
        "{} {}",
        bold.apply_to("Project:"),
        Style::new().bold().yellow().apply_to(&report.project)
    );
    println!("  {}", report.root.display());
    println!();

    if report.bundles.is_empty() {
        println!("No compiled sources.");
    } else {
        println!("{} ({}):", bold.apply_to("Bundles"), report.bundles.len());
        for bundle in &report.bundles {
            println!("  {}", Style::new().cyan().apply_to(to_forward_slashes(&bundle.source)));
            for output in &bundle.outputs {
                println!("    output:     {}", to_forward_slashes(output));
            }
            for dependency in &bundle.dependencies {
                println!("    depends on: {}", to_forward_slashes(dependency));
            }
        }
    }

    print_list("Pending", &report.pending);
    print_list("Out of date", &report.out_of_date);
    print_list("Deleted", &report.removed);

    if !report.markers.is_empty() {
        println!();
        println!("{} ({}):", bold.apply_to("Markers"), report.markers.len());
        for marker in &report.markers {
            println!("  {}", Style::new().red().apply_to(marker));
        }
    }
}

fn print_list(title: &str, paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!();
    println!("{} ({}):", Style::new().bold().apply_to(title), paths.len());
    for path in paths {
        println!("  {}", to_forward_slashes(path));
    }
}
