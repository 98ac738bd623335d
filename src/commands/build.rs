//! Build command implementation
//!
//! Plans the pass from the recorded state, removes the bundles of deleted
//! sources, compiles what is out of date, and records the result so the
//! next pass only retries failures and changes.

use std::path::PathBuf;

use console::Style;

use crate::cli::BuildArgs;
use crate::coordinator::CompileOutcome;
use crate::domain::SourceUnit;
use crate::error::{Result, RsBuildError, fs as fs_error};
use crate::planner::{self, BuildPlan};
use crate::workspace::{MarkerKind, Severity, Workspace};

use super::helpers::{ProjectOptions, Session};

/// Run build command
pub fn run(options: &ProjectOptions, args: BuildArgs) -> Result<()> {
    let mut session = Session::open(options)?;
    let root = session.root().to_path_buf();

    // project markers only describe the previous pass
    session
        .coordinator
        .workspace_mut()
        .remove_project_markers(MarkerKind::Build);

    let plan = if args.sources.is_empty() {
        let discovered = planner::discover_sources(&root, &session.config)?;
        planner::plan(
            &root,
            &discovered,
            &session.state,
            session.coordinator.bundles(),
            args.force,
        )?
    } else {
        BuildPlan {
            to_compile: explicit_sources(session.coordinator.workspace(), &args.sources)?,
            to_remove: Vec::new(),
        }
    };

    for source in &plan.to_remove {
        session.coordinator.remove_bundle(source)?;
        session.state.forget(source);
        tracing::info!(source = %source.display(), "removed bundle of deleted source");
    }

    let outcome = session.coordinator.compile(&plan.to_compile);
    tracing::info!(
        files = session.coordinator.workspace().refreshed().len(),
        "output files surfaced"
    );

    for source in &outcome.succeeded {
        if let Some(bundle) = session.coordinator.bundles().get(&source.relative) {
            session.state.record_success(&root, bundle)?;
        }
    }
    for source in &outcome.failed {
        session.state.mark_pending(&source.relative);
    }

    session.save()?;

    if !session.quiet() {
        print_summary(&session, &plan, &outcome);
    }
    for error in &outcome.errors {
        eprintln!("{} {}", Style::new().bold().yellow().apply_to("warning:"), error);
    }

    if outcome.failed.is_empty() {
        Ok(())
    } else {
        Err(RsBuildError::BuildFailed {
            count: outcome.failed.len(),
        })
    }
}

/// Sources named on the command line, project-relative or absolute
fn explicit_sources<W: Workspace>(workspace: &W, paths: &[PathBuf]) -> Result<Vec<SourceUnit>> {
    let root = workspace.root();
    let mut sources = Vec::new();

    for path in paths {
        let absolute = if path.is_absolute() {
            path.clone()
        } else {
            root.join(path)
        };
        if !absolute.is_file() {
            return Err(fs_error::not_found(path.display().to_string()));
        }

        let absolute = dunce::canonicalize(&absolute)?;
        let relative = workspace.resolve(&absolute).ok_or_else(|| {
            RsBuildError::SourceOutsideProject {
                path: path.display().to_string(),
            }
        })?;
        let unit = SourceUnit::new(root, relative);
        if !sources.contains(&unit) {
            sources.push(unit);
        }
    }

    Ok(sources)
}

fn print_summary(session: &Session, plan: &BuildPlan, outcome: &CompileOutcome) {
    if plan.is_empty() {
        println!("Nothing to compile, all sources are up to date.");
        return;
    }

    if !plan.to_remove.is_empty() {
        println!(
            "Removed outputs of {} deleted source(s)",
            plan.to_remove.len()
        );
    }
    if !plan.to_compile.is_empty() {
        println!(
            "Compiled {} source(s): {} succeeded, {} failed",
            plan.to_compile.len(),
            Style::new().green().apply_to(outcome.succeeded.len()),
            Style::new().red().apply_to(outcome.failed.len())
        );
    }

    for marker in session.coordinator.workspace().markers().iter() {
        let style = match marker.severity {
            Severity::Error => Style::new().red(),
            Severity::Warning => Style::new().yellow(),
            Severity::Info => Style::new().dim(),
        };
        println!("  {}", style.apply_to(marker));
    }
}
