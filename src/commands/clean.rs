//! Clean command implementation
//!
//! Removes every output and dependency file the compiler produced for the
//! project's sources, then resets markers and build state.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::planner;

use super::helpers::{ProjectOptions, Session};

/// Run clean command
pub fn run(options: &ProjectOptions) -> Result<()> {
    let mut session = Session::open(options)?;
    let root = session.root().to_path_buf();

    let mut sources: BTreeSet<_> = session.state.known_sources();
    sources.extend(session.coordinator.bundles().sources());
    for unit in planner::discover_sources(&root, &session.config)? {
        sources.insert(unit.relative);
    }

    for source in &sources {
        session.coordinator.remove_bundle(source)?;
    }

    session.state.clear();
    session.coordinator.workspace_mut().clear_markers();
    session.save()?;

    tracing::info!(sources = sources.len(), "cleaned project");
    if !session.quiet() {
        println!("Removed outputs of {} source(s)", sources.len());
    }
    Ok(())
}
