//! Command helper utilities

use std::path::{Path, PathBuf};

use crate::config::{ProjectConfig, Verbosity};
use crate::coordinator::{Coordinator, CoordinatorSettings};
use crate::error::{Result, RsBuildError};
use crate::state::BuildState;
use crate::tool::ProcessTool;
use crate::workspace::{ProjectWorkspace, Workspace};

/// Global options every project command receives
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub project: Option<PathBuf>,
    pub compiler: Option<PathBuf>,
    pub verbose: bool,
}

/// Resolve project path from optional argument
///
/// If a project path is provided, use it. Otherwise,
/// resolve to the current directory.
pub fn resolve_project_path(project: Option<PathBuf>) -> Result<PathBuf> {
    match project {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| RsBuildError::IoError {
            message: format!("Failed to get current directory: {}", e),
        }),
    }
}

/// An opened project: configuration, build state and a coordinator whose
/// bundles were reloaded from the dependency files on disk
pub struct Session {
    pub config: ProjectConfig,
    pub state: BuildState,
    pub coordinator: Coordinator<ProjectWorkspace, ProcessTool>,
}

impl Session {
    pub fn open(options: &ProjectOptions) -> Result<Self> {
        let path = resolve_project_path(options.project.clone())?;
        let workspace = ProjectWorkspace::open(&path)?;
        let root = workspace.root().to_path_buf();

        let mut config = ProjectConfig::load(&root)?;
        if let Some(compiler) = &options.compiler {
            config.compiler = compiler.clone();
        }
        if options.verbose {
            config.verbosity = Verbosity::Verbose;
        }

        let settings = CoordinatorSettings::from_config(&config, &root)?;
        let mut state = BuildState::load(&root)?;

        let mut coordinator = Coordinator::new(workspace, ProcessTool, settings);
        for source in coordinator.reload(state.known_sources()) {
            state.mark_pending(&source);
        }

        Ok(Self {
            config,
            state,
            coordinator,
        })
    }

    pub fn root(&self) -> &Path {
        self.coordinator.workspace().root()
    }

    pub fn quiet(&self) -> bool {
        self.config.verbosity == Verbosity::Quiet
    }

    /// Persist build state and markers
    pub fn save(&self) -> Result<()> {
        self.state.save(self.root())?;
        self.coordinator.workspace().save()
    }
}
