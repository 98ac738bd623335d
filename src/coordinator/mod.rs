//! Incremental compile coordinator
//!
//! Runs the compiler once per source, turns its output into markers, and
//! keeps the bundle (outputs + dependencies) of every successfully compiled
//! source from the dependency files the compiler writes.
//!
//! Everything is synchronous: sources compile one at a time in the order
//! given, and each compile waits for the compiler to exit.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::common::fs::{ensure_dirs, remove_file_if_exists};
use crate::config::{ProjectConfig, Verbosity};
use crate::depfile;
use crate::diagnostics;
use crate::domain::{BundleStore, SourceUnit};
use crate::error::{Result, RsBuildError, config as config_error};
use crate::tool::{CompileTemplate, ExternalTool, ToolCommand};
use crate::workspace::{MarkerKind, Severity, Workspace};

#[cfg(test)]
mod tests;

/// Project marker shown when the compiler failed without output we can
/// attribute to files
pub const UNPARSED_ERROR_MESSAGE: &str = "Unparsed compiler error! Check the console for output.";

/// Absolute directories and flags the coordinator works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorSettings {
    pub template: CompileTemplate,

    /// Source folders, used to name sources in verbose output
    pub source_dirs: Vec<PathBuf>,

    pub verbose: bool,
}

impl CoordinatorSettings {
    /// Resolve the project configuration against `root`
    pub fn from_config(config: &ProjectConfig, root: &Path) -> Result<Self> {
        let [first, second] = <[PathBuf; 2]>::try_from(config.include_paths(root))
            .map_err(|dirs| {
                config_error::invalid(format!(
                    "include_dirs must list exactly two directories, found {}",
                    dirs.len()
                ))
            })?;

        Ok(Self {
            template: CompileTemplate {
                compiler: config.compiler_path(root),
                include_dirs: [first, second],
                gen_dir: config.gen_path(root),
                res_dir: config.res_path(root),
                dep_dir: config.dep_path(root),
            },
            source_dirs: config.source_paths(root),
            verbose: config.verbosity == Verbosity::Verbose,
        })
    }
}

/// Result of one [`Coordinator::compile`] batch
#[derive(Debug, Default)]
pub struct CompileOutcome {
    /// Compiled, with a refreshed bundle
    pub succeeded: Vec<SourceUnit>,

    /// Need recompilation on the next pass
    pub failed: Vec<SourceUnit>,

    /// Hard errors behind some of the failures (corrupt dependency files,
    /// unusable output directories)
    pub errors: Vec<RsBuildError>,
}

pub struct Coordinator<W, T> {
    workspace: W,
    tool: T,
    settings: CoordinatorSettings,
    bundles: BundleStore,

    /// Files each source put compile markers on during its last run
    marked: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
}

impl<W: Workspace, T: ExternalTool> Coordinator<W, T> {
    /// Coordinator with no known bundles; call [`Coordinator::reload`] to
    /// pick up a previous session
    pub fn new(workspace: W, tool: T, settings: CoordinatorSettings) -> Self {
        Self {
            workspace,
            tool,
            settings,
            bundles: BundleStore::new(),
            marked: BTreeMap::new(),
        }
    }

    pub fn bundles(&self) -> &BundleStore {
        &self.bundles
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut W {
        &mut self.workspace
    }

    /// Where the compiler writes the dependency file of `source`
    pub fn dependency_file_for(&self, source: &Path) -> Option<PathBuf> {
        depfile::dependency_file_for(&self.settings.template.dep_dir, source)
    }

    /// Rebuild bundles for `known` sources from their dependency files.
    ///
    /// Sources without a dependency file get no bundle. Sources whose
    /// dependency file is corrupt get none either and are returned, so the
    /// caller can schedule them for recompilation.
    pub fn reload<I>(&mut self, known: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut corrupt = Vec::new();

        for source in known {
            let Some(dep_file) = self.dependency_file_for(&source) else {
                continue;
            };

            match depfile::read(&dep_file, |p| self.workspace.resolve(p)) {
                Ok(Some(record)) => self.bundles.get_or_insert(&source).update(record),
                Ok(None) => {
                    tracing::debug!(source = %source.display(), "no dependency file, bundle dropped");
                    self.bundles.remove(&source);
                }
                Err(e) => {
                    tracing::warn!(source = %source.display(), error = %e, "bundle dropped");
                    self.bundles.remove(&source);
                    corrupt.push(source);
                }
            }
        }

        tracing::info!(bundles = self.bundles.len(), "reloaded bundles");
        corrupt
    }

    /// Compile `sources` in order.
    ///
    /// Every source ends up in exactly one of the outcome's sets. The
    /// resource directory is refreshed once if anything succeeded.
    pub fn compile(&mut self, sources: &[SourceUnit]) -> CompileOutcome {
        let mut outcome = CompileOutcome::default();
        if sources.is_empty() {
            return outcome;
        }

        if let Err(e) = self.prepare_output_dirs() {
            self.workspace
                .mark_project(MarkerKind::Build, &e.to_string(), Severity::Error);
            outcome.failed = sources.to_vec();
            outcome.errors.push(e);
            return outcome;
        }

        for source in sources {
            if self.settings.verbose {
                let line = format!("Compiling: {}", self.display_name(source));
                self.workspace.print(&[line]);
            }

            self.clear_markers(source);

            let command = self.settings.template.command_for(&source.path);
            if !self.exec(source, &command) {
                outcome.failed.push(source.clone());
                continue;
            }

            match self.refresh_bundle(source) {
                Ok(()) => outcome.succeeded.push(source.clone()),
                Err(e) => {
                    self.workspace.mark_file(
                        &source.relative,
                        MarkerKind::Build,
                        &e.to_string(),
                        1,
                        Severity::Error,
                    );
                    outcome.failed.push(source.clone());
                    outcome.errors.push(e);
                }
            }
        }

        if !outcome.succeeded.is_empty() {
            let res_dir = self.settings.template.res_dir.clone();
            self.workspace.refresh(&res_dir, 1);
        }

        tracing::info!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "compile batch finished"
        );
        outcome
    }

    /// Delete everything a source produced: its outputs, then its
    /// dependency file. Missing files are fine, so this can run twice.
    pub fn remove_bundle(&mut self, source: &Path) -> Result<()> {
        if let Some(bundle) = self.bundles.remove(source) {
            for output in &bundle.outputs {
                let location = self.workspace.location(output);
                if remove_file_if_exists(&location)? {
                    tracing::debug!(output = %output.display(), "removed output");
                }
            }
        }

        if let Some(dep_file) = self.dependency_file_for(source) {
            remove_file_if_exists(&dep_file)?;
        }

        self.workspace.remove_markers(source, MarkerKind::Compile);
        self.workspace.remove_markers(source, MarkerKind::Build);
        self.marked.remove(source);
        Ok(())
    }

    fn prepare_output_dirs(&self) -> Result<()> {
        let template = &self.settings.template;
        ensure_dirs([
            template.gen_dir.as_path(),
            template.res_dir.as_path(),
            template.dep_dir.as_path(),
        ])
    }

    /// Source path relative to the source folder holding it
    fn display_name(&self, source: &SourceUnit) -> String {
        self.settings
            .source_dirs
            .iter()
            .find_map(|dir| source.path.strip_prefix(dir).ok())
            .unwrap_or(source.relative.as_path())
            .display()
            .to_string()
    }

    /// Compiler markers of the source, of everything it last depended on,
    /// and of every file its last run marked
    fn clear_markers(&mut self, source: &SourceUnit) {
        self.workspace
            .remove_markers(&source.relative, MarkerKind::Compile);
        self.workspace
            .remove_markers(&source.relative, MarkerKind::Build);

        let mut files = self.marked.remove(&source.relative).unwrap_or_default();
        if let Some(bundle) = self.bundles.get(&source.relative) {
            files.extend(bundle.dependencies.iter().cloned());
        }
        for file in &files {
            self.workspace.remove_markers(file, MarkerKind::Compile);
        }
    }

    /// Run one compile; `true` when the compiler succeeded
    fn exec(&mut self, source: &SourceUnit, command: &ToolCommand) -> bool {
        let verbose = self.settings.verbose;
        if verbose {
            self.workspace.print(&[command.display_line()]);
        }

        let output = match self.tool.run(command) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "compiler could not be run");
                self.workspace
                    .mark_project(MarkerKind::Build, &e.to_string(), Severity::Error);
                return false;
            }
        };

        let parsed = diagnostics::parse(output.lines.as_slice(), |p| self.workspace.resolve(p));
        let marked = self.marked.entry(source.relative.clone()).or_default();
        for diagnostic in &parsed.diagnostics {
            marked.insert(diagnostic.file.clone());
            self.workspace.mark_file(
                &diagnostic.file,
                MarkerKind::Compile,
                &diagnostic.message,
                diagnostic.line,
                Severity::Error,
            );
        }

        if !output.success() {
            // a failure nothing was attributed to must still surface
            if !parsed.fully_parsed || parsed.diagnostics.is_empty() {
                self.workspace.print_error(&output.lines);
                self.workspace.mark_project(
                    MarkerKind::Build,
                    UNPARSED_ERROR_MESSAGE,
                    Severity::Error,
                );
            } else if verbose {
                self.workspace.print(&output.lines);
            }
            return false;
        }

        if verbose && !output.lines.is_empty() {
            self.workspace.print(&output.lines);
        }
        true
    }

    /// Re-read the dependency file of a freshly compiled source
    fn refresh_bundle(&mut self, source: &SourceUnit) -> Result<()> {
        let Some(dep_file) = self.dependency_file_for(&source.relative) else {
            self.bundles.get_or_insert(&source.relative);
            return Ok(());
        };

        match depfile::read(&dep_file, |p| self.workspace.resolve(p))? {
            Some(record) => self.bundles.get_or_insert(&source.relative).update(record),
            None => {
                tracing::warn!(
                    source = %source.relative.display(),
                    dep_file = %dep_file.display(),
                    "compiler wrote no dependency file"
                );
                self.bundles.get_or_insert(&source.relative);
            }
        }
        Ok(())
    }
}
