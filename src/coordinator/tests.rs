//! Coordinator tests with a scripted compiler and a recording workspace

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;
use crate::tool::ToolOutput;
use crate::workspace::{Marker, MarkerSet};

/// Workspace that keeps everything in memory
struct RecordingWorkspace {
    root: PathBuf,
    markers: MarkerSet,
    printed: Vec<String>,
    printed_errors: Vec<String>,
    refreshes: Vec<(PathBuf, usize)>,
}

impl RecordingWorkspace {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            markers: MarkerSet::new(),
            printed: Vec::new(),
            printed_errors: Vec::new(),
            refreshes: Vec::new(),
        }
    }

    fn file_markers(&self, file: &str) -> Vec<&Marker> {
        self.markers
            .iter()
            .filter(|m| m.file.as_deref() == Some(Path::new(file)))
            .collect()
    }

    fn project_markers(&self) -> Vec<&Marker> {
        self.markers.iter().filter(|m| m.file.is_none()).collect()
    }
}

impl Workspace for RecordingWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn mark_file(
        &mut self,
        file: &Path,
        kind: MarkerKind,
        message: &str,
        line: u32,
        severity: Severity,
    ) {
        self.markers.add(Marker {
            kind,
            severity,
            message: message.to_string(),
            file: Some(file.to_path_buf()),
            line: Some(line),
        });
    }

    fn mark_project(&mut self, kind: MarkerKind, message: &str, severity: Severity) {
        self.markers.add(Marker {
            kind,
            severity,
            message: message.to_string(),
            file: None,
            line: None,
        });
    }

    fn remove_markers(&mut self, file: &Path, kind: MarkerKind) {
        self.markers.remove_for_file(file, kind);
    }

    fn refresh(&mut self, directory: &Path, depth: usize) {
        self.refreshes.push((directory.to_path_buf(), depth));
    }

    fn print(&mut self, lines: &[String]) {
        self.printed.extend_from_slice(lines);
    }

    fn print_error(&mut self, lines: &[String]) {
        self.printed_errors.extend_from_slice(lines);
    }
}

/// What the fake compiler does for one source file name
#[derive(Clone, Default)]
struct Response {
    exit_code: i32,
    lines: Vec<String>,
    /// Written to `<dep_dir>/<stem>.d` when set
    depfile: Option<String>,
    spawn_error: bool,
}

impl Response {
    fn ok(depfile: &str) -> Self {
        Self {
            depfile: Some(depfile.to_string()),
            ..Self::default()
        }
    }

    fn failing(lines: &[&str]) -> Self {
        Self {
            exit_code: 1,
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
            ..Self::default()
        }
    }
}

/// Compiler stand-in answering per source file name
#[derive(Default)]
struct ScriptedTool {
    responses: HashMap<String, Response>,
    invocations: RefCell<Vec<ToolCommand>>,
}

impl ScriptedTool {
    fn with(mut self, file_name: &str, response: Response) -> Self {
        self.responses.insert(file_name.to_string(), response);
        self
    }
}

impl ExternalTool for ScriptedTool {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        self.invocations.borrow_mut().push(command.clone());

        let args = command.args();
        let source = PathBuf::from(args.last().unwrap());
        let dep_dir = args
            .iter()
            .position(|a| a == "-d")
            .map(|i| PathBuf::from(&args[i + 1]))
            .unwrap();

        let name = source.file_name().unwrap().to_string_lossy().into_owned();
        let response = self.responses.get(&name).cloned().unwrap_or_default();

        if response.spawn_error {
            return Err(crate::error::tool::invocation_failed(
                command.program_name(),
                command.program().display().to_string(),
                "No such file or directory",
            ));
        }

        if let Some(content) = &response.depfile {
            let stem = source.file_stem().unwrap().to_string_lossy().into_owned();
            std::fs::write(dep_dir.join(format!("{stem}.d")), content).unwrap();
        }

        Ok(ToolOutput {
            lines: response.lines,
            exit_code: response.exit_code,
        })
    }
}

struct Project {
    temp: TempDir,
}

impl Project {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        for name in ["a.rs", "b.rs", "inc.rsh"] {
            std::fs::write(temp.path().join("src").join(name), name).unwrap();
        }
        Self { temp }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Absolute path string inside the project
    fn abs(&self, relative: &str) -> String {
        self.root().join(relative).display().to_string()
    }

    fn source(&self, relative: &str) -> SourceUnit {
        SourceUnit::new(self.root(), relative)
    }

    fn settings(&self, verbose: bool) -> CoordinatorSettings {
        let config = ProjectConfig {
            compiler: PathBuf::from("/sdk/platform-tools/llvm-rs-cc"),
            verbosity: if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            },
            ..ProjectConfig::default()
        };
        CoordinatorSettings::from_config(&config, self.root()).unwrap()
    }

    fn coordinator(
        &self,
        tool: ScriptedTool,
        verbose: bool,
    ) -> Coordinator<RecordingWorkspace, ScriptedTool> {
        Coordinator::new(
            RecordingWorkspace::new(self.root()),
            tool,
            self.settings(verbose),
        )
    }

    /// Dependency file of `a.rs` naming two outputs, the source, an include
    /// and a system header
    fn depfile_a(&self) -> String {
        format!(
            "{} {}: \\\n  {} \\\n  {} /sdk/rs/include/rs_core.rsh\n",
            self.abs("res/raw/a.bc"),
            self.abs("gen/ScriptC_a.java"),
            self.abs("src/a.rs"),
            self.abs("src/inc.rsh"),
        )
    }
}

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

#[test]
fn test_successful_compile_creates_bundle() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::ok(&project.depfile_a()));
    let mut coordinator = project.coordinator(tool, false);

    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert_eq!(outcome.succeeded, vec![project.source("src/a.rs")]);
    assert!(outcome.failed.is_empty());
    assert!(outcome.errors.is_empty());

    let bundle = coordinator.bundles().get(Path::new("src/a.rs")).unwrap();
    assert_eq!(
        bundle.outputs,
        paths(&["res/raw/a.bc", "gen/ScriptC_a.java"])
    );
    assert_eq!(bundle.dependencies, paths(&["src/a.rs", "src/inc.rsh"]));

    let workspace = coordinator.workspace();
    assert_eq!(
        workspace.refreshes,
        vec![(project.root().join("res/raw"), 1)]
    );
    assert!(workspace.markers.is_empty());
}

#[test]
fn test_command_line_shape() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::ok(&project.depfile_a()));
    let mut coordinator = project.coordinator(tool, false);

    coordinator.compile(&[project.source("src/a.rs")]);

    let invocations = coordinator.tool.invocations.borrow();
    assert_eq!(invocations.len(), 1);
    let args: Vec<String> = invocations[0]
        .args()
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        args,
        vec![
            "-I".to_string(),
            project.abs("renderscript/clang-include"),
            "-I".to_string(),
            project.abs("renderscript/include"),
            "-p".to_string(),
            project.abs("gen"),
            "-o".to_string(),
            project.abs("res/raw"),
            "-d".to_string(),
            project.abs("bin"),
            "-MD".to_string(),
            project.abs("src/a.rs"),
        ]
    );
}

#[test]
fn test_output_directories_are_created() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::ok(&project.depfile_a()));
    let mut coordinator = project.coordinator(tool, false);

    coordinator.compile(&[project.source("src/a.rs")]);

    assert!(project.root().join("gen").is_dir());
    assert!(project.root().join("res/raw").is_dir());
    assert!(project.root().join("bin").is_dir());
}

#[test]
fn test_diagnostics_mark_files_and_fail() {
    let project = Project::new();
    let line = format!("{}:14:3: bad id", project.abs("src/a.rs"));
    let include_line = format!("{}:2:1: unknown type", project.abs("src/inc.rsh"));
    let tool = ScriptedTool::default().with("a.rs", Response::failing(&[&line, &include_line]));
    let mut coordinator = project.coordinator(tool, false);

    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert_eq!(outcome.failed, vec![project.source("src/a.rs")]);
    assert!(outcome.succeeded.is_empty());
    assert!(coordinator.bundles().is_empty());

    let workspace = coordinator.workspace();
    let markers = workspace.file_markers("src/a.rs");
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].line, Some(14));
    assert_eq!(markers[0].message, "bad id");
    assert_eq!(markers[0].kind, MarkerKind::Compile);
    assert_eq!(markers[0].severity, Severity::Error);
    assert_eq!(workspace.file_markers("src/inc.rsh").len(), 1);
    assert!(workspace.project_markers().is_empty());
    assert!(workspace.printed_errors.is_empty());
    assert!(workspace.refreshes.is_empty());
}

#[test]
fn test_unparsed_failure_prints_raw_output_and_marks_project() {
    let project = Project::new();
    let tool = ScriptedTool::default().with(
        "a.rs",
        Response::failing(&["llvm-rs-cc: fatal: out of memory", "Aborted"]),
    );
    let mut coordinator = project.coordinator(tool, false);

    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert_eq!(outcome.failed.len(), 1);
    let workspace = coordinator.workspace();
    assert_eq!(
        workspace.printed_errors,
        vec![
            "llvm-rs-cc: fatal: out of memory".to_string(),
            "Aborted".to_string()
        ]
    );
    let project_markers = workspace.project_markers();
    assert_eq!(project_markers.len(), 1);
    assert_eq!(project_markers[0].message, UNPARSED_ERROR_MESSAGE);
    assert_eq!(project_markers[0].kind, MarkerKind::Build);
}

#[test]
fn test_external_diagnostic_counts_as_unparsed() {
    let project = Project::new();
    let tool = ScriptedTool::default().with(
        "a.rs",
        Response::failing(&["/sdk/rs/include/rs_core.rsh:10:1: redefinition"]),
    );
    let mut coordinator = project.coordinator(tool, false);

    coordinator.compile(&[project.source("src/a.rs")]);

    let workspace = coordinator.workspace();
    assert_eq!(workspace.printed_errors.len(), 1);
    assert_eq!(workspace.project_markers().len(), 1);
}

#[test]
fn test_malformed_line_number_discards_diagnostics() {
    let project = Project::new();
    let good = format!("{}:14:3: bad id", project.abs("src/a.rs"));
    let bad = format!("{}:abc:3: what", project.abs("src/a.rs"));
    let tool = ScriptedTool::default().with("a.rs", Response::failing(&[&good, &bad]));
    let mut coordinator = project.coordinator(tool, false);

    coordinator.compile(&[project.source("src/a.rs")]);

    let workspace = coordinator.workspace();
    assert!(workspace.file_markers("src/a.rs").is_empty());
    assert_eq!(workspace.project_markers().len(), 1);
    assert_eq!(workspace.printed_errors.len(), 2);
}

#[test]
fn test_success_ignores_incidental_output_when_not_verbose() {
    let project = Project::new();
    let mut response = Response::ok(&project.depfile_a());
    response.lines = vec!["some chatter".to_string()];
    let tool = ScriptedTool::default().with("a.rs", response);
    let mut coordinator = project.coordinator(tool, false);

    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert_eq!(outcome.succeeded.len(), 1);
    let workspace = coordinator.workspace();
    assert!(workspace.printed.is_empty());
    assert!(workspace.printed_errors.is_empty());
    assert!(workspace.project_markers().is_empty());
}

#[test]
fn test_verbose_echoes_name_command_and_output() {
    let project = Project::new();
    let mut response = Response::ok(&project.depfile_a());
    response.lines = vec!["some chatter".to_string()];
    let tool = ScriptedTool::default().with("a.rs", response);
    let mut coordinator = project.coordinator(tool, true);

    coordinator.compile(&[project.source("src/a.rs")]);

    let printed = &coordinator.workspace().printed;
    assert_eq!(printed[0], "Compiling: a.rs");
    assert!(printed[1].starts_with("/sdk/platform-tools/llvm-rs-cc -I "));
    assert!(printed[1].ends_with(&format!("-MD {}", project.abs("src/a.rs"))));
    assert_eq!(printed[2], "some chatter");
}

#[test]
fn test_verbose_echoes_parsed_failure_output() {
    let project = Project::new();
    let line = format!("{}:14:3: bad id", project.abs("src/a.rs"));
    let tool = ScriptedTool::default().with("a.rs", Response::failing(&[&line]));
    let mut coordinator = project.coordinator(tool, true);

    coordinator.compile(&[project.source("src/a.rs")]);

    let workspace = coordinator.workspace();
    assert!(workspace.printed.contains(&line));
    assert!(workspace.printed_errors.is_empty());
}

#[test]
fn test_invocation_error_marks_project() {
    let project = Project::new();
    let tool = ScriptedTool::default().with(
        "a.rs",
        Response {
            spawn_error: true,
            ..Response::default()
        },
    );
    let mut coordinator = project.coordinator(tool, false);

    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert_eq!(outcome.failed.len(), 1);
    let markers = coordinator.workspace().project_markers();
    assert_eq!(markers.len(), 1);
    assert!(
        markers[0]
            .message
            .contains("Please check llvm-rs-cc is present at /sdk/platform-tools/llvm-rs-cc")
    );
}

#[test]
fn test_corrupt_dependency_file_fails_the_source() {
    let project = Project::new();
    let corrupt = format!("{} \\\n", project.abs("res/raw/a.bc"));
    let tool = ScriptedTool::default().with("a.rs", Response::ok(&corrupt));
    let mut coordinator = project.coordinator(tool, false);

    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert!(outcome.succeeded.is_empty());
    assert_eq!(outcome.failed, vec![project.source("src/a.rs")]);
    assert!(matches!(
        outcome.errors.as_slice(),
        [RsBuildError::DependencyFileCorrupt { .. }]
    ));
    assert!(coordinator.bundles().is_empty());

    let markers = coordinator.workspace().file_markers("src/a.rs");
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].kind, MarkerKind::Build);
    // nothing succeeded, so no refresh
    assert!(coordinator.workspace().refreshes.is_empty());
}

#[test]
fn test_missing_dependency_file_still_creates_bundle() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::default());
    let mut coordinator = project.coordinator(tool, false);

    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert_eq!(outcome.succeeded.len(), 1);
    let bundle = coordinator.bundles().get(Path::new("src/a.rs")).unwrap();
    assert!(bundle.outputs.is_empty());
}

#[test]
fn test_batch_keeps_order_and_refreshes_once() {
    let project = Project::new();
    let depfile_b = format!(
        "{}: {}\n",
        project.abs("res/raw/b.bc"),
        project.abs("src/b.rs")
    );
    let tool = ScriptedTool::default()
        .with("a.rs", Response::failing(&["garbage"]))
        .with("b.rs", Response::ok(&depfile_b));
    let mut coordinator = project.coordinator(tool, false);

    let outcome =
        coordinator.compile(&[project.source("src/b.rs"), project.source("src/a.rs")]);

    assert_eq!(outcome.succeeded, vec![project.source("src/b.rs")]);
    assert_eq!(outcome.failed, vec![project.source("src/a.rs")]);

    let invoked: Vec<PathBuf> = coordinator
        .tool
        .invocations
        .borrow()
        .iter()
        .map(|c| PathBuf::from(c.args().last().unwrap()))
        .collect();
    assert_eq!(
        invoked,
        vec![project.root().join("src/b.rs"), project.root().join("src/a.rs")]
    );
    assert_eq!(coordinator.workspace().refreshes.len(), 1);
}

#[test]
fn test_recompile_clears_markers_of_source_and_dependencies() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::ok(&project.depfile_a()));
    let mut coordinator = project.coordinator(tool, false);
    coordinator.compile(&[project.source("src/a.rs")]);

    {
        let workspace = coordinator.workspace_mut();
        workspace.mark_file(
            Path::new("src/a.rs"),
            MarkerKind::Compile,
            "old",
            1,
            Severity::Error,
        );
        workspace.mark_file(
            Path::new("src/inc.rsh"),
            MarkerKind::Compile,
            "old",
            2,
            Severity::Error,
        );
        workspace.mark_file(
            Path::new("src/b.rs"),
            MarkerKind::Compile,
            "unrelated",
            3,
            Severity::Error,
        );
    }

    coordinator.compile(&[project.source("src/a.rs")]);

    let workspace = coordinator.workspace();
    assert!(workspace.file_markers("src/a.rs").is_empty());
    assert!(workspace.file_markers("src/inc.rsh").is_empty());
    assert_eq!(workspace.file_markers("src/b.rs").len(), 1);
}

#[test]
fn test_failed_recompile_keeps_previous_bundle() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::ok(&project.depfile_a()));
    let mut coordinator = project.coordinator(tool, false);
    coordinator.compile(&[project.source("src/a.rs")]);

    coordinator
        .tool
        .responses
        .insert("a.rs".to_string(), Response::failing(&["boom"]));
    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert_eq!(outcome.failed.len(), 1);
    let bundle = coordinator.bundles().get(Path::new("src/a.rs")).unwrap();
    assert_eq!(bundle.outputs.len(), 2);
}

#[test]
fn test_remove_bundle_deletes_outputs_and_dependency_file_twice() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::ok(&project.depfile_a()));
    let mut coordinator = project.coordinator(tool, false);
    coordinator.compile(&[project.source("src/a.rs")]);

    std::fs::create_dir_all(project.root().join("gen")).unwrap();
    std::fs::write(project.root().join("res/raw/a.bc"), "bc").unwrap();
    std::fs::write(project.root().join("gen/ScriptC_a.java"), "class").unwrap();
    let dep_file = coordinator.dependency_file_for(Path::new("src/a.rs")).unwrap();
    assert!(dep_file.exists());

    coordinator.remove_bundle(Path::new("src/a.rs")).unwrap();

    assert!(!project.root().join("res/raw/a.bc").exists());
    assert!(!project.root().join("gen/ScriptC_a.java").exists());
    assert!(!dep_file.exists());
    assert!(coordinator.bundles().is_empty());

    coordinator.remove_bundle(Path::new("src/a.rs")).unwrap();
}

#[test]
fn test_reload_reads_dependency_files() {
    let project = Project::new();
    let bin = project.root().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("a.d"), project.depfile_a()).unwrap();
    std::fs::write(bin.join("b.d"), "no separator here\n").unwrap();

    let mut coordinator = project.coordinator(ScriptedTool::default(), false);
    let corrupt = coordinator.reload(paths(&["src/a.rs", "src/b.rs", "src/c.rs"]));

    assert_eq!(corrupt, paths(&["src/b.rs"]));
    assert_eq!(coordinator.bundles().sources(), paths(&["src/a.rs"]));
    assert_eq!(
        coordinator
            .bundles()
            .get(Path::new("src/a.rs"))
            .unwrap()
            .dependencies,
        paths(&["src/a.rs", "src/inc.rsh"])
    );
}

#[test]
fn test_reload_drops_bundle_without_dependency_file() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::ok(&project.depfile_a()));
    let mut coordinator = project.coordinator(tool, false);
    coordinator.compile(&[project.source("src/a.rs")]);

    std::fs::remove_file(project.root().join("bin/a.d")).unwrap();
    coordinator.reload(paths(&["src/a.rs"]));

    assert!(coordinator.bundles().is_empty());
}

#[test]
fn test_settings_reject_wrong_include_count() {
    let project = Project::new();
    let config = ProjectConfig {
        include_dirs: vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")],
        ..ProjectConfig::default()
    };
    let err = CoordinatorSettings::from_config(&config, project.root()).unwrap_err();
    assert!(matches!(err, RsBuildError::ConfigInvalid { .. }));
}

#[test]
fn test_failure_without_output_marks_project() {
    let project = Project::new();
    let tool = ScriptedTool::default().with("a.rs", Response::failing(&[]));
    let mut coordinator = project.coordinator(tool, false);

    let outcome = coordinator.compile(&[project.source("src/a.rs")]);

    assert_eq!(outcome.failed, vec![project.source("src/a.rs")]);
    let workspace = coordinator.workspace();
    let markers = workspace.project_markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].message, UNPARSED_ERROR_MESSAGE);
    assert!(workspace.printed_errors.is_empty());
}

#[test]
fn test_retry_replaces_include_markers_of_never_compiled_source() {
    let project = Project::new();
    let first = format!("{}:2:1: unknown type", project.abs("src/inc.rsh"));
    let tool = ScriptedTool::default().with("a.rs", Response::failing(&[&first]));
    let mut coordinator = project.coordinator(tool, false);
    coordinator.compile(&[project.source("src/a.rs")]);
    assert!(coordinator.bundles().is_empty());

    let second = format!("{}:3:1: unknown type", project.abs("src/inc.rsh"));
    coordinator
        .tool
        .responses
        .insert("a.rs".to_string(), Response::failing(&[&second]));
    coordinator.compile(&[project.source("src/a.rs")]);

    let markers = coordinator.workspace().file_markers("src/inc.rsh");
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].line, Some(3));
}

#[test]
fn test_identical_failures_across_sessions_keep_one_marker() {
    let project = Project::new();
    let line = format!("{}:2:1: unknown type", project.abs("src/inc.rsh"));

    let mut workspace = RecordingWorkspace::new(project.root());
    for _ in 0..3 {
        let tool = ScriptedTool::default().with("a.rs", Response::failing(&[&line]));
        let mut coordinator = Coordinator::new(workspace, tool, project.settings(false));
        coordinator.compile(&[project.source("src/a.rs")]);
        let Coordinator { workspace: next, .. } = coordinator;
        workspace = next;
    }

    assert_eq!(workspace.file_markers("src/inc.rsh").len(), 1);
}

#[test]
fn test_remove_bundle_forgets_marked_files() {
    let project = Project::new();
    let line = format!("{}:2:1: unknown type", project.abs("src/inc.rsh"));
    let tool = ScriptedTool::default().with("a.rs", Response::failing(&[&line]));
    let mut coordinator = project.coordinator(tool, false);
    coordinator.compile(&[project.source("src/a.rs")]);

    coordinator.remove_bundle(Path::new("src/a.rs")).unwrap();

    assert!(coordinator.marked.is_empty());
}
