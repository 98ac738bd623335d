//! Project configuration (rsbuild.yaml) data structures
//!
//! Every field is optional in the file; missing fields take the defaults
//! below. Relative paths are resolved against the project root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, config};

/// Project configuration filename
pub const CONFIG_FILE: &str = "rsbuild.yaml";

/// How much the build echoes to the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// Project configuration (rsbuild.yaml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Compiler executable; a bare name is looked up on `PATH`
    pub compiler: PathBuf,

    /// The two include directories passed with `-I`
    pub include_dirs: Vec<PathBuf>,

    /// Directories scanned for sources
    pub source_dirs: Vec<PathBuf>,

    /// Source file extension, without the dot
    pub extension: String,

    /// Generated code output directory (`-p`)
    pub gen_dir: PathBuf,

    /// Generated resource output directory (`-o`)
    pub res_dir: PathBuf,

    /// Dependency file output directory (`-d`)
    pub dep_dir: PathBuf,

    pub verbosity: Verbosity,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from("llvm-rs-cc"),
            include_dirs: vec![
                PathBuf::from("renderscript/clang-include"),
                PathBuf::from("renderscript/include"),
            ],
            source_dirs: vec![PathBuf::from("src")],
            extension: "rs".to_string(),
            gen_dir: PathBuf::from("gen"),
            res_dir: PathBuf::from("res/raw"),
            dep_dir: PathBuf::from("bin"),
            verbosity: Verbosity::Normal,
        }
    }
}

impl ProjectConfig {
    /// Load `rsbuild.yaml` from the project root, or the defaults when the
    /// file does not exist
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no project config, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;

        let parsed = Self::from_yaml(&content)
            .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.include_dirs.len() != 2 {
            return Err(config::invalid(format!(
                "include_dirs must list exactly two directories, found {}",
                self.include_dirs.len()
            )));
        }
        if self.source_dirs.is_empty() {
            return Err(config::invalid("source_dirs must not be empty"));
        }
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() || extension == "d" {
            return Err(config::invalid(format!(
                "extension '{}' cannot be used for sources",
                self.extension
            )));
        }
        Ok(())
    }

    /// Source extension without a leading dot
    pub fn source_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Absolute path of the compiler, or the bare name for a `PATH` lookup
    pub fn compiler_path(&self, root: &Path) -> PathBuf {
        if self.compiler.components().count() == 1 && !self.compiler.is_absolute() {
            self.compiler.clone()
        } else {
            root.join(&self.compiler)
        }
    }

    pub fn include_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.include_dirs.iter().map(|d| root.join(d)).collect()
    }

    pub fn source_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.source_dirs.iter().map(|d| root.join(d)).collect()
    }

    pub fn gen_path(&self, root: &Path) -> PathBuf {
        root.join(&self.gen_dir)
    }

    pub fn res_path(&self, root: &Path) -> PathBuf {
        root.join(&self.res_dir)
    }

    pub fn dep_path(&self, root: &Path) -> PathBuf {
        root.join(&self.dep_dir)
    }
}
