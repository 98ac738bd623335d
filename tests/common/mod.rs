//! Common test utilities for rsbuild integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// Stand-in for llvm-rs-cc.
///
/// Takes the same arguments, logs every source it compiles to
/// `compile.log` in the project root, and behaves per source content:
/// a line containing `ERROR` yields a located diagnostic, `CRASH` yields
/// output without a location. Anything else compiles to `<stem>.bc` plus
/// `ScriptC_<stem>.java` and a dependency file listing `#include`s.
#[allow(dead_code)]
pub const FAKE_COMPILER: &str = r#"#!/bin/sh
while [ $# -gt 1 ]; do
  case "$1" in
    -p) gen="$2"; shift 2 ;;
    -o) res="$2"; shift 2 ;;
    -d) dep="$2"; shift 2 ;;
    -I) shift 2 ;;
    *) shift ;;
  esac
done
src="$1"
name=$(basename "$src" .rs)
echo "$src" >> "$dep/../compile.log"
if grep -q CRASH "$src"; then
  echo "llvm-rs-cc: internal compiler error" >&2
  exit 2
fi
if grep -q ERROR "$src"; then
  line=$(grep -n ERROR "$src" | head -n 1 | cut -d: -f1)
  echo "$src:$line:5: error: unexpected token" >&2
  exit 1
fi
echo bc > "$res/$name.bc"
echo class > "$gen/ScriptC_$name.java"
deps="$src"
for inc in $(sed -n 's/^#include "\(.*\)"$/\1/p' "$src"); do
  deps="$deps \\
  $(dirname "$src")/$inc"
done
printf '%s %s: %s\n' "$res/$name.bc" "$gen/ScriptC_$name.java" "$deps" > "$dep/$name.d"
exit 0
"#;

/// A test project for integration tests
#[allow(dead_code)]
pub struct TestProject {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to project root (canonical)
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    /// Create a new, empty test project
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = dunce::canonicalize(temp.path()).expect("Failed to canonicalize temp dir");
        Self { temp, path }
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Remove a file from the project
    pub fn remove_file(&self, path: &str) {
        std::fs::remove_file(self.path.join(path)).expect("Failed to remove file");
    }

    /// Install the fake compiler at `tools/llvm-rs-cc` and return its path
    #[cfg(unix)]
    pub fn install_fake_compiler(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let compiler = self.path.join("tools").join("llvm-rs-cc");
        self.write_file("tools/llvm-rs-cc", FAKE_COMPILER);
        let mut permissions = std::fs::metadata(&compiler)
            .expect("Failed to stat compiler")
            .permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&compiler, permissions).expect("Failed to chmod compiler");
        compiler
    }

    /// Sources the fake compiler was run on, in order, as project-relative
    /// paths
    pub fn compiled(&self) -> Vec<String> {
        if !self.file_exists("compile.log") {
            return Vec::new();
        }
        let prefix = format!("{}/", self.path.display());
        self.read_file("compile.log")
            .lines()
            .map(|l| l.trim_start_matches(&prefix).to_string())
            .collect()
    }

    /// Forget previously logged compiles
    pub fn reset_log(&self) {
        if self.file_exists("compile.log") {
            self.remove_file("compile.log");
        }
    }
}
