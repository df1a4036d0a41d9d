//! Test harness for dir-index integration tests

use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const T0: i64 = 1_600_000_000;
pub const T1: i64 = 1_650_000_000;
pub const T2: i64 = 1_700_000_000;

pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file with a fixed mtime, creating parent directories.
    pub fn add_file(&self, path: &str, content: &str, mtime: i64) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        filetime::set_file_mtime(&full_path, FileTime::from_unix_time(mtime, 0))
            .expect("Failed to set mtime");
        full_path
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file")
    }
}

/// Run the binary with `--root <root>` followed by `args`.
pub fn run_dir_index(root: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_dir-index");
    let output = Command::new(binary)
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to run dir-index");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let tree = TestTree::new();
        assert!(tree.path().exists());
    }

    #[test]
    fn test_harness_add_file_sets_mtime() {
        let tree = TestTree::new();
        let path = tree.add_file("a/b.txt", "b", T1);
        let meta = fs::metadata(path).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), T1);
    }
}
