//! [`TestWorkspace`] for tests that need real files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding response files and fake root directories.
///
/// # Example
///
/// ```rust
/// use vcpkg_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// let rsp = ws.write_response_file("args.rsp", &["--triplet=x64-linux", "install"]);
/// assert!(rsp.exists());
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write one argument per line and return the file path.
    pub fn write_response_file(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.root().join(name);
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&path, content).unwrap();
        path
    }

    /// Create (and return) a directory below the workspace root.
    pub fn create_dir(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// `@<path>` token referring to a response file.
    pub fn response_token(path: &Path) -> String {
        format!("@{}", path.display())
    }
}
