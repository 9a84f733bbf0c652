//! [`TestMonorepo`] builder for beta publishing scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// Default location of the published package record inside a fixture.
pub const RECORD_PATH: &str = "scripts/publishedPackages.temp.json";

/// A temporary monorepo laid out as `extensions/<name>/package.json`, with an
/// optional nested `web/package.json` per extension.
///
/// # Example
///
/// ```rust,no_run
/// use beta_test_utils::TestMonorepo;
///
/// let repo = TestMonorepo::new();
/// repo.add_extension("ext-a", "1.0.0", serde_json::json!({"foo": "1.0.0"}));
/// repo.write_record(&["foo:1.2.0"]);
/// ```
pub struct TestMonorepo {
    temp_dir: TempDir,
}

impl Default for TestMonorepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMonorepo {
    /// Create an empty temporary monorepo root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory of an extension, whether or not it exists yet.
    pub fn extension_dir(&self, name: &str) -> PathBuf {
        self.root().join("extensions").join(name)
    }

    /// Path of the record file used by [`Self::write_record`].
    pub fn record_path(&self) -> PathBuf {
        self.root().join(RECORD_PATH)
    }

    /// Create `extensions/<name>/package.json` with the given runtime dependencies.
    pub fn add_extension(&self, name: &str, version: &str, dependencies: Value) -> PathBuf {
        let manifest = serde_json::json!({
            "name": name,
            "version": version,
            "dependencies": dependencies,
        });
        self.add_extension_manifest(name, &manifest)
    }

    /// Create `extensions/<name>/package.json` with arbitrary content.
    pub fn add_extension_manifest(&self, name: &str, manifest: &Value) -> PathBuf {
        let dir = self.extension_dir(name);
        fs::create_dir_all(&dir).unwrap();
        write_json(&dir.join("package.json"), manifest);
        dir
    }

    /// Create the nested `extensions/<name>/web/package.json` front-end project.
    pub fn add_web_project(&self, name: &str, manifest: &Value) -> PathBuf {
        let dir = self.extension_dir(name).join("web");
        fs::create_dir_all(&dir).unwrap();
        write_json(&dir.join("package.json"), manifest);
        dir
    }

    /// Write the published package record as a JSON array of strings.
    pub fn write_record(&self, entries: &[&str]) -> PathBuf {
        let path = self.record_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        write_json(&path, &serde_json::json!(entries));
        path
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Parse a JSON file relative to the root.
    pub fn read_json(&self, relative: impl AsRef<Path>) -> Value {
        let content = fs::read_to_string(self.root().join(relative)).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    /// Assert that a file relative to the root exists.
    pub fn assert_file_exists(&self, relative: impl AsRef<Path>) {
        let path = self.root().join(relative);
        assert!(path.exists(), "expected {} to exist", path.display());
    }

    /// Assert that a path relative to the root does not exist.
    pub fn assert_missing(&self, relative: impl AsRef<Path>) {
        let path = self.root().join(relative);
        assert!(!path.exists(), "expected {} to be absent", path.display());
    }
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}
