//! [`TestProject`] builder for remix build pipeline test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// A temporary project directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use remix_test_utils::TestProject;
///
/// let project = TestProject::with_default_app();
/// project.write_config("buildDirectory = \"dist\"\n");
/// project.assert_file_exists("routes.json");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A project with a root route and one index route, plus `routes.json`.
    ///
    /// Files:
    /// - `app/root.tsx`
    /// - `app/routes/_index.tsx`
    pub fn with_default_app() -> Self {
        let project = Self::new();
        project.write_file("app/root.tsx", "export default function Root() {}\n");
        project.write_file(
            "app/routes/_index.tsx",
            "export default function Index() {}\n",
        );
        project.write_routes(&[
            json!({"id": "root", "file": "app/root.tsx"}),
            json!({
                "id": "routes/_index",
                "parentId": "root",
                "index": true,
                "file": "app/routes/_index.tsx"
            }),
        ]);
        project
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `path` inside the project.
    pub fn path(&self, path: &str) -> PathBuf {
        self.root().join(path)
    }

    /// Write `content` to `path` (relative to root), creating parent dirs.
    pub fn write_file(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", full_path.display()));
    }

    /// Write `routes.json` as the route-discovery output.
    pub fn write_routes(&self, routes: &[Value]) {
        let content = serde_json::to_string_pretty(routes).unwrap();
        self.write_file("routes.json", &content);
    }

    /// Write `remix.config.toml`.
    pub fn write_config(&self, content: &str) {
        self.write_file("remix.config.toml", content);
    }

    /// Parse the JSON file at `path` (relative to root).
    ///
    /// # Panics
    /// Panics if the file cannot be read or is not valid JSON.
    pub fn read_json(&self, path: &str) -> Value {
        let full_path = self.path(path);
        let content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Invalid JSON in {}: {e}", full_path.display()))
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does NOT exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
