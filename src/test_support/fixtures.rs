//! Workspace fixtures for common test scenarios.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::builder::override_resolver::OVERRIDE_DESCRIPTOR;
use crate::core::descriptor::{PROJECT_DESCRIPTOR, ROOT_DESCRIPTOR};
use crate::core::Workspace;

/// A workspace on disk, removed when dropped.
pub struct WorkspaceFixture {
    dir: TempDir,
}

impl WorkspaceFixture {
    /// A root that declares no projects.
    pub fn empty() -> Self {
        let fixture = WorkspaceFixture {
            dir: TempDir::new().expect("failed to create temp dir"),
        };
        fixture.write(ROOT_DESCRIPTOR, "[root]\nprojects = []\n");
        fixture
    }

    /// The `samples` root: `n` executables `v1..vn`, each requiring the
    /// shared library project `so_5`.
    pub fn shared_dependency(n: usize) -> Self {
        let projects: Vec<String> = (1..=n).map(|i| format!("\"v{}\"", i)).collect();
        let root = format!(
            r#"[root]
name = "samples"
cpp-std = "c++14"
include-paths = ["."]
projects = [{}]
"#,
            projects.join(", ")
        );

        let mut fixture = Self::empty().with_root(&root).with_project(
            "so_5",
            r#"[target]
name = "so.5.5"
kind = "lib"
sources = ["*.cpp"]
"#,
        );
        fixture = fixture
            .with_file("so_5/agent.cpp", "int so_5_agent() { return 0; }\n")
            .with_file("so_5/environment.cpp", "int so_5_env() { return 0; }\n");

        for i in 1..=n {
            fixture = fixture
                .with_project(
                    &format!("v{}", i),
                    &format!(
                        r#"[target]
name = "v{i}_app"
kind = "exe"
sources = ["main.cpp"]
requires = ["so_5"]
"#
                    ),
                )
                .with_file(&format!("v{}/main.cpp", i), "int main() { return 0; }\n");
        }
        fixture
    }

    /// Replace the root descriptor.
    pub fn with_root(self, contents: &str) -> Self {
        self.write(ROOT_DESCRIPTOR, contents);
        self
    }

    /// Add a project descriptor in `rel` (relative to the root).
    pub fn with_project(self, rel: &str, contents: &str) -> Self {
        self.write(&format!("{}/{}", rel, PROJECT_DESCRIPTOR), contents);
        self
    }

    /// Add the local override descriptor.
    pub fn with_override(self, contents: &str) -> Self {
        self.write(OVERRIDE_DESCRIPTOR, contents);
        self
    }

    /// Add an arbitrary file.
    pub fn with_file(self, rel: &str, contents: &str) -> Self {
        self.write(rel, contents);
        self
    }

    /// Workspace root directory.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the root descriptor.
    pub fn manifest_path(&self) -> PathBuf {
        self.root().join(ROOT_DESCRIPTOR)
    }

    /// Load the fixture as a workspace with the default target directory.
    pub fn workspace(&self) -> Workspace {
        Workspace::load(&self.manifest_path(), None).expect("failed to load fixture workspace")
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        std::fs::write(&path, contents).expect("failed to write fixture file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_dependency_layout() {
        let fixture = WorkspaceFixture::shared_dependency(2);
        assert!(fixture.manifest_path().is_file());
        assert!(fixture.root().join("so_5").join(PROJECT_DESCRIPTOR).is_file());
        assert!(fixture.root().join("v2/main.cpp").is_file());
        assert!(!fixture.root().join("v3").exists());
    }
}
