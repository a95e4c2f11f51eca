//! Workspace - the root composite and everything discovered under it.
//!
//! Loading a workspace parses `Rigging.toml` and runs the discovery step that
//! populates the project [`Registry`]. Nothing is resolved yet.

use std::path::{Path, PathBuf};

use crate::core::descriptor::{RootManifest, ROOT_DESCRIPTOR};
use crate::core::registry::Registry;
use crate::resolver::ResolveError;

/// Default directory for build outputs, relative to the workspace root.
pub const DEFAULT_TARGET_DIR: &str = "target";

/// Error returned when no root descriptor can be found.
#[derive(Debug, thiserror::Error)]
#[error("could not find {ROOT_DESCRIPTOR} in `{}` or any parent directory", dir.display())]
pub struct RootNotFound {
    pub dir: PathBuf,
}

/// Find `Rigging.toml`, starting at `start` and walking upward.
pub fn find_root_manifest(start: &Path) -> Result<PathBuf, RootNotFound> {
    start
        .ancestors()
        .map(|dir| dir.join(ROOT_DESCRIPTOR))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| RootNotFound {
            dir: start.to_path_buf(),
        })
}

/// A loaded workspace.
#[derive(Debug)]
pub struct Workspace {
    /// Directory containing `Rigging.toml`
    root: PathBuf,

    /// The parsed root descriptor
    manifest: RootManifest,

    /// Discovered project descriptors
    registry: Registry,

    /// Output directory, relative to the root
    target_dir: PathBuf,
}

impl Workspace {
    /// Load the workspace rooted at the directory containing `manifest_path`.
    pub fn load(manifest_path: &Path, target_dir: Option<PathBuf>) -> Result<Self, ResolveError> {
        let root = match manifest_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let manifest = RootManifest::load(manifest_path)?;
        let target_dir = target_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR));

        let registry = Registry::discover(&root, std::slice::from_ref(&target_dir))?;
        tracing::debug!(
            "discovered {} project(s) under {}",
            registry.len(),
            root.display()
        );

        Ok(Workspace {
            root,
            manifest,
            registry,
            target_dir,
        })
    }

    /// Assemble a workspace from parts that are already in memory.
    pub fn from_parts(root: impl Into<PathBuf>, manifest: RootManifest, registry: Registry) -> Self {
        Workspace {
            root: root.into(),
            manifest,
            registry,
            target_dir: PathBuf::from(DEFAULT_TARGET_DIR),
        }
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the root composite: `[root] name`, or the root directory name.
    pub fn name(&self) -> String {
        self.manifest.root.name.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "root".to_string())
        })
    }

    pub fn manifest(&self) -> &RootManifest {
        &self.manifest
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Output directory, absolute.
    pub fn target_dir(&self) -> PathBuf {
        self.root.join(&self.target_dir)
    }
}
