//! The descriptor registry.
//!
//! Before resolution starts, the workspace is walked once and every
//! `Project.toml` found is parsed and registered under its directory name.
//! A `Project.<variant>.toml` next to it declares another project built from
//! the same directory (for example a static build of a shared library) and
//! is registered as `<dir>/<variant>`.
//! Resolution afterwards is a pure lookup against this registry; nothing is
//! loaded lazily while the graph is being built.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::core::descriptor::{DescriptorFile, ProjectManifest};
use crate::core::target::TargetDescriptor;
use crate::core::name::InvalidName;
use crate::core::ProjectName;
use crate::resolver::ResolveError;

/// A registered project descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    /// Project directory (absolute when discovered from disk)
    pub dir: PathBuf,

    /// Declared target
    pub target: TargetDescriptor,
}

impl ProjectEntry {
    pub fn new(dir: impl Into<PathBuf>, target: TargetDescriptor) -> Self {
        ProjectEntry {
            dir: dir.into(),
            target,
        }
    }
}

/// Name-keyed set of project descriptors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<ProjectName, ProjectEntry>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` and register every project descriptor below it.
    ///
    /// Hidden directories and the directories named in `skip` (relative to
    /// `root`, e.g. the target directory) are not descended into. A
    /// descriptor placed directly in `root` is ignored: the root is described
    /// by `Rigging.toml`, not by a project descriptor.
    pub fn discover(root: &Path, skip: &[PathBuf]) -> Result<Self, ResolveError> {
        let mut registry = Registry::new();
        let skip: Vec<PathBuf> = skip.iter().map(|dir| relative_skip(root, dir)).collect();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let hidden = entry.file_name().to_string_lossy().starts_with('.');
                let skipped = entry
                    .path()
                    .strip_prefix(root)
                    .map(|rel| skip.iter().any(|s| s.as_path() == rel))
                    .unwrap_or(false);
                !hidden && !skipped
            });

        for entry in walker {
            let entry = entry.map_err(|e| ResolveError::MalformedDescriptor {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
                message: format!("failed to walk workspace: {}", e),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            let Some(file) = DescriptorFile::classify(&file_name) else {
                continue;
            };

            let path = entry.path();
            let Some(dir) = path.parent() else {
                continue;
            };
            let rel = dir.strip_prefix(root).unwrap_or(dir);
            if rel.as_os_str().is_empty() {
                tracing::debug!("ignoring {} in workspace root", file_name);
                continue;
            }

            let name = project_name(rel, file).map_err(|e| ResolveError::MalformedDescriptor {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            if registry.contains(&name) {
                return Err(ResolveError::DuplicateName {
                    name: name.to_string(),
                    scope: root.display().to_string(),
                });
            }
            let manifest = ProjectManifest::load(path)?;

            tracing::debug!("discovered project `{}` ({})", name, manifest.target.name);
            registry.insert(name, ProjectEntry::new(dir, manifest.target));
        }

        Ok(registry)
    }

    /// Register a descriptor, replacing any previous entry with the same name.
    pub fn insert(&mut self, name: ProjectName, entry: ProjectEntry) {
        self.entries.insert(name, entry);
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &ProjectName) -> Option<&ProjectEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &ProjectName) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &ProjectName> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn project_name(rel: &Path, file: DescriptorFile<'_>) -> Result<ProjectName, InvalidName> {
    let dir = ProjectName::from_relative_dir(rel)?;
    match file {
        DescriptorFile::Primary => Ok(dir),
        DescriptorFile::Variant(variant) => ProjectName::new(format!("{}/{}", dir, variant)),
    }
}

/// A skipped directory as a plain path relative to `root`: `./target`,
/// `target/` and `<root>/target` all become `target`.
fn relative_skip(root: &Path, dir: &Path) -> PathBuf {
    let dir = dir.strip_prefix(root).unwrap_or(dir);
    dir.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
