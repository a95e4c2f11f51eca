//! Materialized project nodes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::options::OptionSet;
use crate::core::target::{TargetDescriptor, TargetKind};
use crate::core::ProjectName;

/// A project after resolution: its declaration plus the resolved nodes it
/// requires.
///
/// Nodes are shared: a project required from several places is one
/// `Arc<ProjectNode>` held by every requester.
#[derive(Debug)]
pub struct ProjectNode {
    name: ProjectName,
    dir: PathBuf,
    target: TargetDescriptor,
    dependencies: Vec<Arc<ProjectNode>>,
    options: Arc<OptionSet>,
}

impl ProjectNode {
    pub(crate) fn new(
        name: ProjectName,
        dir: PathBuf,
        target: TargetDescriptor,
        dependencies: Vec<Arc<ProjectNode>>,
        options: Arc<OptionSet>,
    ) -> Self {
        ProjectNode {
            name,
            dir,
            target,
            dependencies,
            options,
        }
    }

    pub fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Project directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn target(&self) -> &TargetDescriptor {
        &self.target
    }

    pub fn kind(&self) -> TargetKind {
        self.target.kind
    }

    /// Resolved requirements, in declaration order, without repeats.
    pub fn dependencies(&self) -> &[Arc<ProjectNode>] {
        &self.dependencies
    }

    /// Global options in effect when this node was materialized.
    pub fn options(&self) -> &Arc<OptionSet> {
        &self.options
    }
}
