//! The `require` operation: materialize a project node at most once per
//! invocation and share it with every requester.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::core::options::OptionSet;
use crate::core::target::TargetKind;
use crate::core::{ProjectEntry, ProjectName, Registry};
use crate::resolver::cycle;
use crate::resolver::graph::BuildGraph;
use crate::resolver::memo::{Claim, Memo};
use crate::resolver::node::ProjectNode;
use crate::resolver::ResolveError;

/// Resolves project names against a registry for one invocation.
///
/// The global option set must be frozen before a resolver is created; every
/// node it materializes shares that set.
pub struct Resolver<'a> {
    root: String,
    registry: &'a Registry,
    options: Arc<OptionSet>,
    memo: Memo,
    materialized: AtomicUsize,
}

impl<'a> Resolver<'a> {
    pub fn new(root: impl Into<String>, registry: &'a Registry, options: Arc<OptionSet>) -> Self {
        Resolver {
            root: root.into(),
            registry,
            options,
            memo: Memo::default(),
            materialized: AtomicUsize::new(0),
        }
    }

    /// Materialize `name` and everything it requires.
    ///
    /// A second request for the same name, from any thread, returns the
    /// node built by the first. Everything reachable from `name` is checked
    /// before a memo slot is claimed, so requests racing over a cycle fail
    /// instead of waiting on each other.
    pub fn require(&self, name: &ProjectName) -> Result<Arc<ProjectNode>, ResolveError> {
        cycle::check(self.registry, &self.root, std::slice::from_ref(name))?;
        self.require_in(name, &self.root, &[])
    }

    /// Number of nodes constructed so far.
    pub fn materialized_count(&self) -> usize {
        self.materialized.load(Ordering::SeqCst)
    }

    /// Number of nodes currently in the memo table.
    pub fn memoized_count(&self) -> usize {
        self.memo.ready_count()
    }

    fn require_in(
        &self,
        name: &ProjectName,
        required_by: &str,
        chain: &[ProjectName],
    ) -> Result<Arc<ProjectNode>, ResolveError> {
        if chain.contains(name) {
            return Err(cycle::cycle_error(chain, name));
        }

        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| ResolveError::MissingProject {
                name: name.to_string(),
                required_by: required_by.to_string(),
            })?;

        match self.memo.claim(name) {
            Claim::Ready(node) => {
                tracing::debug!("reusing project node `{}`", name);
                return Ok(node);
            }
            Claim::Build => {}
        }

        let mut chain = chain.to_vec();
        chain.push(name.clone());

        match self.build(name, entry, &chain) {
            Ok(node) => {
                self.materialized.fetch_add(1, Ordering::SeqCst);
                self.memo.complete(name, Arc::clone(&node));
                Ok(node)
            }
            Err(e) => {
                self.memo.abandon(name);
                Err(e)
            }
        }
    }

    fn build(
        &self,
        name: &ProjectName,
        entry: &ProjectEntry,
        chain: &[ProjectName],
    ) -> Result<Arc<ProjectNode>, ResolveError> {
        entry.target.validate(name)?;

        let requires = match entry.target.kind {
            TargetKind::Composite => {
                cycle::check_unique_members(name, &entry.target.requires)?;
                entry.target.requires.clone()
            }
            TargetKind::Exe | TargetKind::Lib => entry.target.unique_requires(),
        };

        let dependencies = requires
            .iter()
            .map(|dep| self.require_in(dep, name.as_str(), chain))
            .collect::<Result<Vec<_>, _>>()?;

        if entry.target.kind == TargetKind::Composite {
            check_unique_targets(name.as_str(), &dependencies)?;
        }

        tracing::debug!("materialized project `{}` ({})", name, entry.target.kind);
        Ok(Arc::new(ProjectNode::new(
            name.clone(),
            entry.dir.clone(),
            entry.target.clone(),
            dependencies,
            Arc::clone(&self.options),
        )))
    }

    /// Resolve the root's members into a build graph.
    ///
    /// The whole reachable descriptor set is checked first; if that fails,
    /// no node is materialized. With `parallel`, top-level members are
    /// required concurrently.
    pub fn resolve_root(
        &self,
        projects: &[ProjectName],
        parallel: bool,
    ) -> Result<BuildGraph, ResolveError> {
        cycle::check_unique_members(&self.root, projects)?;
        cycle::check(self.registry, &self.root, projects)?;

        let top_level: Vec<Arc<ProjectNode>> = if parallel {
            projects
                .par_iter()
                .map(|name| self.require_in(name, &self.root, &[]))
                .collect::<Result<_, _>>()?
        } else {
            projects
                .iter()
                .map(|name| self.require_in(name, &self.root, &[]))
                .collect::<Result<_, _>>()?
        };

        check_unique_targets(&self.root, &top_level)?;

        let graph = BuildGraph::from_roots(self.root.clone(), &top_level);
        tracing::debug!(
            "resolved {} project(s) with {} edge(s)",
            graph.len(),
            graph.edges().len()
        );
        Ok(graph)
    }
}

/// Members of one composite must not declare the same target name.
fn check_unique_targets(scope: &str, members: &[Arc<ProjectNode>]) -> Result<(), ResolveError> {
    let mut seen: HashMap<&str, &ProjectName> = HashMap::new();
    for member in members {
        let target = member.target().name.as_str();
        if let Some(first) = seen.insert(target, member.name()) {
            if first != member.name() {
                return Err(ResolveError::DuplicateName {
                    name: target.to_string(),
                    scope: scope.to_string(),
                });
            }
        }
    }
    Ok(())
}
