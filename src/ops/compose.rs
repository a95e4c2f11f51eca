//! Workspace composition.
//!
//! Runs the four phases of one invocation, strictly in order:
//!
//! 1. identify the active toolset
//! 2. decide runtime mode and placement (override or defaults)
//! 3. accumulate and freeze the global options
//! 4. resolve the root's projects into a build graph
//!
//! Any failure aborts the invocation; there is no partial composition.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::builder::override_resolver::{
    DefaultPolicy, OverrideResolver, ResolvedPolicy, StandardDefaults,
};
use crate::builder::plan::BuildPlan;
use crate::builder::policy::GlobalOptions;
use crate::core::options::OptionSet;
use crate::core::toolset::{current_toolset, Toolset, ToolsetProbe};
use crate::core::Workspace;
use crate::resolver::{BuildGraph, ResolveError, Resolver};
use crate::util::GlobalContext;

/// Options for composition.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Require top-level projects concurrently
    pub parallel: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        ComposeOptions { parallel: true }
    }
}

/// Everything decided by one invocation.
#[derive(Debug)]
pub struct Composition {
    pub toolset: Toolset,
    pub policy: ResolvedPolicy,
    pub globals: Arc<OptionSet>,
    pub graph: BuildGraph,
}

impl Composition {
    /// Lower into a build plan for the external engine.
    pub fn plan(&self, workspace_root: &Path) -> Result<BuildPlan> {
        BuildPlan::lower(
            workspace_root,
            &self.toolset,
            &self.policy,
            &self.globals,
            &self.graph,
        )
        .context("failed to lower build plan")
    }
}

/// Run phases 2-4 for an already identified toolset.
pub fn compose(
    ws: &Workspace,
    toolset: Toolset,
    defaults: &dyn DefaultPolicy,
    opts: &ComposeOptions,
) -> Result<Composition, ResolveError> {
    let policy = OverrideResolver::new(ws.root()).resolve(defaults)?;
    if policy.is_overridden() {
        tracing::info!("runtime mode and placement are override-defined");
    } else {
        tracing::info!(
            "runtime mode: {}, objects under {}",
            policy.effective_runtime_mode(),
            ws.target_dir().display()
        );
    }

    let mut globals = GlobalOptions::new();
    globals.inject(ws.manifest().root.global_options());
    globals.inject_toolset(&toolset.id);
    let globals = globals.freeze();
    tracing::debug!("{} global option(s) frozen", globals.len());

    let resolver = Resolver::new(ws.name(), ws.registry(), Arc::clone(&globals));
    let graph = resolver.resolve_root(&ws.manifest().root.projects, opts.parallel)?;
    tracing::info!(
        "composed `{}`: {} project(s), {} materialized",
        ws.name(),
        graph.len(),
        resolver.materialized_count()
    );

    Ok(Composition {
        toolset,
        policy,
        globals,
        graph,
    })
}

/// Load the workspace and run all four phases with production inputs.
///
/// The toolset is identified from the environment and configuration before
/// anything else is looked at.
pub fn compose_workspace(
    ctx: &GlobalContext,
    manifest_path: Option<&Path>,
) -> Result<(Workspace, Composition)> {
    let manifest_path = ctx.manifest_path(manifest_path)?;
    let root = manifest_path
        .parent()
        .with_context(|| format!("invalid manifest path: {}", manifest_path.display()))?;
    let config = ctx.load_config(root);

    let toolset = current_toolset(&ToolsetProbe::from_env(config.toolset.name.clone()))?;
    tracing::info!("toolset: {} (from {})", toolset.id, toolset.origin);

    let ws = Workspace::load(&manifest_path, config.build.target_dir.clone())?;
    let defaults = StandardDefaults::new(ws.target_dir());
    let opts = ComposeOptions {
        parallel: config.build.parallel(),
    };

    let composition = compose(&ws, toolset, &defaults, &opts)?;
    Ok((ws, composition))
}
