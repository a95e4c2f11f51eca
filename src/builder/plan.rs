//! Build plan generation.
//!
//! A BuildPlan is the hand-off to the external compile/link engine: every
//! decision taken during composition, lowered into plain data. Rigging never
//! runs a compiler itself.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::override_resolver::{PlacementPolicy, ResolvedPolicy, RuntimeMode};
use crate::core::options::OptionSet;
use crate::core::target::TargetKind;
use crate::core::toolset::{Toolset, ToolsetId};
use crate::resolver::{BuildGraph, ProjectNode};
use crate::util::fs::{glob_files, relative_to};
use crate::util::hash::Fingerprint;

/// A complete build plan.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Name of the root composite
    pub root: String,

    /// Active toolset
    pub toolset: Toolset,

    /// Runtime mode and placement decided for this invocation
    pub policy: ResolvedPolicy,

    /// Runtime mode the engine should build with
    pub runtime_mode: RuntimeMode,

    /// Options applied to every unit
    pub globals: GlobalFlags,

    /// Units in dependency order (requirements first)
    pub units: Vec<BuildUnit>,

    /// Units grouped into waves that can build in parallel
    pub waves: Vec<Vec<String>>,

    /// SHA-256 over the plan content, excluding this field
    pub fingerprint: String,
}

/// Global options, structured and rendered for the active toolset.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalFlags {
    pub options: OptionSet,
    pub compiler_args: Vec<String>,
    pub linker_args: Vec<String>,
}

/// One project, ready for the engine.
#[derive(Debug, Clone, Serialize)]
pub struct BuildUnit {
    /// Project name
    pub name: String,

    /// Target name
    pub target: String,

    pub kind: TargetKind,

    /// Project directory, relative to the workspace root
    pub dir: PathBuf,

    /// Expanded source files, relative to the workspace root
    pub sources: Vec<PathBuf>,

    /// Required projects
    pub deps: Vec<String>,

    /// Object directory; absent when placement belongs to an override
    pub obj_dir: Option<PathBuf>,

    /// Artifact file name; absent for composites
    pub artifact: Option<String>,
}

impl BuildPlan {
    /// Lower a resolved graph into a plan.
    ///
    /// Paths in the plan are relative to `workspace_root` so that the plan
    /// and its fingerprint do not depend on where the workspace is checked
    /// out.
    pub fn lower(
        workspace_root: &Path,
        toolset: &Toolset,
        policy: &ResolvedPolicy,
        globals: &OptionSet,
        graph: &BuildGraph,
    ) -> Result<Self> {
        let runtime_mode = policy.effective_runtime_mode();
        let msvc = toolset.id == ToolsetId::Msvc;

        let mut units = Vec::with_capacity(graph.len());
        for name in graph.build_order() {
            let Some(node) = graph.node(name.as_str()) else {
                continue;
            };
            units.push(lower_unit(workspace_root, node, policy, runtime_mode, msvc)?);
        }

        let waves = graph
            .waves()
            .into_iter()
            .map(|wave| wave.iter().map(ToString::to_string).collect())
            .collect();

        let mut plan = BuildPlan {
            root: graph.root().to_string(),
            toolset: toolset.clone(),
            policy: policy.clone(),
            runtime_mode,
            globals: GlobalFlags {
                options: globals.clone(),
                compiler_args: globals.compiler_args(&toolset.id),
                linker_args: globals.linker_args(&toolset.id),
            },
            units,
            waves,
            fingerprint: String::new(),
        };
        plan.fingerprint = plan.compute_fingerprint()?;

        tracing::debug!(
            "lowered {} unit(s) into {} wave(s)",
            plan.units.len(),
            plan.waves.len()
        );
        Ok(plan)
    }

    /// Look up a unit by project name.
    pub fn unit(&self, name: &str) -> Option<&BuildUnit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn compute_fingerprint(&self) -> Result<String> {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.root)
            .update_str(self.toolset.id.as_str())
            .update_str(self.runtime_mode.as_str())
            .update_opt(
                self.policy
                    .local_override
                    .as_ref()
                    .map(|o| o.settings.to_string())
                    .as_deref(),
            )
            .update_strs(self.globals.compiler_args.iter().map(String::as_str))
            .update_strs(self.globals.linker_args.iter().map(String::as_str));

        for unit in &self.units {
            fp.update_str(&serde_json::to_string(unit)?);
        }
        Ok(fp.finish())
    }
}

fn lower_unit(
    workspace_root: &Path,
    node: &ProjectNode,
    policy: &ResolvedPolicy,
    runtime_mode: RuntimeMode,
    msvc: bool,
) -> Result<BuildUnit> {
    let target = node.target();

    let sources: Vec<PathBuf> = glob_files(node.dir(), &target.sources)?
        .iter()
        .map(|path| relative_to(workspace_root, path))
        .collect();
    if target.kind.has_sources() && sources.is_empty() {
        tracing::warn!(
            "no source files of `{}` match {:?}",
            node.name(),
            target.sources
        );
    }

    let obj_dir = match &policy.placement {
        PlacementPolicy::RuntimeSubdir { root } => Some(relative_to(
            workspace_root,
            &root
                .join(runtime_mode.as_str())
                .join(node.name().relative_dir()),
        )),
        PlacementPolicy::OverrideDefined => None,
    };

    Ok(BuildUnit {
        name: node.name().to_string(),
        target: target.name.clone(),
        kind: target.kind,
        dir: relative_to(workspace_root, node.dir()),
        sources,
        deps: node
            .dependencies()
            .iter()
            .map(|dep| dep.name().to_string())
            .collect(),
        obj_dir,
        artifact: target.kind.artifact_name(&target.name, msvc),
    })
}
