//! Rigging - build-graph composition for multi-project C++ workspaces
//!
//! This crate identifies the active toolset, decides build policy, injects
//! global options and resolves the projects declared under a root
//! descriptor into a shared build graph. The result is handed to an
//! external compile/link engine as a build plan.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test fixtures for Rigging unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// builds throwaway workspaces on disk.
#[cfg(test)]
pub mod test_support;

pub use builder::BuildPlan;
pub use core::{ProjectName, TargetDescriptor, TargetKind, Toolset, ToolsetId, Workspace};
pub use ops::{compose, compose_workspace, Composition};
pub use resolver::{BuildGraph, ErrorKind, ProjectNode, ResolveError, Resolver};
pub use util::context::GlobalContext;
