//! Build policy and plan lowering.
//!
//! Everything between the resolved project graph and the external
//! compile/link engine: the toolset option table, the override switch and
//! the serialized build plan.

pub mod override_resolver;
pub mod plan;
pub mod policy;

pub use override_resolver::{
    DefaultPolicy, OverrideResolver, PlacementPolicy, ResolvedPolicy, RuntimeMode,
    RuntimeModePolicy, StandardDefaults,
};
pub use plan::{BuildPlan, BuildUnit};
pub use policy::{options_for, GlobalOptions};
