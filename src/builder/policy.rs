//! Toolset option policy and the invocation-scoped global option list.
//!
//! Only GCC and Clang receive special handling. Every other toolset falls
//! through with no options and no error: some toolchains simply need
//! nothing extra.

use std::sync::Arc;

use crate::core::options::{BuildOption, OptionSet};
use crate::core::toolset::ToolsetId;

/// Global options for a toolset.
pub fn options_for(toolset: &ToolsetId) -> OptionSet {
    match toolset {
        ToolsetId::Gcc | ToolsetId::Clang => [
            BuildOption::linker("-pthread"),
            BuildOption::linker("-static-libstdc++"),
            BuildOption::linker("-Wl,-rpath='$ORIGIN'"),
        ]
        .into_iter()
        .collect(),
        ToolsetId::Msvc | ToolsetId::Other(_) => OptionSet::new(),
    }
}

/// Accumulates the global options of one invocation.
///
/// Options are appended while the root is evaluated and frozen before the
/// first project node is materialized; every node then shares the frozen
/// set.
#[derive(Debug, Default)]
pub struct GlobalOptions {
    options: OptionSet,
}

impl GlobalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append options declared by the root descriptor.
    pub fn inject(&mut self, options: OptionSet) {
        self.options.extend(options);
    }

    /// Append the policy options for `toolset`.
    pub fn inject_toolset(&mut self, toolset: &ToolsetId) {
        let options = options_for(toolset);
        if options.is_empty() {
            tracing::debug!("no global options for toolset `{}`", toolset);
        }
        self.options.extend(options);
    }

    /// Finish accumulation.
    pub fn freeze(self) -> Arc<OptionSet> {
        Arc::new(self.options)
    }
}
