//! Runtime-mode and object-placement policy.
//!
//! A local override descriptor (`local-build.toml` in the workspace root)
//! switches policy ownership wholesale: when it exists, runtime mode and
//! object placement are both delegated to it and the defaults are never
//! consulted. When it does not exist, both defaults apply. The two are never
//! mixed.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::resolver::ResolveError;

/// File name of the local override descriptor.
pub const OVERRIDE_DESCRIPTOR: &str = "local-build.toml";

/// Optimized vs debug build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Release,
    Debug,
}

impl RuntimeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeMode::Release => "release",
            RuntimeMode::Debug => "debug",
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who decides the runtime mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", content = "mode", rename_all = "kebab-case")]
pub enum RuntimeModePolicy {
    Fixed(RuntimeMode),
    OverrideDefined,
}

/// Where object files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum PlacementPolicy {
    /// `<root>/<runtime mode>/<project>/...`
    RuntimeSubdir { root: PathBuf },
    OverrideDefined,
}

/// The default policy actions, applied only when no override exists.
pub trait DefaultPolicy {
    /// Default runtime mode.
    fn runtime_mode(&self) -> RuntimeModePolicy;

    /// Default object placement.
    fn placement(&self) -> PlacementPolicy;
}

/// Production defaults: release mode, objects grouped by runtime mode
/// under the target directory.
#[derive(Debug, Clone)]
pub struct StandardDefaults {
    target_dir: PathBuf,
}

impl StandardDefaults {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        StandardDefaults {
            target_dir: target_dir.into(),
        }
    }
}

impl DefaultPolicy for StandardDefaults {
    fn runtime_mode(&self) -> RuntimeModePolicy {
        RuntimeModePolicy::Fixed(RuntimeMode::Release)
    }

    fn placement(&self) -> PlacementPolicy {
        PlacementPolicy::RuntimeSubdir {
            root: self.target_dir.clone(),
        }
    }
}

/// A found override descriptor. Its content is not interpreted during
/// resolution; it is carried through to the build plan as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalOverride {
    pub path: PathBuf,
    pub settings: toml::Table,
}

impl LocalOverride {
    /// Runtime mode hint for the external engine (`runtime-mode = "debug"`).
    ///
    /// Anything other than `"debug"` means release.
    pub fn runtime_mode_hint(&self) -> RuntimeMode {
        match self.settings.get("runtime-mode").and_then(|v| v.as_str()) {
            Some("debug") => RuntimeMode::Debug,
            _ => RuntimeMode::Release,
        }
    }
}

/// Policy decided once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPolicy {
    pub runtime_mode: RuntimeModePolicy,
    pub placement: PlacementPolicy,
    #[serde(rename = "override")]
    pub local_override: Option<LocalOverride>,
}

impl ResolvedPolicy {
    /// Whether policy was delegated to an override descriptor.
    pub fn is_overridden(&self) -> bool {
        self.local_override.is_some()
    }

    /// Reject a policy where override and defaults both claim authority.
    pub fn validate(&self) -> Result<(), ResolveError> {
        let runtime_overridden = self.runtime_mode == RuntimeModePolicy::OverrideDefined;
        let placement_overridden = self.placement == PlacementPolicy::OverrideDefined;
        let overridden = self.is_overridden();

        if runtime_overridden != overridden || placement_overridden != overridden {
            return Err(ResolveError::PolicyAmbiguity {
                message: format!(
                    "override present: {}, runtime mode: {:?}, placement: {:?}",
                    overridden, self.runtime_mode, self.placement
                ),
            });
        }
        Ok(())
    }

    /// Runtime mode the external engine should build with.
    pub fn effective_runtime_mode(&self) -> RuntimeMode {
        match (&self.runtime_mode, &self.local_override) {
            (RuntimeModePolicy::Fixed(mode), _) => *mode,
            (RuntimeModePolicy::OverrideDefined, Some(o)) => o.runtime_mode_hint(),
            (RuntimeModePolicy::OverrideDefined, None) => RuntimeMode::Release,
        }
    }
}

/// Checks for the override descriptor and decides policy.
#[derive(Debug, Clone)]
pub struct OverrideResolver {
    descriptor: PathBuf,
}

impl OverrideResolver {
    /// Resolver looking for `local-build.toml` in `root`.
    pub fn new(root: &Path) -> Self {
        OverrideResolver {
            descriptor: root.join(OVERRIDE_DESCRIPTOR),
        }
    }

    /// Path of the override descriptor this resolver checks.
    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor
    }

    /// Decide runtime mode and placement.
    ///
    /// `defaults` is consulted only when no override descriptor exists.
    pub fn resolve(&self, defaults: &dyn DefaultPolicy) -> Result<ResolvedPolicy, ResolveError> {
        let policy = if self.descriptor.is_file() {
            tracing::info!("using local override {}", self.descriptor.display());
            ResolvedPolicy {
                runtime_mode: RuntimeModePolicy::OverrideDefined,
                placement: PlacementPolicy::OverrideDefined,
                local_override: Some(self.load()?),
            }
        } else {
            ResolvedPolicy {
                runtime_mode: defaults.runtime_mode(),
                placement: defaults.placement(),
                local_override: None,
            }
        };

        policy.validate()?;
        Ok(policy)
    }

    fn load(&self) -> Result<LocalOverride, ResolveError> {
        let malformed = |message: String| ResolveError::MalformedDescriptor {
            path: self.descriptor.clone(),
            message,
        };

        let contents = std::fs::read_to_string(&self.descriptor)
            .map_err(|e| malformed(format!("failed to read: {}", e)))?;
        let settings = contents
            .parse::<toml::Table>()
            .map_err(|e| malformed(e.message().to_string()))?;

        Ok(LocalOverride {
            path: self.descriptor.clone(),
            settings,
        })
    }
}
