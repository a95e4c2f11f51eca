//! Toolset identification.
//!
//! The toolset is identified exactly once per invocation, before anything
//! else happens, and never changes afterwards. Identification order:
//!
//! 1. `RIGGING_TOOLSET` environment variable
//! 2. `[toolset] name` from `.rigging/config.toml` / `~/.rigging/config.toml`
//! 3. The `CC` environment variable, by executable name
//! 4. Searching PATH for a known compiler driver
//!
//! Failure to identify a toolset is a configuration error and aborts the
//! invocation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::resolver::ResolveError;

/// Environment variable that names the toolset explicitly.
pub const TOOLSET_ENV: &str = "RIGGING_TOOLSET";

/// Identity of a compiler/linker toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolsetId {
    /// GNU Compiler Collection
    Gcc,
    /// Clang/LLVM (including Apple Clang)
    Clang,
    /// Microsoft Visual C++
    Msvc,
    /// Any other toolchain, by name. Receives no special handling.
    Other(String),
}

impl ToolsetId {
    /// Parse a toolset name as written by a user (`gcc`, `clang++`, `cl`, ...).
    ///
    /// Returns `None` only for an empty name; unknown names map to
    /// [`ToolsetId::Other`].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let id = match name.as_str() {
            "" => return None,
            "gcc" | "g++" | "gnu" | "cc" | "c++" => ToolsetId::Gcc,
            "clang" | "clang++" | "llvm" | "apple-clang" => ToolsetId::Clang,
            "msvc" | "cl" | "vc" | "visual-studio" => ToolsetId::Msvc,
            _ => ToolsetId::Other(name),
        };
        Some(id)
    }

    /// Infer the toolset family from a compiler driver path such as
    /// `/usr/bin/x86_64-linux-gnu-gcc-12` or `C:\...\cl.exe`.
    pub fn from_compiler_path(path: &Path) -> Option<Self> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if stem.is_empty() {
            None
        } else if stem.contains("clang") {
            Some(ToolsetId::Clang)
        } else if stem.contains("gcc") || stem.contains("g++") {
            Some(ToolsetId::Gcc)
        } else {
            ToolsetId::from_name(&stem)
        }
    }

    /// Get the canonical name.
    pub fn as_str(&self) -> &str {
        match self {
            ToolsetId::Gcc => "gcc",
            ToolsetId::Clang => "clang",
            ToolsetId::Msvc => "msvc",
            ToolsetId::Other(name) => name,
        }
    }
}

impl fmt::Display for ToolsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ToolsetId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ToolsetId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ToolsetId::from_name(&raw).ok_or_else(|| serde::de::Error::custom("empty toolset name"))
    }
}

/// What a toolset's driver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolsetCapabilities {
    /// Accepts GNU-style `-I`/`-std=` spelling.
    pub gnu_driver: bool,
    /// Links POSIX threads through `-pthread`.
    pub pthread: bool,
    /// Supports `$ORIGIN`-relative rpath entries.
    pub rpath: bool,
}

impl ToolsetCapabilities {
    fn for_id(id: &ToolsetId) -> Self {
        match id {
            ToolsetId::Gcc | ToolsetId::Clang => ToolsetCapabilities {
                gnu_driver: true,
                pthread: true,
                rpath: true,
            },
            ToolsetId::Msvc | ToolsetId::Other(_) => ToolsetCapabilities {
                gnu_driver: false,
                pthread: false,
                rpath: false,
            },
        }
    }
}

/// Where the toolset identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolsetOrigin {
    Environment,
    Config,
    CompilerEnv,
    PathSearch,
}

impl fmt::Display for ToolsetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolsetOrigin::Environment => TOOLSET_ENV,
            ToolsetOrigin::Config => "config",
            ToolsetOrigin::CompilerEnv => "CC",
            ToolsetOrigin::PathSearch => "PATH",
        };
        f.write_str(s)
    }
}

/// The active toolset for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolset {
    pub id: ToolsetId,
    pub capabilities: ToolsetCapabilities,
    pub origin: ToolsetOrigin,
}

impl Toolset {
    pub fn new(id: ToolsetId, origin: ToolsetOrigin) -> Self {
        Toolset {
            capabilities: ToolsetCapabilities::for_id(&id),
            id,
            origin,
        }
    }
}

/// Inputs consulted when identifying the toolset.
///
/// Collected up front so that identification itself has no side effects
/// and can be exercised without touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct ToolsetProbe {
    /// Value of `RIGGING_TOOLSET`, if set.
    pub explicit: Option<String>,
    /// `[toolset] name` from configuration.
    pub configured: Option<String>,
    /// Value of `CC`, if set.
    pub cc: Option<PathBuf>,
    /// Whether to fall back to searching PATH.
    pub search_path: bool,
}

impl ToolsetProbe {
    /// Collect probe inputs from the process environment.
    pub fn from_env(configured: Option<String>) -> Self {
        ToolsetProbe {
            explicit: std::env::var(TOOLSET_ENV).ok(),
            configured,
            cc: std::env::var_os("CC").map(PathBuf::from),
            search_path: true,
        }
    }
}

/// Identify the active toolset.
pub fn current_toolset(probe: &ToolsetProbe) -> Result<Toolset, ResolveError> {
    if let Some(explicit) = &probe.explicit {
        return ToolsetId::from_name(explicit)
            .map(|id| Toolset::new(id, ToolsetOrigin::Environment))
            .ok_or_else(|| ResolveError::UnknownToolset {
                reason: format!("{} is set but empty", TOOLSET_ENV),
            });
    }

    if let Some(configured) = &probe.configured {
        return ToolsetId::from_name(configured)
            .map(|id| Toolset::new(id, ToolsetOrigin::Config))
            .ok_or_else(|| ResolveError::UnknownToolset {
                reason: "[toolset] name in config is empty".to_string(),
            });
    }

    if let Some(cc) = &probe.cc {
        return ToolsetId::from_compiler_path(cc)
            .map(|id| Toolset::new(id, ToolsetOrigin::CompilerEnv))
            .ok_or_else(|| ResolveError::UnknownToolset {
                reason: format!("CC=`{}` does not name a compiler", cc.display()),
            });
    }

    if probe.search_path {
        if let Some(id) = search_path() {
            return Ok(Toolset::new(id, ToolsetOrigin::PathSearch));
        }
    }

    Err(ResolveError::UnknownToolset {
        reason: format!(
            "{} and CC are unset, no toolset is configured and no compiler was found on PATH",
            TOOLSET_ENV
        ),
    })
}

#[cfg(target_os = "windows")]
const PATH_CANDIDATES: &[(&str, ToolsetId)] = &[
    ("cl", ToolsetId::Msvc),
    ("clang", ToolsetId::Clang),
    ("gcc", ToolsetId::Gcc),
    ("cc", ToolsetId::Gcc),
];

#[cfg(not(target_os = "windows"))]
const PATH_CANDIDATES: &[(&str, ToolsetId)] = &[
    ("gcc", ToolsetId::Gcc),
    ("clang", ToolsetId::Clang),
    ("cc", ToolsetId::Gcc),
];

fn search_path() -> Option<ToolsetId> {
    PATH_CANDIDATES.iter().find_map(|(program, id)| {
        which::which(program).ok().map(|found| {
            tracing::debug!("found {} on PATH at {}", program, found.display());
            id.clone()
        })
    })
}
