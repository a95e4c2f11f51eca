//! Configuration file support for Rigging.
//!
//! Rigging reads two configuration files:
//! - Global: `~/.rigging/config.toml` - User-wide defaults
//! - Project: `.rigging/config.toml` - Workspace-specific overrides
//!
//! Project config takes precedence over global config. Neither file is
//! required.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the per-user and per-workspace config directory.
pub const CONFIG_DIR: &str = ".rigging";

/// Rigging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Toolset selection
    pub toolset: ToolsetConfig,

    /// Build settings
    pub build: BuildConfig,
}

/// Toolset settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsetConfig {
    /// Toolset to use when `RIGGING_TOOLSET` is not set (gcc, clang, msvc, ...)
    pub name: Option<String>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfig {
    /// Target directory, relative to the workspace root
    pub target_dir: Option<PathBuf>,

    /// Require top-level projects concurrently (default: true)
    pub parallel: Option<bool>,

    /// Print only the summary lines of `rigging resolve` (default: false)
    pub brief: Option<bool>,
}

impl BuildConfig {
    pub fn parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    pub fn brief(&self) -> bool {
        self.brief.unwrap_or(false)
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or
    /// unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.toolset.name.is_some() {
            self.toolset.name = other.toolset.name;
        }
        if other.build.target_dir.is_some() {
            self.build.target_dir = other.build.target_dir;
        }
        if other.build.parallel.is_some() {
            self.build.parallel = other.build.parallel;
        }
        if other.build.brief.is_some() {
            self.build.brief = other.build.brief;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.rigging/config.toml)
/// 2. Global config (~/.rigging/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }
    config.merge(Config::load_or_default(project_path));

    config
}

/// The global rigging directory (~/.rigging).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// The project config path (.rigging/config.toml).
pub fn project_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(CONFIG_DIR).join("config.toml")
}
