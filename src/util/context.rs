//! Global context for Rigging operations.
//!
//! Provides centralized access to configuration, paths, and output settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::{find_root_manifest, RootNotFound};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Rigging data (~/.rigging/)
    home: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            home: config::global_config_dir(),
            verbose: false,
            color: true,
        }
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Rigging home directory (~/.rigging/), if a home directory
    /// could be determined.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join("config.toml"))
    }

    /// Get the project configuration file path for a workspace root.
    pub fn project_config_path(&self, workspace_root: &Path) -> PathBuf {
        config::project_config_path(workspace_root)
    }

    /// Load merged global and project configuration.
    pub fn load_config(&self, workspace_root: &Path) -> Config {
        config::load_config(
            self.config_path().as_deref(),
            &self.project_config_path(workspace_root),
        )
    }

    /// Find the root descriptor, searching upward from cwd.
    pub fn find_manifest(&self) -> Result<PathBuf, RootNotFound> {
        find_root_manifest(&self.cwd)
    }

    /// The root descriptor to use: `explicit` made absolute against cwd, or
    /// the result of searching upward.
    pub fn manifest_path(&self, explicit: Option<&Path>) -> Result<PathBuf, RootNotFound> {
        match explicit {
            Some(path) if path.is_absolute() => Ok(path.to_path_buf()),
            Some(path) => Ok(self.cwd.join(path)),
            None => self.find_manifest(),
        }
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }
}
