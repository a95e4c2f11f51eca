//! On-disk descriptor files.
//!
//! - `Rigging.toml` at the workspace root declares the root composite.
//! - `Project.toml` in each project directory declares one target.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::options::{BuildOption, CppStandard, OptionSet};
use crate::core::target::TargetDescriptor;
use crate::core::ProjectName;
use crate::resolver::ResolveError;

/// File name of the root descriptor.
pub const ROOT_DESCRIPTOR: &str = "Rigging.toml";

/// File name of a project descriptor.
pub const PROJECT_DESCRIPTOR: &str = "Project.toml";

/// What a file in a project directory declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFile<'a> {
    /// `Project.toml`: the directory's own project.
    Primary,
    /// `Project.<variant>.toml`: a further project in the same directory,
    /// registered as `<dir>/<variant>`.
    Variant(&'a str),
}

impl<'a> DescriptorFile<'a> {
    /// Classify a file name; `None` for anything that is not a descriptor.
    pub fn classify(file_name: &'a str) -> Option<Self> {
        if file_name == PROJECT_DESCRIPTOR {
            return Some(DescriptorFile::Primary);
        }
        let variant = file_name
            .strip_prefix("Project.")?
            .strip_suffix(".toml")?;
        if variant.is_empty() || variant.contains(['/', '\\']) {
            return None;
        }
        Some(DescriptorFile::Variant(variant))
    }
}

/// Parsed `Rigging.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RootManifest {
    pub root: RootSection,
}

/// The `[root]` table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RootSection {
    /// Display name of the root composite (defaults to the directory name)
    #[serde(default)]
    pub name: Option<String>,

    /// C++ standard forced on every unit
    #[serde(default)]
    pub cpp_std: Option<CppStandard>,

    /// Global include paths, relative to the workspace root
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,

    /// Extra global compiler flags
    #[serde(default)]
    pub compiler_flags: Vec<String>,

    /// Extra global linker flags
    #[serde(default)]
    pub linker_flags: Vec<String>,

    /// Top-level projects, in declaration order
    pub projects: Vec<ProjectName>,
}

impl RootSection {
    /// Global options declared by the root, in injection order:
    /// C++ standard, include paths, compiler flags, linker flags.
    pub fn global_options(&self) -> OptionSet {
        let mut set = OptionSet::new();
        if let Some(std) = self.cpp_std {
            set.push(BuildOption::CppStd(std));
        }
        for dir in &self.include_paths {
            set.push(BuildOption::IncludePath(dir.clone()));
        }
        for flag in &self.compiler_flags {
            set.push(BuildOption::compiler(flag));
        }
        for flag in &self.linker_flags {
            set.push(BuildOption::linker(flag));
        }
        set
    }
}

impl RootManifest {
    /// Load and parse a root descriptor.
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        parse_file(path)
    }

    /// Parse a root descriptor from a string.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ResolveError> {
        parse_str(contents, path)
    }
}

/// Parsed `Project.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    pub target: TargetDescriptor,
}

impl ProjectManifest {
    /// Load and parse a project descriptor.
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        parse_file(path)
    }
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ResolveError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ResolveError::MalformedDescriptor {
        path: path.to_path_buf(),
        message: format!("failed to read: {}", e),
    })?;
    parse_str(&contents, path)
}

fn parse_str<T: serde::de::DeserializeOwned>(contents: &str, path: &Path) -> Result<T, ResolveError> {
    toml::from_str(contents).map_err(|e| ResolveError::MalformedDescriptor {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}
