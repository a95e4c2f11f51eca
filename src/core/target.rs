//! Target definitions - what each project declares.
//!
//! A target is the leaf declaration handed to the external build engine:
//! a name, a kind, its sources and the projects it requires. Targets have
//! no behaviour of their own beyond validation.

use serde::{Deserialize, Serialize};

use crate::core::ProjectName;
use crate::resolver::ResolveError;

/// The kind of target being declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Executable binary
    #[serde(alias = "bin", alias = "executable")]
    Exe,

    /// Library shared between several targets of the build
    #[serde(alias = "library", alias = "shared-dependency")]
    Lib,

    /// Aggregates other projects, builds nothing itself
    #[serde(alias = "group")]
    Composite,
}

impl TargetKind {
    /// Whether this kind compiles sources of its own.
    pub fn has_sources(&self) -> bool {
        matches!(self, TargetKind::Exe | TargetKind::Lib)
    }

    /// File name of the artifact the external engine will produce.
    ///
    /// Composites produce nothing.
    pub fn artifact_name(&self, name: &str, msvc: bool) -> Option<String> {
        match (self, msvc) {
            (TargetKind::Exe, true) => Some(format!("{}.exe", name)),
            (TargetKind::Exe, false) => Some(name.to_string()),
            (TargetKind::Lib, true) => Some(format!("{}.lib", name)),
            (TargetKind::Lib, false) => Some(format!("lib{}.a", name)),
            (TargetKind::Composite, _) => None,
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TargetKind::Exe => "exe",
            TargetKind::Lib => "lib",
            TargetKind::Composite => "composite",
        };
        f.write_str(s)
    }
}

/// A target declaration: `(name, kind, sources, requires)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TargetDescriptor {
    /// Target name, unique within the owning composite
    pub name: String,

    /// What kind of artifact this is
    pub kind: TargetKind,

    /// Source file patterns, relative to the project directory
    #[serde(default)]
    pub sources: Vec<String>,

    /// Projects this target requires, by name
    #[serde(default)]
    pub requires: Vec<ProjectName>,
}

impl TargetDescriptor {
    /// Create a descriptor with no sources and no requirements.
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        TargetDescriptor {
            name: name.into(),
            kind,
            sources: Vec::new(),
            requires: Vec::new(),
        }
    }

    /// Create an executable target.
    pub fn exe(name: impl Into<String>) -> Self {
        Self::new(name, TargetKind::Exe)
    }

    /// Create a library target.
    pub fn lib(name: impl Into<String>) -> Self {
        Self::new(name, TargetKind::Lib)
    }

    /// Create a composite target.
    pub fn composite(name: impl Into<String>) -> Self {
        Self::new(name, TargetKind::Composite)
    }

    /// Set the source patterns.
    pub fn with_sources(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sources = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a required project.
    pub fn requiring(mut self, project: ProjectName) -> Self {
        self.requires.push(project);
        self
    }

    /// Check the declaration on its own, before anything is resolved.
    ///
    /// `node` is the project that owns the declaration and is only used for
    /// error reporting.
    pub fn validate(&self, node: &ProjectName) -> Result<(), ResolveError> {
        let invalid = |message: String| ResolveError::InvalidTarget {
            node: node.to_string(),
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("target name is empty".to_string()));
        }

        match self.kind {
            TargetKind::Exe | TargetKind::Lib if self.sources.is_empty() => Err(invalid(
                format!("{} target `{}` has no sources", self.kind, self.name),
            )),
            TargetKind::Composite if !self.sources.is_empty() => Err(invalid(format!(
                "composite target `{}` cannot have sources",
                self.name
            ))),
            TargetKind::Composite if self.requires.is_empty() => Err(invalid(format!(
                "composite target `{}` has no members",
                self.name
            ))),
            _ => Ok(()),
        }
    }

    /// Required projects with repeats removed, first occurrence kept.
    ///
    /// Requiring a project twice is idempotent for executables and libraries.
    pub fn unique_requires(&self) -> Vec<ProjectName> {
        let mut seen = std::collections::HashSet::new();
        self.requires
            .iter()
            .filter(|name| seen.insert(*name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ProjectName {
        ProjectName::new(s).unwrap()
    }

    #[test]
    fn test_executable_needs_sources() {
        let target = TargetDescriptor::exe("v1_app");
        let err = target.validate(&name("v1")).unwrap_err();
        assert!(err.to_string().contains("has no sources"));
        assert_eq!(err.offending_node(), Some("v1"));

        let target = target.with_sources(["main.cpp"]);
        assert!(target.validate(&name("v1")).is_ok());
    }

    #[test]
    fn test_composite_rules() {
        let with_sources = TargetDescriptor::composite("all")
            .with_sources(["main.cpp"])
            .requiring(name("v1"));
        assert!(with_sources.validate(&name("all")).is_err());

        let empty = TargetDescriptor::composite("all");
        assert!(empty.validate(&name("all")).is_err());

        let ok = TargetDescriptor::composite("all").requiring(name("v1"));
        assert!(ok.validate(&name("all")).is_ok());
    }

    #[test]
    fn test_unique_requires_keeps_first_occurrence() {
        let target = TargetDescriptor::exe("app")
            .with_sources(["main.cpp"])
            .requiring(name("so_5"))
            .requiring(name("util"))
            .requiring(name("./so_5"));

        assert_eq!(target.unique_requires(), vec![name("so_5"), name("util")]);
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(
            TargetKind::Exe.artifact_name("v1_app", false).as_deref(),
            Some("v1_app")
        );
        assert_eq!(
            TargetKind::Exe.artifact_name("v1_app", true).as_deref(),
            Some("v1_app.exe")
        );
        assert_eq!(
            TargetKind::Lib.artifact_name("so_5", false).as_deref(),
            Some("libso_5.a")
        );
        assert_eq!(TargetKind::Composite.artifact_name("all", false), None);
    }

    #[test]
    fn test_kind_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: TargetKind,
        }
        let w: Wrapper = toml::from_str("kind = \"shared-dependency\"").unwrap();
        assert_eq!(w.kind, TargetKind::Lib);
        let w: Wrapper = toml::from_str("kind = \"executable\"").unwrap();
        assert_eq!(w.kind, TargetKind::Exe);
    }
}
