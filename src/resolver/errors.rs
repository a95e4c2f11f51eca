//! Resolution error types and diagnostics.
//!
//! Every error here is fatal: a composition either resolves completely or
//! the invocation aborts. Nothing is downgraded to a warning.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Broad category of a [`ResolveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Toolset unidentifiable, malformed descriptor, contradictory policy.
    Configuration,
    /// Missing required project or duplicate name in a scope.
    Resolution,
    /// A project transitively requires itself.
    Cycle,
}

/// Error raised while composing the build graph.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("could not identify the active toolset: {reason}")]
    #[diagnostic(code(rigging::config::unknown_toolset))]
    UnknownToolset { reason: String },

    #[error("malformed descriptor `{}`: {message}", path.display())]
    #[diagnostic(code(rigging::config::malformed_descriptor))]
    MalformedDescriptor { path: PathBuf, message: String },

    #[error("invalid target in project `{node}`: {message}")]
    #[diagnostic(code(rigging::config::invalid_target))]
    InvalidTarget { node: String, message: String },

    #[error("ambiguous build policy: {message}")]
    #[diagnostic(code(rigging::config::policy_ambiguity))]
    PolicyAmbiguity { message: String },

    #[error("project `{name}` not found (required by `{required_by}`)")]
    #[diagnostic(code(rigging::resolve::missing_project))]
    MissingProject { name: String, required_by: String },

    #[error("duplicate name `{name}` in `{scope}`")]
    #[diagnostic(code(rigging::resolve::duplicate_name))]
    DuplicateName { name: String, scope: String },

    #[error("cycle detected: {}", path.join(" -> "))]
    #[diagnostic(code(rigging::resolve::cycle))]
    Cycle { path: Vec<String> },
}

impl ResolveError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::UnknownToolset { .. }
            | ResolveError::MalformedDescriptor { .. }
            | ResolveError::InvalidTarget { .. }
            | ResolveError::PolicyAmbiguity { .. } => ErrorKind::Configuration,
            ResolveError::MissingProject { .. } | ResolveError::DuplicateName { .. } => {
                ErrorKind::Resolution
            }
            ResolveError::Cycle { .. } => ErrorKind::Cycle,
        }
    }

    /// The node name the error is about, when there is one.
    pub fn offending_node(&self) -> Option<&str> {
        match self {
            ResolveError::InvalidTarget { node, .. } => Some(node),
            ResolveError::MissingProject { name, .. } => Some(name),
            ResolveError::DuplicateName { name, .. } => Some(name),
            ResolveError::Cycle { path } => path.first().map(String::as_str),
            _ => None,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnknownToolset { reason } => {
                Diagnostic::error("could not identify the active toolset")
                    .with_context(reason.clone())
                    .with_suggestion(suggestions::SET_TOOLSET)
                    .with_suggestion("Install a C/C++ compiler (gcc, clang or cl) on PATH")
            }

            ResolveError::MalformedDescriptor { path, message } => {
                Diagnostic::error(format!("could not read descriptor: {}", message))
                    .with_location(path)
                    .with_suggestion("Fix the TOML syntax or remove the file")
            }

            ResolveError::InvalidTarget { node, message } => {
                Diagnostic::error(format!("invalid target in project `{}`", node))
                    .with_context(message.clone())
                    .with_suggestion(format!("Edit `{}/Project.toml`", node))
            }

            ResolveError::PolicyAmbiguity { message } => {
                Diagnostic::error("override and default policy both claim authority")
                    .with_context(message.clone())
            }

            ResolveError::MissingProject { name, required_by } => {
                Diagnostic::error(format!("could not find project `{}`", name))
                    .with_context(format!("required by `{}`", required_by))
                    .with_suggestion(format!(
                        "Create `{}/Project.toml` or fix the name in `{}`",
                        name, required_by
                    ))
                    .with_suggestion(suggestions::LIST_PROJECTS)
            }

            ResolveError::DuplicateName { name, scope } => {
                Diagnostic::error(format!("`{}` is declared more than once", name))
                    .with_context(format!("in `{}`", scope))
                    .with_suggestion("Give every member of a composite a unique name")
            }

            ResolveError::Cycle { path } => {
                Diagnostic::error("cycle detected in project graph")
                    .with_context(format!("cycle: {}", path.join(" -> ")))
                    .with_suggestion(
                        "Break the cycle by removing or restructuring `requires` entries",
                    )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_diagnostic_shows_path() {
        let err = ResolveError::Cycle {
            path: vec!["p1".into(), "p2".into(), "p1".into()],
        };

        assert_eq!(err.kind(), ErrorKind::Cycle);
        assert_eq!(err.offending_node(), Some("p1"));
        assert_eq!(err.to_string(), "cycle detected: p1 -> p2 -> p1");

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("cycle: p1 -> p2 -> p1"));
    }

    #[test]
    fn test_missing_project_names_requirer() {
        let err = ResolveError::MissingProject {
            name: "so_5".into(),
            required_by: "v1".into(),
        };

        assert_eq!(err.kind(), ErrorKind::Resolution);
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("could not find project `so_5`"));
        assert!(output.contains("required by `v1`"));
        assert!(output.contains("help: consider:"));
    }

    #[test]
    fn test_configuration_kinds() {
        let err = ResolveError::PolicyAmbiguity {
            message: "runtime mode from override, placement from defaults".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.offending_node(), None);
    }
}
