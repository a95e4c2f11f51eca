//! User-facing diagnostic messages.
//!
//! Every fatal error is reported with the offending node, the context that
//! led to it, and what the operator can change before rerunning.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages.
pub mod suggestions {
    /// No root descriptor was found.
    pub const NO_ROOT: &str = "Create a `Rigging.toml` with a [root] table listing your projects";

    /// The toolset could not be identified.
    pub const SET_TOOLSET: &str =
        "Set RIGGING_TOOLSET (gcc, clang, msvc, ...) or CC, or add [toolset] name to .rigging/config.toml";

    /// Show which projects were discovered.
    pub const LIST_PROJECTS: &str = "Run `rigging tree --discovered` to list the projects found under the root";
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related file
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let prefix = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };

        let mut output = format!("{}: {}\n", prefix, self.message);

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  → {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("could not find project `so_5`")
            .with_location("v1/Project.toml")
            .with_context("required by `v1`")
            .with_suggestion("Create `so_5/Project.toml`")
            .with_suggestion(suggestions::LIST_PROJECTS);

        let output = diag.format(false);
        assert!(output.starts_with("error: could not find project `so_5`"));
        assert!(output.contains("--> v1/Project.toml"));
        assert!(output.contains("required by `v1`"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("2. Run `rigging tree --discovered`"));
    }

    #[test]
    fn test_error_without_suggestions() {
        let output = Diagnostic::error("no projects declared").format(false);
        assert_eq!(output, "error: no projects declared\n");
    }
}
