//! Static check of the descriptor set reachable from the root.
//!
//! Runs before any node is materialized so that a failing invocation
//! produces nothing at all. Reports the first missing name, invalid
//! declaration or cycle found by a depth-first walk in declaration order.

use std::collections::HashMap;

use crate::core::target::TargetKind;
use crate::core::{ProjectName, Registry};
use crate::resolver::ResolveError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Check every project reachable from `projects`.
pub(crate) fn check(
    registry: &Registry,
    root: &str,
    projects: &[ProjectName],
) -> Result<(), ResolveError> {
    let mut checker = Checker {
        registry,
        stack: Vec::new(),
        states: HashMap::new(),
    };
    for project in projects {
        checker.visit(project, root)?;
    }
    Ok(())
}

struct Checker<'a> {
    registry: &'a Registry,
    stack: Vec<ProjectName>,
    states: HashMap<ProjectName, VisitState>,
}

impl Checker<'_> {
    fn visit(&mut self, name: &ProjectName, required_by: &str) -> Result<(), ResolveError> {
        match self.states.get(name) {
            Some(VisitState::Visited) => return Ok(()),
            Some(VisitState::Visiting) => return Err(cycle_error(&self.stack, name)),
            None => {}
        }

        let registry = self.registry;
        let entry = registry
            .get(name)
            .ok_or_else(|| ResolveError::MissingProject {
                name: name.to_string(),
                required_by: required_by.to_string(),
            })?;
        entry.target.validate(name)?;

        let requires = match entry.target.kind {
            TargetKind::Composite => {
                check_unique_members(name, &entry.target.requires)?;
                entry.target.requires.clone()
            }
            TargetKind::Exe | TargetKind::Lib => entry.target.unique_requires(),
        };

        self.states.insert(name.clone(), VisitState::Visiting);
        self.stack.push(name.clone());

        for dep in &requires {
            self.visit(dep, name.as_str())?;
        }

        self.stack.pop();
        self.states.insert(name.clone(), VisitState::Visited);
        Ok(())
    }
}

/// Composite members must be listed once each.
pub(crate) fn check_unique_members(
    scope: impl std::fmt::Display,
    members: &[ProjectName],
) -> Result<(), ResolveError> {
    let mut seen = std::collections::HashSet::new();
    for member in members {
        if !seen.insert(member) {
            return Err(ResolveError::DuplicateName {
                name: member.to_string(),
                scope: scope.to_string(),
            });
        }
    }
    Ok(())
}

/// Build the cycle path `a -> b -> ... -> a` from the current stack.
pub(crate) fn cycle_error(stack: &[ProjectName], repeated: &ProjectName) -> ResolveError {
    let start = stack.iter().position(|n| n == repeated).unwrap_or(0);
    let mut path: Vec<String> = stack[start..].iter().map(ToString::to_string).collect();
    path.push(repeated.to_string());
    ResolveError::Cycle { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::TargetDescriptor;
    use crate::core::ProjectEntry;

    fn name(s: &str) -> ProjectName {
        ProjectName::new(s).unwrap()
    }

    fn exe(registry: &mut Registry, project: &str, requires: &[&str]) {
        let mut target = TargetDescriptor::exe(project).with_sources(["main.cpp"]);
        for r in requires {
            target = target.requiring(name(r));
        }
        registry.insert(name(project), ProjectEntry::new(project, target));
    }

    #[test]
    fn test_two_node_cycle() {
        let mut registry = Registry::new();
        exe(&mut registry, "p1", &["p2"]);
        exe(&mut registry, "p2", &["p1"]);

        let err = check(&registry, "root", &[name("p1")]).unwrap_err();
        match err {
            ResolveError::Cycle { path } => assert_eq!(path, vec!["p1", "p2", "p1"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_cycle() {
        let mut registry = Registry::new();
        exe(&mut registry, "p1", &["p1"]);

        let err = check(&registry, "root", &[name("p1")]).unwrap_err();
        assert_eq!(err.to_string(), "cycle detected: p1 -> p1");
    }

    #[test]
    fn test_cycle_path_starts_at_repeated_node() {
        let mut registry = Registry::new();
        exe(&mut registry, "app", &["a"]);
        exe(&mut registry, "a", &["b"]);
        exe(&mut registry, "b", &["a"]);

        let err = check(&registry, "root", &[name("app")]).unwrap_err();
        assert_eq!(err.to_string(), "cycle detected: a -> b -> a");
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut registry = Registry::new();
        exe(&mut registry, "app", &["left", "right"]);
        exe(&mut registry, "left", &["base"]);
        exe(&mut registry, "right", &["base"]);
        exe(&mut registry, "base", &[]);

        assert!(check(&registry, "root", &[name("app")]).is_ok());
    }

    #[test]
    fn test_missing_reports_requirer() {
        let mut registry = Registry::new();
        exe(&mut registry, "v1", &["so_5"]);

        let err = check(&registry, "samples", &[name("v1")]).unwrap_err();
        match err {
            ResolveError::MissingProject { name, required_by } => {
                assert_eq!(name, "so_5");
                assert_eq!(required_by, "v1");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = check(&registry, "samples", &[name("v9")]).unwrap_err();
        assert!(err.to_string().contains("required by `samples`"));
    }

    #[test]
    fn test_duplicate_composite_member() {
        let mut registry = Registry::new();
        exe(&mut registry, "v1", &[]);
        registry.insert(
            name("group"),
            ProjectEntry::new(
                "group",
                TargetDescriptor::composite("group")
                    .requiring(name("v1"))
                    .requiring(name("v1")),
            ),
        );

        let err = check(&registry, "root", &[name("group")]).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateName { .. }));
    }
}
