//! Project names - stable keys for the descriptor registry.
//!
//! A project is identified by the path of its directory relative to the
//! workspace root, always written with `/` separators (`v1`, `libs/so_5`).
//! Names are normalized on construction so that `./so_5/`, `so_5` and
//! `so_5\` all refer to the same project.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Normalized name of a project node.
///
/// Cloning is cheap (shared string), and ordering is lexical so that
/// collections keyed by name iterate deterministically.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectName(Arc<str>);

/// Error returned when a string cannot be used as a project name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidName {
    #[error("project name is empty")]
    Empty,

    #[error("project name `{0}` escapes the workspace root")]
    EscapesRoot(String),
}

impl ProjectName {
    /// Normalize and validate a project name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidName> {
        let raw = raw.as_ref();
        let unified = raw.trim().replace('\\', "/");

        let mut parts = Vec::new();
        for part in unified.split('/') {
            match part {
                "" | "." => continue,
                ".." => return Err(InvalidName::EscapesRoot(raw.to_string())),
                other => parts.push(other),
            }
        }

        if parts.is_empty() {
            return Err(InvalidName::Empty);
        }

        Ok(ProjectName(Arc::from(parts.join("/"))))
    }

    /// Build a name from a directory path relative to the workspace root.
    pub fn from_relative_dir(dir: &Path) -> Result<Self, InvalidName> {
        let mut parts = Vec::new();
        for component in dir.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return Err(InvalidName::EscapesRoot(dir.display().to_string())),
            }
        }
        Self::new(parts.join("/"))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The project directory, relative to the workspace root.
    pub fn relative_dir(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl fmt::Debug for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProjectName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for ProjectName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProjectName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ProjectName::new(&raw).map_err(serde::de::Error::custom)
    }
}
