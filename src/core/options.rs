//! Global compiler/linker options.
//!
//! An [`OptionSet`] is an ordered list of [`BuildOption`]s. Order is
//! significant: the external driver applies them left to right, so later
//! entries may override earlier ones. This layer never reorders or collapses
//! duplicates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::toolset::ToolsetId;

/// C++ language standard forced on every unit of the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CppStandard {
    #[serde(rename = "c++11", alias = "11", alias = "cpp11")]
    Cpp11,
    #[serde(rename = "c++14", alias = "14", alias = "cpp14")]
    Cpp14,
    #[serde(rename = "c++17", alias = "17", alias = "cpp17")]
    Cpp17,
    #[serde(rename = "c++20", alias = "20", alias = "cpp20")]
    Cpp20,
    #[serde(rename = "c++23", alias = "23", alias = "cpp23")]
    Cpp23,
}

impl CppStandard {
    /// Value for GCC/Clang `-std=`.
    pub fn as_flag_value(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 => "c++11",
            CppStandard::Cpp14 => "c++14",
            CppStandard::Cpp17 => "c++17",
            CppStandard::Cpp20 => "c++20",
            CppStandard::Cpp23 => "c++23",
        }
    }

    /// Value for MSVC `/std:`. MSVC has no C++11 switch and spells C++23 as latest.
    pub fn as_msvc_flag_value(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 | CppStandard::Cpp14 => "c++14",
            CppStandard::Cpp17 => "c++17",
            CppStandard::Cpp20 => "c++20",
            CppStandard::Cpp23 => "c++latest",
        }
    }
}

impl std::str::FromStr for CppStandard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "11" | "c++11" | "cpp11" => Ok(CppStandard::Cpp11),
            "14" | "c++14" | "cpp14" => Ok(CppStandard::Cpp14),
            "17" | "c++17" | "cpp17" => Ok(CppStandard::Cpp17),
            "20" | "c++20" | "cpp20" => Ok(CppStandard::Cpp20),
            "23" | "c++23" | "cpp23" => Ok(CppStandard::Cpp23),
            _ => Err(format!(
                "invalid C++ standard '{}', valid values: c++11, c++14, c++17, c++20, c++23",
                s
            )),
        }
    }
}

/// A single global option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum BuildOption {
    /// Force a C++ standard.
    CppStd(CppStandard),
    /// Add a directory to the include search path (relative to the workspace root).
    IncludePath(PathBuf),
    /// Raw compiler flag, passed through verbatim.
    CompilerFlag(String),
    /// Raw linker flag, passed through verbatim.
    LinkerFlag(String),
}

impl BuildOption {
    /// Shorthand for a raw linker flag.
    pub fn linker(flag: impl Into<String>) -> Self {
        BuildOption::LinkerFlag(flag.into())
    }

    /// Shorthand for a raw compiler flag.
    pub fn compiler(flag: impl Into<String>) -> Self {
        BuildOption::CompilerFlag(flag.into())
    }

    /// Whether this option is consumed at link time.
    pub fn is_linker(&self) -> bool {
        matches!(self, BuildOption::LinkerFlag(_))
    }

    /// Render as a command-line argument for the given toolset.
    ///
    /// Raw flags are returned as written; structured options use the
    /// toolset's spelling (MSVC vs GNU-style drivers).
    pub fn render(&self, toolset: &ToolsetId) -> String {
        let msvc = matches!(toolset, ToolsetId::Msvc);
        match self {
            BuildOption::CppStd(std) if msvc => format!("/std:{}", std.as_msvc_flag_value()),
            BuildOption::CppStd(std) => format!("-std={}", std.as_flag_value()),
            BuildOption::IncludePath(dir) if msvc => format!("/I{}", dir.display()),
            BuildOption::IncludePath(dir) => format!("-I{}", dir.display()),
            BuildOption::CompilerFlag(flag) | BuildOption::LinkerFlag(flag) => flag.clone(),
        }
    }
}

/// Ordered sequence of global options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    options: Vec<BuildOption>,
}

impl OptionSet {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one option at the end.
    pub fn push(&mut self, option: BuildOption) {
        self.options.push(option);
    }

    /// Append every option of `other`, keeping its order.
    pub fn extend(&mut self, other: OptionSet) {
        self.options.extend(other.options);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuildOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Compile-time arguments, rendered for `toolset`, in insertion order.
    pub fn compiler_args(&self, toolset: &ToolsetId) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| !o.is_linker())
            .map(|o| o.render(toolset))
            .collect()
    }

    /// Link-time arguments, in insertion order.
    pub fn linker_args(&self, toolset: &ToolsetId) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.is_linker())
            .map(|o| o.render(toolset))
            .collect()
    }
}

impl FromIterator<BuildOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = BuildOption>>(iter: I) -> Self {
        OptionSet {
            options: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a BuildOption;
    type IntoIter = std::slice::Iter<'a, BuildOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}
