//! Filesystem utilities.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Expand glob patterns relative to `base` into a sorted list of files.
///
/// Directories are skipped. A pattern that matches nothing contributes
/// nothing.
pub fn glob_files(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full_pattern = base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in glob(&pattern_str)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        results.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// `path` relative to `base` when it lies beneath it, otherwise unchanged.
pub fn relative_to(base: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("src/nested.cpp")).unwrap();
        std::fs::write(tmp.path().join("src/b.cpp"), "").unwrap();
        std::fs::write(tmp.path().join("src/a.cpp"), "").unwrap();
        std::fs::write(tmp.path().join("src/a.hpp"), "").unwrap();

        let files = glob_files(
            tmp.path(),
            &["src/*.cpp".to_string(), "src/a.cpp".to_string()],
        )
        .unwrap();

        assert_eq!(
            files,
            vec![tmp.path().join("src/a.cpp"), tmp.path().join("src/b.cpp")]
        );
    }

    #[test]
    fn test_glob_no_match_is_empty() {
        let tmp = TempDir::new().unwrap();
        let files = glob_files(tmp.path(), &["*.cpp".to_string()]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_relative_to() {
        let base = Path::new("/ws");
        assert_eq!(relative_to(base, Path::new("/ws/v1/main.cpp")), PathBuf::from("v1/main.cpp"));
        assert_eq!(relative_to(base, Path::new("/other")), PathBuf::from("/other"));
    }
}
