//! Filesystem scanning helpers for the adapter stub pass.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

const IMPLICIT_IGNORED_DIRS: &[&str] = &[".git", "__pycache__", ".venv", "venv", ".mypy_cache"];

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| IMPLICIT_IGNORED_DIRS.contains(&name))
            .unwrap_or(false)
}

pub fn is_python_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case("py"))
        .unwrap_or(false)
}

/// All `.py` files under `root`, recursively, in a stable sorted order.
/// A missing root yields an empty list.
pub fn iter_python_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return vec![];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_python_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Path of `path` relative to `root`, with forward slashes.
pub fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_iter_python_files_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pkg/sub")).unwrap();
        fs::create_dir_all(root.join("__pycache__")).unwrap();
        fs::write(root.join("main.py"), "").unwrap();
        fs::write(root.join("pkg/sub/arm.py"), "").unwrap();
        fs::write(root.join("pkg/readme.md"), "").unwrap();
        fs::write(root.join("__pycache__/main.py"), "").unwrap();

        let files: Vec<String> = iter_python_files(root)
            .iter()
            .map(|p| relative_path(p, root))
            .collect();
        assert_eq!(files, vec!["main.py", "pkg/sub/arm.py"]);
    }

    #[test]
    fn test_iter_python_files_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(iter_python_files(&dir.path().join("adapter")).is_empty());
    }

    #[test]
    fn test_is_python_file() {
        assert!(is_python_file(Path::new("a/b.py")));
        assert!(is_python_file(Path::new("B.PY")));
        assert!(!is_python_file(Path::new("b.pyc")));
        assert!(!is_python_file(Path::new("py")));
    }
}
