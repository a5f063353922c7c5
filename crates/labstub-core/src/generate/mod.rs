//! Stub file generation.
//!
//! Output files are always rewritten whole. Nothing from a previous version
//! is preserved, which is why every file opens with the banner below.

pub mod actions;
pub mod assistants;
pub mod call;

use std::path::Path;

use tracing::{error, info};

use crate::errors::{LabstubError, LabstubResult};

pub const BANNER: [&str; 2] = [
    "# GENERATED FILE: DO NOT EDIT BY HAND",
    "# REGEN USING labstub",
];

/// The two banner lines, newline terminated.
pub fn banner() -> String {
    let mut out = String::new();
    for line in BANNER {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Overwrite `path` with `content`, creating parent directories.
pub fn write_stub_file(path: &Path, content: &str) -> LabstubResult<()> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    };
    match write() {
        Ok(()) => {
            info!(path = %path.display(), bytes = content.len(), "wrote stub file");
            Ok(())
        }
        Err(source) => {
            error!(path = %path.display(), %source, "failed to write stub file");
            Err(LabstubError::Write {
                path: path.to_string_lossy().to_string(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_is_first_two_lines() {
        let text = banner();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, BANNER.to_vec());
    }

    #[test]
    fn test_write_stub_file_overwrites_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow/stubs.py");
        write_stub_file(&path, "first\n").unwrap();
        write_stub_file(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_write_stub_file_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "file, not a directory").unwrap();
        let err = write_stub_file(&blocker.join("stubs.py"), "x").unwrap_err();
        assert_eq!(err.kind(), "write");
    }
}
