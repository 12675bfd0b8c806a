//! Implementation of `gn2bazel markers`.
//!
//! Every directory of the checkout gets a placeholder `BUILD` file that
//! makes it a public package exporting all of its files, so that the
//! `//dir:file` labels produced by `convert` resolve.

use std::path::Path;

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::util::fs;

/// Bazel package marker file name.
pub const MARKER_FILE: &str = "BUILD";

/// Contents of a placeholder package marker.
pub const MARKER_CONTENTS: &str = "package(default_visibility = [\"//visibility:public\"])\n\nexports_files(glob([\"*\"]))\n";

/// Directory names that never get markers.
pub const ALWAYS_SKIPPED: &[&str] = &[".git"];

/// Write a marker into `root` and every directory below it.
///
/// Directories whose name is in `skip` or [`ALWAYS_SKIPPED`] are not entered.
/// Existing `BUILD` files are overwritten. Returns the number of markers
/// written.
pub fn write_markers(root: &Path, skip: &[String]) -> Result<usize> {
    let is_skipped = |entry: &DirEntry| {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry.file_name().to_str().is_some_and(|name| {
                ALWAYS_SKIPPED.contains(&name) || skip.iter().any(|s| s == name)
            })
    };

    let mut written = 0;
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
    {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let marker = entry.path().join(MARKER_FILE);
        fs::write_string(&marker, MARKER_CONTENTS)?;
        tracing::debug!("wrote marker {}", marker.display());
        written += 1;
    }

    tracing::debug!("wrote {} package markers under {}", written, root.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_markers() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("foo/bar")).unwrap();
        std::fs::create_dir_all(root.join("out.gn/x64/gen")).unwrap();
        std::fs::create_dir_all(root.join(".git/objects")).unwrap();
        std::fs::write(root.join("foo/a.cc"), "").unwrap();

        let written = write_markers(root, &["out.gn".to_string()]).unwrap();

        assert_eq!(written, 3);
        for dir in ["", "foo", "foo/bar"] {
            let marker = std::fs::read_to_string(root.join(dir).join(MARKER_FILE)).unwrap();
            assert_eq!(marker, MARKER_CONTENTS);
        }
        assert!(!root.join("out.gn/BUILD").exists());
        assert!(!root.join("out.gn/x64/BUILD").exists());
        assert!(!root.join(".git/BUILD").exists());
    }

    #[test]
    fn test_root_is_never_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("out.gn");
        std::fs::create_dir_all(&root).unwrap();

        let written = write_markers(&root, &["out.gn".to_string()]).unwrap();
        assert_eq!(written, 1);
        assert!(root.join(MARKER_FILE).exists());
    }

    #[test]
    fn test_overwrites_existing_build_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MARKER_FILE), "old").unwrap();

        write_markers(tmp.path(), &[]).unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(MARKER_FILE)).unwrap(),
            MARKER_CONTENTS
        );
    }
}
