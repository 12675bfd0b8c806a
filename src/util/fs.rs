//! Filesystem utilities.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file, with nice error messages.
pub fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))
}

/// Create (or truncate) a file for buffered writing, creating parent
/// directories if needed.
pub fn create_buffered(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Flush a buffered file and make sure its contents reach the disk.
pub fn finish_buffered(writer: BufWriter<File>, path: &Path) -> Result<()> {
    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("failed to flush file: {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to close file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/BUILD");

        write_string(&path, "content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_buffered_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pkg/BUILD");

        let mut writer = create_buffered(&path).unwrap();
        writer.write_all(b"first\nsecond\n").unwrap();
        finish_buffered(writer, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        let mut writer = create_buffered(&path).unwrap();
        writer.write_all(b"third\n").unwrap();
        finish_buffered(writer, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "third\n");
    }

    #[test]
    fn test_read_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = read(&tmp.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
