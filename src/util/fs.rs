//! Filesystem utilities.

use std::fs;
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

/// Ensure the parent directory of a file exists.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Copy a file verbatim, creating the destination directory if needed.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    ensure_parent(dst)?;
    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("types").join("index.d.ts");

        write_string(&path, "export {};\n").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "export {};\n");
    }

    #[test]
    fn test_copy_file() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("LICENSE");
        let dst = tmp.path().join("pkg").join("LICENSE");
        fs::write(&src, "MIT").unwrap();

        copy_file(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "MIT");
    }

    #[test]
    fn test_read_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = read_to_string(&tmp.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("failed to read file"));
    }

    #[test]
    fn test_ensure_parent_of_bare_name() {
        ensure_parent(Path::new("file.txt")).unwrap();
    }
}
