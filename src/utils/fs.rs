//! File system utilities for the update engine
//!
//! Small, synchronous helpers used by the directory normalizer and the
//! file-backed store. All values handled here are small (flag files, one
//! extracted plugin tree), so blocking calls are fine even when invoked
//! from async contexts.
//!
//! # Key Features
//!
//! - **Atomic writes**: store contents are written via temp-file-then-rename
//!   so readers never observe a partial document
//! - **Recursive copy**: the fallback path when a cross-device or
//!   permission-denied rename prevents moving an extracted directory
//! - **Tolerant removal**: cleanup helpers that treat "already gone" as
//!   success

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Creates a directory and all of its parents if they don't exist.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// The content lands in a uniquely named temporary file in the target's
/// directory, is synced to disk, and is then renamed over the target path.
/// Readers never see a partially written file. Parent directories are
/// created automatically.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    temp.write_all(content)
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    temp.as_file().sync_all().context("Failed to sync file to disk")?;

    temp.persist(path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Recursively copies a directory and all its contents to a new location.
///
/// Creates the destination if needed, preserves the directory structure,
/// copies regular files only (symlinks and special files are skipped), and
/// overwrites existing files at the destination.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
        // Skip symlinks and other file types
    }

    Ok(())
}

/// Removes whatever exists at `path` - file or directory tree.
///
/// Safe to call on non-existent paths. Used to clear stale leftovers at a
/// normalization target before renaming over it.
pub fn remove_path(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display())),
        Ok(_) => fs::remove_file(path)
            .with_context(|| format!("Failed to remove file: {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to inspect path: {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent.
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_atomic_write_creates_parents_and_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("sub/store.json");
        atomic_write(&target, b"{}").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"{}");
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("f");
        atomic_write(&target, b"one").unwrap();
        atomic_write(&target, b"two").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"two");
    }

    #[test]
    fn test_copy_dir_recurses() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("a.txt"), b"a").unwrap();
        fs::write(src.join("nested/b.txt"), b"b").unwrap();

        let dst = temp.path().join("dst");
        copy_dir(&src, &dst).unwrap();

        assert_eq!(fs::read(dst.join("a.txt")).unwrap(), b"a");
        assert_eq!(fs::read(dst.join("nested/b.txt")).unwrap(), b"b");
    }

    #[test]
    fn test_remove_path_handles_all_shapes() {
        let temp = TempDir::new().unwrap();

        let file = temp.path().join("file");
        fs::write(&file, b"x").unwrap();
        remove_path(&file).unwrap();
        assert!(!file.exists());

        let dir = temp.path().join("dir");
        fs::create_dir_all(dir.join("inner")).unwrap();
        remove_path(&dir).unwrap();
        assert!(!dir.exists());

        // Missing path is not an error.
        remove_path(&temp.path().join("absent")).unwrap();
    }
}
