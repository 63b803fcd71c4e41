//! File-system helpers shared by resource `apply()` methods.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove the directory tree at `path`. Does nothing if it does not exist.
///
/// A plain file at `path` is removed as well so a directory can take its
/// place.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing_dir(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    } else {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Recursively copy a directory tree, merging into `dst` if it exists.
///
/// Symlinks within the source tree are *followed*: directory symlinks are
/// recursed into and their contents materialised rather than copying the
/// link itself.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}
