//! Filesystem query abstractions for dependency injection.
//!
//! Loading, detection, and planning only ever read the filesystem, and they
//! do so through the [`FileSystemOps`] trait so they can be unit-tested
//! against an in-memory tree.  Production code uses [`SystemFileSystemOps`];
//! tests use `MockFileSystemOps`.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Read-only view of the filesystem used by the planning engine.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists (file, directory, or anything else).
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a regular file (following symlinks).
    fn is_file(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Read a UTF-8 text file.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)
            .with_context(|| format!("reading directory {}", path.display()))?
            .map(|e| e.map(|entry| entry.path()).map_err(Into::into))
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Recursively list every regular file under `root`.
///
/// Paths are returned in depth-first order with siblings sorted by name, so
/// the result is stable across runs and platforms.  Directories themselves
/// are not listed.
///
/// # Errors
///
/// Returns an error if any directory in the tree cannot be read.
pub fn list_files_recursive(fs: &dyn FileSystemOps, root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    walk(fs, root, &mut out)?;
    Ok(out)
}

fn walk(fs: &dyn FileSystemOps, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs.read_dir(dir)? {
        if fs.is_dir(&entry) {
            walk(fs, &entry, out)?;
        } else if fs.is_file(&entry) {
            out.push(entry);
        }
    }
    Ok(())
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Files carry their text content; registering a file or directory also
/// registers every ancestor directory, so `read_dir` sees a consistent tree.
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_file("/payload/platforms/opencode/manifest.json", "{}")
///     .with_dir("/ws/.claude");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: std::collections::BTreeMap<PathBuf, String>,
    dirs: std::collections::BTreeSet<PathBuf>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a regular file with `content`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        let p = path.into();
        if let Some(parent) = p.parent() {
            self.add_dir_chain(parent);
        }
        self.files.insert(p, content.to_string());
        self
    }

    /// Register a directory (and its ancestors).
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        self.add_dir_chain(&p);
        self
    }

    fn add_dir_chain(&mut self, dir: &Path) {
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.dirs.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !self.dirs.contains(path) {
            anyhow::bail!("mock: no such directory {}", path.display());
        }
        let mut children: Vec<PathBuf> = self
            .files
            .keys()
            .chain(self.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        children.dedup();
        Ok(children)
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
    }
}
