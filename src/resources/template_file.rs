//! Platform template file resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::fs::ensure_parent_dir;
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// One template file copied from an adapter's `templates/` tree.
#[derive(Debug, Clone)]
pub struct TemplateFileResource {
    /// Template source file.
    pub source: PathBuf,
    /// Destination file.
    pub dest: PathBuf,
}

impl TemplateFileResource {
    /// Create a new template file resource.
    #[must_use]
    pub const fn new(source: PathBuf, dest: PathBuf) -> Self {
        Self { source, dest }
    }
}

impl Applicable for TemplateFileResource {
    fn description(&self) -> String {
        self.dest.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.needs_change()? {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        ensure_parent_dir(&self.dest)?;
        std::fs::copy(&self.source, &self.dest).with_context(|| {
            format!(
                "copying {} to {}",
                self.source.display(),
                self.dest.display()
            )
        })?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for TemplateFileResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.dest.exists() {
            return Ok(ResourceState::Missing);
        }
        if self.dest.is_dir() {
            return Ok(ResourceState::Incorrect {
                current: "directory".to_string(),
            });
        }
        let want = std::fs::read(&self.source)
            .with_context(|| format!("reading {}", self.source.display()))?;
        let have = std::fs::read(&self.dest)
            .with_context(|| format!("reading {}", self.dest.display()))?;
        if want == have {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("{} bytes differ", have.len()),
            })
        }
    }
}
