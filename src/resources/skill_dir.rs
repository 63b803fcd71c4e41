//! Skill payload directory resource.
use anyhow::Result;
use std::path::PathBuf;

use super::fs::{copy_dir_recursive, ensure_parent_dir, remove_existing_dir};
use super::{Applicable, ResourceChange};

/// A copy of the skill payload at one destination.
///
/// The destination is never compared file-by-file; whether an existing
/// directory is replaced or merged into is decided when planning.
#[derive(Debug, Clone)]
pub struct SkillDirResource {
    /// Payload directory to copy from.
    pub source: PathBuf,
    /// Destination skill directory.
    pub dest: PathBuf,
    /// Remove an existing destination before copying.
    pub replace_existing: bool,
}

impl SkillDirResource {
    /// Create a new skill directory resource.
    #[must_use]
    pub const fn new(source: PathBuf, dest: PathBuf, replace_existing: bool) -> Self {
        Self {
            source,
            dest,
            replace_existing,
        }
    }
}

impl Applicable for SkillDirResource {
    fn description(&self) -> String {
        self.dest.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.replace_existing {
            remove_existing_dir(&self.dest)?;
        }
        ensure_parent_dir(&self.dest)?;
        copy_dir_recursive(&self.source, &self.dest)?;
        Ok(ResourceChange::Applied)
    }
}
