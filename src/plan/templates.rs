//! Read-only planning of adapter template files.
use anyhow::Result;
use std::path::{Component, Path, PathBuf};

use super::InstallScope;
use crate::manifest::PlatformRegistry;
use crate::operations::{FileSystemOps, list_files_recursive};

/// Decides whether a template file is projected for the current install.
pub trait TemplateFilter: std::fmt::Debug {
    /// `true` if the file at `rel_path` (`/`-separated) should be planned.
    fn includes(&self, rel_path: &str) -> bool;
}

/// Scope-aware filter: personal installs never write workspace-only
/// `.github/` files into the home directory.
#[derive(Debug, Clone, Copy)]
pub struct ScopeFilter {
    scope: InstallScope,
}

impl ScopeFilter {
    /// Filter for `scope`.
    #[must_use]
    pub const fn new(scope: InstallScope) -> Self {
        Self { scope }
    }
}

impl TemplateFilter for ScopeFilter {
    fn includes(&self, rel_path: &str) -> bool {
        match self.scope {
            InstallScope::Repo => true,
            InstallScope::Personal => rel_path.split('/').next() != Some(".github"),
        }
    }
}

/// One template file and what will happen to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    rel_path: String,
    source: PathBuf,
    destination: PathBuf,
    already_exists: bool,
    will_write: bool,
}

impl TemplateEntry {
    /// Classify one file; it is written when absent or when `force` is set.
    #[must_use]
    pub const fn new(
        rel_path: String,
        source: PathBuf,
        destination: PathBuf,
        already_exists: bool,
        force: bool,
    ) -> Self {
        Self {
            rel_path,
            source,
            destination,
            already_exists,
            will_write: !already_exists || force,
        }
    }

    /// Path relative to the template root, `/`-separated.
    #[must_use]
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    /// File inside the payload.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Where the file lands.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// `true` if the destination existed at planning time.
    #[must_use]
    pub const fn already_exists(&self) -> bool {
        self.already_exists
    }

    /// `true` if execution will write this file.
    #[must_use]
    pub const fn will_write(&self) -> bool {
        self.will_write
    }
}

/// All template entries for one selected platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePlan {
    /// Platform the templates belong to.
    pub platform_id: String,
    /// Source tree inside the payload.
    pub templates_dir: PathBuf,
    /// Directory the tree is mirrored into.
    pub target_root: PathBuf,
    /// Files in walk order.
    pub entries: Vec<TemplateEntry>,
}

impl TemplatePlan {
    /// Entries that will be written.
    pub fn writes(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.iter().filter(|e| e.will_write)
    }

    /// Number of entries that will be skipped because they exist.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.will_write).count()
    }
}

/// Inputs to [`plan_templates`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateRequest<'a> {
    /// Skill payload root (holds `platforms/`).
    pub payload_root: &'a Path,
    /// Loaded adapters.
    pub registry: &'a PlatformRegistry,
    /// Directory templates are mirrored into.
    pub target_root: &'a Path,
    /// Selected platform ids, in selection order.
    pub selected: &'a [String],
    /// Overwrite existing files.
    pub force: bool,
}

/// Plan template writes for every selected platform that ships a
/// `templates/` directory.
///
/// Only queries the filesystem; nothing is created or modified.
///
/// # Errors
///
/// Returns an error if a template directory cannot be listed.
pub fn plan_templates(
    request: &TemplateRequest<'_>,
    filter: &dyn TemplateFilter,
    fs: &dyn FileSystemOps,
) -> Result<Vec<TemplatePlan>> {
    let mut plans = Vec::new();
    for platform_id in request.selected {
        let templates_dir = request.registry.get(platform_id).map_or_else(
            || {
                request
                    .payload_root
                    .join("platforms")
                    .join(platform_id)
                    .join("templates")
            },
            crate::manifest::Platform::templates_dir,
        );
        if !fs.is_dir(&templates_dir) {
            continue;
        }

        let mut entries = Vec::new();
        for source in list_files_recursive(fs, &templates_dir)? {
            let Some(rel_path) = relative_slash_path(&source, &templates_dir) else {
                continue;
            };
            if !filter.includes(&rel_path) {
                continue;
            }
            let destination = request.target_root.join(&rel_path);
            let exists = fs.exists(&destination);
            entries.push(TemplateEntry::new(
                rel_path,
                source,
                destination,
                exists,
                request.force,
            ));
        }

        plans.push(TemplatePlan {
            platform_id: platform_id.clone(),
            templates_dir,
            target_root: request.target_root.to_path_buf(),
            entries,
        });
    }
    Ok(plans)
}

fn relative_slash_path(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}
