//! Install planning: a read-only, previewable description of every write.
//!
//! A plan is computed fresh per invocation from the selection, the scope,
//! and the current filesystem state.  Building it never mutates anything;
//! execution later replays its `will_write` decisions.
pub mod destinations;
pub mod render;
pub mod templates;

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub use destinations::{compute_skill_destinations, is_alternate_family};
pub use render::{PREVIEW_CAP, PlanRenderer};
pub use templates::{
    ScopeFilter, TemplateEntry, TemplateFilter, TemplatePlan, TemplateRequest, plan_templates,
};

use crate::manifest::PlatformRegistry;
use crate::operations::FileSystemOps;

/// Where the skill is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallScope {
    /// Per repository, under the workspace root.
    Repo,
    /// Per user, under the home directory.
    Personal,
}

impl std::fmt::Display for InstallScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo => f.write_str("repo"),
            Self::Personal => f.write_str("personal"),
        }
    }
}

/// One skill destination and whether something is already there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTarget {
    /// Destination directory.
    pub path: PathBuf,
    /// `true` if the path existed at planning time.
    pub already_exists: bool,
}

/// The complete set of planned writes for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// Install scope.
    pub scope: InstallScope,
    /// Workspace root, if one was found or given.
    pub workspace_root: Option<PathBuf>,
    /// Selected platform ids, unique, in selection order.
    pub selected_platforms: Vec<String>,
    /// Skill payload copied into each destination.
    pub payload_dir: PathBuf,
    /// Overwrite existing content.
    pub force: bool,
    /// Skill destinations, unique, default family first.
    pub skills: Vec<SkillTarget>,
    /// Template plans, one per selected platform with templates.
    pub templates: Vec<TemplatePlan>,
}

impl InstallPlan {
    /// First skill destination that already exists, if any.
    #[must_use]
    pub fn first_existing_skill(&self) -> Option<&SkillTarget> {
        self.skills.iter().find(|s| s.already_exists)
    }

    /// Total number of template files that will be written.
    #[must_use]
    pub fn template_write_count(&self) -> usize {
        self.templates.iter().map(|t| t.writes().count()).sum()
    }
}

/// Inputs to [`build_plan`].
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    /// Install scope.
    pub scope: InstallScope,
    /// Workspace root; required for repo scope.
    pub workspace_root: Option<&'a Path>,
    /// User's home directory.
    pub home: &'a Path,
    /// Skill payload root.
    pub payload_dir: &'a Path,
    /// Loaded adapters.
    pub registry: &'a PlatformRegistry,
    /// Selected platform ids.
    pub selected: &'a [String],
    /// Overwrite existing content.
    pub force: bool,
}

/// Build an [`InstallPlan`] without touching the filesystem beyond reads.
///
/// # Errors
///
/// Returns [`ConfigError::MissingWorkspaceRoot`](crate::error::ConfigError)
/// for repo scope without a workspace, or an I/O error if a template
/// directory cannot be listed.
pub fn build_plan(request: &PlanRequest<'_>, fs: &dyn FileSystemOps) -> Result<InstallPlan> {
    let selected = dedupe(request.selected);

    let skills = compute_skill_destinations(
        request.scope,
        request.workspace_root,
        request.home,
        &selected,
    )?
    .into_iter()
    .map(|path| SkillTarget {
        already_exists: fs.exists(&path),
        path,
    })
    .collect();

    let target_root = match request.scope {
        InstallScope::Repo => request.workspace_root.unwrap_or(request.home),
        InstallScope::Personal => request.home,
    };
    let templates = plan_templates(
        &TemplateRequest {
            payload_root: request.payload_dir,
            registry: request.registry,
            target_root,
            selected: &selected,
            force: request.force,
        },
        &ScopeFilter::new(request.scope),
        fs,
    )?;

    Ok(InstallPlan {
        scope: request.scope,
        workspace_root: request.workspace_root.map(Path::to_path_buf),
        selected_platforms: selected,
        payload_dir: request.payload_dir.to_path_buf(),
        force: request.force,
        skills,
        templates,
    })
}

fn dedupe(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}
