//! Where the skill payload gets installed for a scope and selection.
use std::path::{Path, PathBuf};

use super::InstallScope;
use crate::error::ConfigError;
use crate::workspace::SKILL_ID;

/// Platform id whose skills live under `.claude/` instead of the default tree.
pub const ALTERNATE_FAMILY_ID: &str = "claude-code";

/// `true` for ids that install into the alternate (`.claude`) location.
#[must_use]
pub fn is_alternate_family(platform_id: &str) -> bool {
    platform_id == ALTERNATE_FAMILY_ID
}

/// Skill directory for `scope` under `base` (workspace or home).
#[must_use]
pub fn skill_path(scope: InstallScope, base: &Path, alternate: bool) -> PathBuf {
    let family = match (scope, alternate) {
        (_, true) => ".claude",
        (InstallScope::Repo, false) => ".github",
        (InstallScope::Personal, false) => ".copilot",
    };
    base.join(family).join("skills").join(SKILL_ID)
}

/// Compute the ordered, de-duplicated skill destinations.
///
/// The default destination is included when the selection is empty or
/// contains any non-alternate id; the alternate destination when it
/// contains an alternate id.  The default always comes first, so the
/// result does not depend on selection order.
///
/// # Errors
///
/// Returns [`ConfigError::MissingWorkspaceRoot`] for repo scope without a
/// workspace root.
pub fn compute_skill_destinations(
    scope: InstallScope,
    workspace_root: Option<&Path>,
    home: &Path,
    selected: &[String],
) -> Result<Vec<PathBuf>, ConfigError> {
    let base = match scope {
        InstallScope::Repo => workspace_root.ok_or(ConfigError::MissingWorkspaceRoot)?,
        InstallScope::Personal => home,
    };

    let wants_alternate = selected.iter().any(|id| is_alternate_family(id));
    let wants_default = selected.is_empty() || selected.iter().any(|id| !is_alternate_family(id));

    let mut out: Vec<PathBuf> = Vec::with_capacity(2);
    for (wanted, alternate) in [(wants_default, false), (wants_alternate, true)] {
        let path = skill_path(scope, base, alternate);
        if wanted && !out.contains(&path) {
            out.push(path);
        }
    }
    Ok(out)
}
