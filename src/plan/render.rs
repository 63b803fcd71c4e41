//! Human-readable and JSON rendering of an [`InstallPlan`].
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use super::{InstallPlan, SkillTarget};

/// Maximum number of template paths listed per platform.
pub const PREVIEW_CAP: usize = 30;

/// Renders plans; paths under `home` are shown as `~/...`.
#[derive(Debug, Clone)]
pub struct PlanRenderer {
    home: Option<PathBuf>,
    preview_cap: usize,
}

impl PlanRenderer {
    /// Renderer that abbreviates paths under `home`.
    #[must_use]
    pub fn new(home: Option<PathBuf>) -> Self {
        Self {
            home,
            preview_cap: PREVIEW_CAP,
        }
    }

    /// Override how many template paths are listed per platform.
    #[must_use]
    pub const fn with_preview_cap(mut self, cap: usize) -> Self {
        self.preview_cap = cap;
        self
    }

    /// Format `path`, replacing a leading home directory with `~`.
    #[must_use]
    pub fn fmt_path(&self, path: &Path) -> String {
        match self.home.as_deref().map(|home| path.strip_prefix(home)) {
            Some(Ok(rest)) if rest.as_os_str().is_empty() => "~".to_string(),
            Some(Ok(rest)) => format!("~/{}", rest.display()),
            _ => path.display().to_string(),
        }
    }

    /// Render the plan as text.  Pure: the same plan always yields the same
    /// output.
    #[must_use]
    pub fn render(&self, plan: &InstallPlan, force: bool) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("Selected adapters:".to_string());
        if plan.selected_platforms.is_empty() {
            lines.push("  (none)".to_string());
        } else {
            lines.extend(plan.selected_platforms.iter().map(|id| format!("  - {id}")));
        }
        lines.push(String::new());

        lines.push("Skill install destinations:".to_string());
        for skill in &plan.skills {
            lines.push(format!(
                "  - {}  [{}]",
                self.fmt_path(&skill.path),
                skill_status(skill, force)
            ));
        }
        lines.push(String::new());

        if plan.templates.is_empty() {
            lines.push("Platform templates: (none)".to_string());
            return lines.join("\n");
        }

        lines.push("Platform templates:".to_string());
        for t in &plan.templates {
            let writes = t.writes().count();
            let skipped = t.skipped_count();
            let skipped_note = if skipped > 0 {
                format!(", {skipped} skipped (exists)")
            } else {
                String::new()
            };
            lines.push(format!(
                "  - {}: {writes} file(s) to write{skipped_note}",
                t.platform_id
            ));
            lines.extend(
                t.writes()
                    .take(self.preview_cap)
                    .map(|e| format!("      {}", e.rel_path())),
            );
            if writes > self.preview_cap {
                lines.push("      ...".to_string());
            }
        }

        lines.join("\n")
    }

    /// Render the plan as a JSON document `{"plan": {...}}`.
    #[must_use]
    pub fn render_json(&self, plan: &InstallPlan, force: bool) -> Value {
        let skills: Vec<Value> = plan
            .skills
            .iter()
            .map(|s| {
                json!({
                    "path": s.path,
                    "exists": s.already_exists,
                    "status": skill_status(s, force),
                })
            })
            .collect();
        let templates: Vec<Value> = plan
            .templates
            .iter()
            .map(|t| {
                let files: Vec<Value> = t
                    .entries
                    .iter()
                    .map(|e| {
                        json!({
                            "relPath": e.rel_path(),
                            "destination": e.destination(),
                            "exists": e.already_exists(),
                            "willWrite": e.will_write(),
                        })
                    })
                    .collect();
                json!({
                    "platformId": t.platform_id,
                    "templatesDir": t.templates_dir,
                    "targetRoot": t.target_root,
                    "files": files,
                })
            })
            .collect();

        json!({
            "plan": {
                "scope": plan.scope,
                "workspaceRoot": plan.workspace_root,
                "selectedPlatforms": plan.selected_platforms,
                "payloadDir": plan.payload_dir,
                "force": force,
                "skills": skills,
                "templates": templates,
            }
        })
    }
}

const fn skill_status(skill: &SkillTarget, force: bool) -> &'static str {
    match (skill.already_exists, force) {
        (false, _) => "create",
        (true, true) => "overwrite",
        (true, false) => "overwrite (needs confirmation)",
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::plan::{InstallScope, TemplateEntry, TemplatePlan};

    fn entry(rel: &str, exists: bool) -> TemplateEntry {
        TemplateEntry::new(
            rel.to_string(),
            PathBuf::from(format!("/p/t/{rel}")),
            PathBuf::from(format!("/ws/{rel}")),
            exists,
            false,
        )
    }

    fn plan() -> InstallPlan {
        InstallPlan {
            scope: InstallScope::Repo,
            workspace_root: Some(PathBuf::from("/home/u/src/app")),
            selected_platforms: vec!["vscode-copilot".to_string(), "claude-code".to_string()],
            payload_dir: PathBuf::from("/opt/aps/payload/agnostic-prompt-standard"),
            force: false,
            skills: vec![
                SkillTarget {
                    path: PathBuf::from("/home/u/src/app/.github/skills/agnostic-prompt-standard"),
                    already_exists: false,
                },
                SkillTarget {
                    path: PathBuf::from("/home/u/src/app/.claude/skills/agnostic-prompt-standard"),
                    already_exists: true,
                },
            ],
            templates: vec![TemplatePlan {
                platform_id: "vscode-copilot".to_string(),
                templates_dir: PathBuf::from("/opt/aps/payload/platforms/vscode-copilot/templates"),
                target_root: PathBuf::from("/home/u/src/app"),
                entries: vec![
                    entry(".github/agents/aps.agent.md", false),
                    entry("AGENTS.md", true),
                ],
            }],
        }
    }

    #[test]
    fn renders_full_plan() {
        let r = PlanRenderer::new(Some(PathBuf::from("/home/u")));
        insta::assert_snapshot!(r.render(&plan(), false), @r"
        Selected adapters:
          - vscode-copilot
          - claude-code

        Skill install destinations:
          - ~/src/app/.github/skills/agnostic-prompt-standard  [create]
          - ~/src/app/.claude/skills/agnostic-prompt-standard  [overwrite (needs confirmation)]

        Platform templates:
          - vscode-copilot: 1 file(s) to write, 1 skipped (exists)
              .github/agents/aps.agent.md
        ");
    }

    #[test]
    fn force_changes_status() {
        let r = PlanRenderer::new(None);
        let text = r.render(&plan(), true);
        assert!(text.contains(
            "/home/u/src/app/.claude/skills/agnostic-prompt-standard  [overwrite]"
        ));
    }

    #[test]
    fn empty_selection_and_no_templates() {
        let mut p = plan();
        p.selected_platforms.clear();
        p.skills.truncate(1);
        p.templates.clear();
        let text = PlanRenderer::new(None).render(&p, false);
        assert_eq!(
            text,
            "Selected adapters:\n  (none)\n\nSkill install destinations:\n  - /home/u/src/app/.github/skills/agnostic-prompt-standard  [create]\n\nPlatform templates: (none)"
        );
    }

    #[test]
    fn preview_is_capped() {
        let mut p = plan();
        p.templates[0].entries = (0..35).map(|i| entry(&format!("f{i:02}.md"), false)).collect();
        let text = PlanRenderer::new(None).render(&p, false);
        assert!(text.contains("  - vscode-copilot: 35 file(s) to write\n"));
        assert!(text.contains("      f29.md\n      ...\n") || text.ends_with("      f29.md\n      ..."));
        assert!(!text.contains("f30.md"));
    }

    #[test]
    fn custom_preview_cap() {
        let mut p = plan();
        p.templates[0].entries = vec![entry("a.md", false), entry("b.md", false)];
        let text = PlanRenderer::new(None).with_preview_cap(1).render(&p, false);
        assert!(text.ends_with("      a.md\n      ..."));
    }

    #[test]
    fn render_is_deterministic() {
        let r = PlanRenderer::new(Some(PathBuf::from("/home/u")));
        assert_eq!(r.render(&plan(), false), r.render(&plan(), false));
    }

    #[test]
    fn fmt_path_abbreviates_home() {
        let r = PlanRenderer::new(Some(PathBuf::from("/home/u")));
        assert_eq!(r.fmt_path(Path::new("/home/u")), "~");
        assert_eq!(r.fmt_path(Path::new("/home/u/.copilot")), "~/.copilot");
        assert_eq!(r.fmt_path(Path::new("/home/user2/x")), "/home/user2/x");
    }

    #[test]
    fn json_has_statuses() {
        let v = PlanRenderer::new(None).render_json(&plan(), false);
        assert_eq!(v["plan"]["scope"], "repo");
        assert_eq!(v["plan"]["skills"][0]["status"], "create");
        assert_eq!(
            v["plan"]["skills"][1]["status"],
            "overwrite (needs confirmation)"
        );
        assert_eq!(v["plan"]["templates"][0]["files"][1]["willWrite"], false);
        assert_eq!(v["plan"]["selectedPlatforms"][1], "claude-code");
    }
}
