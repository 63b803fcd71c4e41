use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::resources::{Applicable as _, ResourceChange, TemplateFileResource};

/// Write every template entry the plan marked `will_write`.
///
/// Files whose content already matches are left untouched.
#[derive(Debug)]
pub struct InstallTemplates;

impl Task for InstallTemplates {
    fn name(&self) -> &'static str {
        "Install platform templates"
    }

    fn should_run(&self, ctx: &Context<'_>) -> bool {
        !ctx.plan.templates.is_empty()
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let mut stats = TaskStats::default();

        for template in &ctx.plan.templates {
            let mut installed = Vec::new();
            for entry in template.writes() {
                let resource = TemplateFileResource::new(
                    entry.source().to_path_buf(),
                    entry.destination().to_path_buf(),
                );
                let change = resource
                    .apply()
                    .with_context(|| format!("writing template {}", entry.rel_path()))?;
                match change {
                    ResourceChange::Applied => {
                        stats.changed += 1;
                        installed.push(entry.rel_path());
                    }
                    ResourceChange::AlreadyCorrect => {
                        ctx.log
                            .debug(&format!("unchanged: {}", resource.description()));
                        stats.already_ok += 1;
                    }
                }
            }
            stats.skipped += u32::try_from(template.skipped_count()).unwrap_or(u32::MAX);

            if installed.is_empty() {
                continue;
            }
            ctx.log.info(&format!(
                "Installed {} template file(s) for {}:",
                installed.len(),
                template.platform_id
            ));
            for rel in installed {
                ctx.log.info(&format!("  - {rel}"));
            }
        }

        ctx.log.debug(&stats.summary());
        if stats.changed == 0 {
            return Ok(TaskResult::Skipped(stats.summary()));
        }
        Ok(TaskResult::Ok)
    }
}
