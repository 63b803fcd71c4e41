use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::resources::{Applicable as _, SkillDirResource};

/// Copy the skill payload into every planned destination.
#[derive(Debug)]
pub struct InstallSkill;

impl Task for InstallSkill {
    fn name(&self) -> &'static str {
        "Install skill"
    }

    fn should_run(&self, ctx: &Context<'_>) -> bool {
        !ctx.plan.skills.is_empty()
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        for target in &ctx.plan.skills {
            let resource = SkillDirResource::new(
                ctx.plan.payload_dir.clone(),
                target.path.clone(),
                ctx.replace_existing && target.already_exists,
            );
            resource
                .apply()
                .with_context(|| format!("installing skill into {}", resource.description()))?;
            ctx.log
                .info(&format!("Installed APS skill -> {}", target.path.display()));
        }
        Ok(TaskResult::Ok)
    }
}
