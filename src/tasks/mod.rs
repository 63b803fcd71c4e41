//! Named tasks that replay an [`InstallPlan`](crate::plan::InstallPlan) as
//! filesystem writes.
pub mod context;
pub mod skill;
pub mod templates;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use aps_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("all templates exist".into());
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed and changed something.
    Ok,
    /// Task ran but had nothing to write.
    Skipped(String),
}

/// Counters for tasks that process many items.
///
/// ```
/// use aps_cli::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 3, already_ok: 1, skipped: 2 };
/// assert_eq!(stats.summary(), "3 written, 1 already ok, 2 skipped");
/// ```
#[derive(Debug, Default)]
pub struct TaskStats {
    /// Items written.
    pub changed: u32,
    /// Items whose content already matched.
    pub already_ok: u32,
    /// Items the plan chose not to write.
    pub skipped: u32,
}

impl TaskStats {
    /// Format the summary string (e.g. "3 written, 1 already ok").
    #[must_use]
    pub fn summary(&self) -> String {
        if self.skipped > 0 {
            format!(
                "{} written, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} written, {} already ok", self.changed, self.already_ok)
        }
    }
}

/// A named, executable task.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether the plan gives this task anything to do.
    fn should_run(&self, ctx: &Context<'_>) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if a filesystem write fails.
    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult>;
}

/// The tasks run by `init`, in execution order.
#[must_use]
pub fn install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(skill::InstallSkill),
        Box::new(templates::InstallTemplates),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error after recording it as failed.
pub fn execute(task: &dyn Task, ctx: &Context<'_>) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.debug(&format!("running task: {}", task.name()));

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.debug(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e)
        }
    }
}

/// Run `tasks` in order, stopping at the first failure.
///
/// Writes made by earlier tasks are left in place.
///
/// # Errors
///
/// Returns the first task error.
pub fn run_tasks(tasks: &[Box<dyn Task>], ctx: &Context<'_>) -> Result<()> {
    for task in tasks {
        execute(task.as_ref(), ctx)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::RecordingLog;
    use crate::plan::{InstallPlan, InstallScope};
    use std::path::PathBuf;

    fn empty_plan() -> InstallPlan {
        InstallPlan {
            scope: InstallScope::Repo,
            workspace_root: Some(PathBuf::from("/ws")),
            selected_platforms: vec![],
            payload_dir: PathBuf::from("/p"),
            force: false,
            skills: vec![],
            templates: vec![],
        }
    }

    struct Fixed {
        run: bool,
        result: fn() -> Result<TaskResult>,
    }

    impl Task for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn should_run(&self, _: &Context<'_>) -> bool {
            self.run
        }
        fn run(&self, _: &Context<'_>) -> Result<TaskResult> {
            (self.result)()
        }
    }

    #[test]
    fn execute_records_not_applicable() {
        let log = RecordingLog::default();
        let plan = empty_plan();
        let ctx = Context::new(&plan, &log, false);
        execute(
            &Fixed {
                run: false,
                result: || Ok(TaskResult::Ok),
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(log.tasks()[0].status, TaskStatus::NotApplicable);
    }

    #[test]
    fn execute_records_skipped_reason() {
        let log = RecordingLog::default();
        let plan = empty_plan();
        let ctx = Context::new(&plan, &log, false);
        execute(
            &Fixed {
                run: true,
                result: || Ok(TaskResult::Skipped("nothing to do".into())),
            },
            &ctx,
        )
        .unwrap();
        let tasks = log.tasks();
        assert_eq!(tasks[0].status, TaskStatus::Skipped);
        assert_eq!(tasks[0].message.as_deref(), Some("nothing to do"));
    }

    #[test]
    fn run_tasks_stops_at_first_failure() {
        let log = RecordingLog::default();
        let plan = empty_plan();
        let ctx = Context::new(&plan, &log, false);
        let tasks: Vec<Box<dyn Task>> = vec![
            Box::new(Fixed {
                run: true,
                result: || Err(anyhow::anyhow!("disk full")),
            }),
            Box::new(Fixed {
                run: true,
                result: || Ok(TaskResult::Ok),
            }),
        ];
        let err = run_tasks(&tasks, &ctx).unwrap_err();
        assert!(err.to_string().contains("disk full"));
        let recorded = log.tasks();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].status, TaskStatus::Failed);
    }

    #[test]
    fn stats_summary_omits_zero_skipped() {
        let stats = TaskStats {
            changed: 2,
            already_ok: 0,
            skipped: 0,
        };
        assert_eq!(stats.summary(), "2 written, 0 already ok");
    }
}
