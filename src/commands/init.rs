//! Command: install the skill and selected platform templates.
//!
//! Flow: select adapters, pick a scope, build the plan, then either show it
//! (dry run), confirm it (interactive), or check it for conflicts
//! (non-interactive) before executing.
use anyhow::Result;
use std::io::{IsTerminal as _, Write};
use std::path::PathBuf;

use super::CommandSetup;
use crate::cli::{GlobalOpts, InitOpts};
use crate::detect::{Detections, detect, format_detection_label};
use crate::error::ConflictError;
use crate::logging::{Log, Logger};
use crate::manifest::PlatformOrder;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::plan::{
    InstallPlan, InstallScope, PlanRenderer, PlanRequest, build_plan, compute_skill_destinations,
};
use crate::prompt::{PlatformChoice, Prompter, TerminalPrompter};
use crate::tasks::{self, Context};
use crate::workspace;

/// Printed before confirming when a skill destination already exists.
pub const OVERWRITE_NOTE: &str =
    "Note: One or more skill destinations already exist. Confirming will overwrite them.";

const WORKSPACE_PROMPT: &str = "Workspace root path (the folder that contains .github/):";

/// How an `init` run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// The plan was shown and nothing was written.
    DryRun,
    /// The user declined the confirmation.
    Cancelled,
    /// The plan was executed.
    Installed {
        /// Skill destinations written.
        skills: Vec<PathBuf>,
        /// Template files written.
        templates_written: usize,
    },
}

/// Normalize repeated, comma-separated `--platform` values.
///
/// Returns `None` when the flag was not given.  Values are trimmed and
/// de-duplicated in first-seen order; `none` anywhere means an explicitly
/// empty selection.
#[must_use]
pub fn normalize_platform_args(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        return None;
    }
    let mut out: Vec<String> = Vec::new();
    for id in values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        if id.eq_ignore_ascii_case("none") {
            return Some(Vec::new());
        }
        if !out.iter().any(|seen| seen == id) {
            out.push(id.to_string());
        }
    }
    Some(out)
}

/// Run the init command against the real terminal and filesystem.
///
/// # Errors
///
/// Returns an error if setup fails, the selection or scope is invalid, a
/// skill destination exists without `--force` in non-interactive mode, or
/// a filesystem write fails.
pub fn run(global: &GlobalOpts, opts: &InitOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let workspace_root = setup.workspace_root(global.root.as_deref());
    let interactive = !opts.yes && std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    log.debug(&format!("interactive: {interactive}"));

    let mut prompter = TerminalPrompter::stdio();
    let prompter: Option<&mut dyn Prompter> = if interactive {
        Some(&mut prompter)
    } else {
        None
    };

    let mut stdout = std::io::stdout().lock();
    let result = run_with(
        &setup,
        workspace_root,
        opts,
        prompter,
        &SystemFileSystemOps,
        &mut stdout,
        log,
    );

    if should_print_summary(result.as_ref().ok(), log.failure_count()) {
        log.print_summary();
    }
    result.map(|_| ())
}

/// The task summary is shown after an install and after a failed task.
const fn should_print_summary(outcome: Option<&InitOutcome>, failures: usize) -> bool {
    matches!(outcome, Some(InitOutcome::Installed { .. })) || failures > 0
}

/// Run the init state machine.
///
/// `prompter` is `Some` in interactive mode.  All user-facing text goes to
/// `out`; progress and diagnostics go to `log`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    setup: &CommandSetup,
    workspace_root: Option<PathBuf>,
    opts: &InitOpts,
    mut prompter: Option<&mut dyn Prompter>,
    fs: &dyn FileSystemOps,
    out: &mut dyn Write,
    log: &dyn Log,
) -> Result<InitOutcome> {
    let renderer = PlanRenderer::new(Some(setup.home.clone()));
    let registry = &setup.registry;

    let detections = workspace_root.as_deref().map_or_else(Detections::default, |root| {
        detect(root, registry.ordered(PlatformOrder::Ui), fs)
    });
    for d in detections.iter().filter(|d| d.detected()) {
        log.debug(&format!(
            "detected {}: {}",
            d.platform_id(),
            d.reasons().join(", ")
        ));
    }

    // SELECTING
    let selected = if let Some(explicit) = normalize_platform_args(&opts.platform) {
        registry.check_known(&explicit)?;
        explicit
    } else if let Some(p) = prompter.as_deref_mut() {
        let choices: Vec<PlatformChoice> = registry
            .ordered(PlatformOrder::Ui)
            .into_iter()
            .map(|platform| {
                let suffix = detections
                    .get(platform.platform_id())
                    .map_or("", format_detection_label);
                PlatformChoice {
                    id: platform.platform_id().to_string(),
                    label: format!(
                        "{} ({}){suffix}",
                        platform.display_name(),
                        platform.platform_id()
                    ),
                    checked: detections.is_detected(platform.platform_id()),
                }
            })
            .collect();
        p.select_platforms(&choices)?
    } else if opts.yes {
        detections.detected_ids()
    } else {
        Vec::new()
    };
    log.debug(&format!("selected adapters: {selected:?}"));

    let (scope, workspace_root) =
        resolve_scope(setup, workspace_root, opts, &selected, &renderer, prompter.as_deref_mut())?;
    log.debug(&format!("scope: {scope}"));

    // PLANNING
    let plan = build_plan(
        &PlanRequest {
            scope,
            workspace_root: workspace_root.as_deref(),
            home: &setup.home,
            payload_dir: &setup.payload_dir,
            registry,
            selected: &selected,
            force: opts.force,
        },
        fs,
    )?;

    if opts.dry_run {
        if opts.json {
            let value = renderer.render_json(&plan, opts.force);
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        } else {
            writeln!(out, "Dry run - planned actions:\n")?;
            writeln!(out, "{}", renderer.render(&plan, opts.force))?;
        }
        log.dry_run("no changes written");
        return Ok(InitOutcome::DryRun);
    }

    let replace_existing = if let Some(p) = prompter {
        writeln!(out, "{}", renderer.render(&plan, opts.force))?;
        if plan.first_existing_skill().is_some() {
            writeln!(out, "\n{OVERWRITE_NOTE}")?;
        }
        writeln!(out)?;
        out.flush()?;
        if !p.confirm("Proceed with these changes?", false)? {
            writeln!(out, "Cancelled.")?;
            return Ok(InitOutcome::Cancelled);
        }
        true
    } else {
        if !opts.force
            && let Some(existing) = plan.first_existing_skill()
        {
            return Err(ConflictError::DestinationExists {
                path: existing.path.clone(),
            }
            .into());
        }
        opts.force
    };

    // EXECUTING
    execute(&plan, replace_existing, log)?;

    writeln!(out, "\nNext steps:")?;
    writeln!(out, "- Ensure your IDE has Agent Skills enabled as needed.")?;
    for skill in &plan.skills {
        writeln!(out, "- Skill location: {}", renderer.fmt_path(&skill.path))?;
    }

    Ok(InitOutcome::Installed {
        skills: plan.skills.iter().map(|s| s.path.clone()).collect(),
        templates_written: plan.template_write_count(),
    })
}

fn execute(plan: &InstallPlan, replace_existing: bool, log: &dyn Log) -> Result<()> {
    let ctx = Context::new(plan, log, replace_existing);
    tasks::run_tasks(&tasks::install_tasks(), &ctx)
}

/// Decide the install scope and, for repo scope, the workspace root.
///
/// The default is `repo` only when the cwd is inside a git repository; a
/// `--root` workspace alone does not change it.
fn resolve_scope<'p>(
    setup: &CommandSetup,
    workspace_root: Option<PathBuf>,
    opts: &InitOpts,
    selected: &[String],
    renderer: &PlanRenderer,
    prompter: Option<&mut (dyn Prompter + 'p)>,
) -> Result<(InstallScope, Option<PathBuf>)> {
    let flagged = if opts.personal {
        Some(InstallScope::Personal)
    } else if opts.repo {
        Some(InstallScope::Repo)
    } else {
        None
    };
    let default = if setup.repo_root.is_some() {
        InstallScope::Repo
    } else {
        InstallScope::Personal
    };

    let Some(prompter) = prompter else {
        return Ok((flagged.unwrap_or(default), workspace_root));
    };

    let scope = if let Some(scope) = flagged {
        scope
    } else {
        let repo_label = setup.repo_root.as_deref().map_or_else(
            || "Project skill (choose a workspace folder)".to_string(),
            |root| format!("Project skill in this repo ({})", renderer.fmt_path(root)),
        );
        let personal_bases = compute_skill_destinations(
            InstallScope::Personal,
            None,
            &setup.home,
            selected,
        )?
        .iter()
        .map(|p| renderer.fmt_path(p))
        .collect::<Vec<_>>()
        .join(", ");
        prompter.select_scope(
            default,
            &repo_label,
            &format!("Personal skill for your user ({personal_bases})"),
        )?
    };

    if scope == InstallScope::Repo && workspace_root.is_none() {
        let answer = prompter.input_path(WORKSPACE_PROMPT, &setup.cwd)?;
        let root = workspace::absolutize(&answer, &setup.cwd, &setup.home);
        return Ok((scope, Some(root)));
    }
    Ok((scope, workspace_root))
}
