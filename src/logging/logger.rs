//! Structured logger with summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that emits [`tracing`] events and collects task results.
///
/// Every message also reaches `$XDG_CACHE_HOME/aps/<command>.log` through
/// the file layer installed by [`init_subscriber`](super::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded task entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only with `--verbose`; always in the file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run notice.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed tasks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Log the summary of all recorded tasks.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut not_applicable = 0u32;
        let mut skipped = 0u32;
        let mut failed = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", "\x1b[2m")
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        let total = ok + not_applicable + skipped + failed;
        self.info(&format!(
            "{total} tasks: \x1b[32m{ok} ok\x1b[0m, \x1b[2m{not_applicable} n/a\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.debug(&format!("log: {}", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}
