//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::{LOG_ENV, init_subscriber};
pub use types::{Log, TaskEntry, TaskStatus};

/// Serializes `XDG_CACHE_HOME` manipulation across parallel test threads.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Create a Logger backed by an isolated per-thread tracing subscriber with
/// a [`FileLayer`](subscriber::FileLayer), so events emitted by logger
/// methods reach a log file inside a temp dir.
///
/// Keep the returned guard alive for the whole test; dropping it restores
/// the previous thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let env_lock = TEST_ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    // SAFETY: Protected by TEST_ENV_MUTEX; restored before lock is released.
    #[allow(unsafe_code)]
    unsafe {
        std::env::set_var("XDG_CACHE_HOME", tmp.path());
    }
    let file_layer = subscriber::FileLayer::new("test").expect("failed to create file layer");
    let log = Logger::new("test");
    // SAFETY: Protected by TEST_ENV_MUTEX.
    #[allow(unsafe_code)]
    unsafe {
        std::env::remove_var("XDG_CACHE_HOME");
    }
    drop(env_lock);
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}

/// In-memory [`Log`] that records every message, for command and task tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingLog {
    lines: std::sync::Mutex<Vec<String>>,
    tasks: std::sync::Mutex<Vec<TaskEntry>>,
}

#[cfg(test)]
impl RecordingLog {
    fn push(&self, tag: &str, msg: &str) {
        if let Ok(mut g) = self.lines.lock() {
            g.push(format!("{tag} {msg}"));
        }
    }

    /// All messages, each prefixed with its level tag.
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// All recorded task entries.
    pub(crate) fn tasks(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

#[cfg(test)]
impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("STAGE", msg);
    }
    fn info(&self, msg: &str) {
        self.push("INFO", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("DEBUG", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("WARN", msg);
    }
    fn error(&self, msg: &str) {
        self.push("ERROR", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("DRY", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut g) = self.tasks.lock() {
            g.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
