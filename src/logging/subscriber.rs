//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{
    abbreviate_home, display_path, home_prefix, log_file_path, strip_ansi, utc_now,
};

/// Target used for stage headers.
pub const STAGE_TARGET: &str = "aps::stage";
/// Target used for dry-run notices.
pub const DRY_RUN_TARGET: &str = "aps::dry_run";
/// Environment variable holding a console filter directive (e.g. `debug`).
pub const LOG_ENV: &str = "APS_LOG";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn event_message(event: &tracing::Event<'_>) -> String {
    let mut extractor = MessageExtractor::default();
    event.record(&mut extractor);
    extractor.message
}

/// One line of the log file, without the trailing newline.
fn file_line(ts: &str, level: Level, target: &str, msg: &str) -> String {
    let tag = match (level, target) {
        (Level::INFO, STAGE_TARGET) => return format!("[{ts}] ==> {msg}"),
        (Level::INFO, DRY_RUN_TARGET) => "[dry run] ",
        (Level::ERROR, _) => "[error] ",
        (Level::WARN, _) => "[warn] ",
        (Level::DEBUG | Level::TRACE, _) => "[debug] ",
        (Level::INFO, _) => "",
    };
    format!("[{ts}]     {tag}{msg}")
}

/// One console line, without the trailing newline.
///
/// Warnings that continue a list (two leading spaces, as in the manifest
/// warning block) are indented under the `WARN` label instead of repeating it.
fn console_line(level: Level, target: &str, msg: &str) -> String {
    match level {
        Level::ERROR => format!("\x1b[31mERROR\x1b[0m {msg}"),
        Level::WARN if msg.starts_with("  ") => format!("     {msg}"),
        Level::WARN => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        Level::INFO if target == STAGE_TARGET => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
        Level::INFO if target == DRY_RUN_TARGET => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
        Level::INFO => format!("  {msg}"),
        Level::DEBUG | Level::TRACE => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to the per-command
/// log file with timestamps, ANSI codes stripped, and the home directory
/// shown as `~`.
///
/// Always captures `DEBUG` and above regardless of console verbosity.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
    home: Option<String>,
}

impl FileLayer {
    /// Truncate the log file for `command`, write a run header naming the
    /// version and working directory, and return a layer that appends to it.
    ///
    /// Returns `None` if the cache directory or file is unavailable.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let home = home_prefix();
        let version =
            option_env!("APS_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let cwd = std::env::current_dir()
            .map_or_else(|_| "(unknown)".to_string(), |d| display_path(&d, home.as_deref()));
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\naps {command} {version} {}\ncwd: {cwd}\n{rule}\n",
            utc_now("%Y-%m-%d %H:%M:%S"),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
            home,
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let mut msg = strip_ansi(&event_message(event));
        if let Some(home) = &self.home {
            msg = abbreviate_home(&msg, home);
        }
        let line = file_line(&utc_now("%H:%M:%S"), *metadata.level(), metadata.target(), &msg);

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console [`tracing_subscriber::fmt::FormatEvent`] in the installer's
/// output style.
struct ApsFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ApsFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let line = console_line(*metadata.level(), metadata.target(), &event_message(event));
        writeln!(writer, "{line}")
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (info and below) and stderr (warnings and
/// errors); its level is `info`, `debug` with `--verbose`, or whatever
/// `APS_LOG` says.  Every event at `debug` and above is also appended to
/// `$XDG_CACHE_HOME/aps/<command>.log`.  Call once at startup.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let default_level = if verbose { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ApsFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    // A second initialisation (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
