//! Log paths, ANSI stripping, home abbreviation, and timestamps.
use std::fs;
use std::path::{Path, PathBuf};

use crate::workspace;

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending in
/// any byte in the `@`..`~` range) so cursor movement codes are removed
/// without consuming the text that follows.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Replace every occurrence of `home` followed by a separator (or the end of
/// the text) with `~`, so logs can be shared without the user's name.
pub(super) fn abbreviate_home(text: &str, home: &str) -> String {
    if home.is_empty() || home == "/" {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(home) {
        let (before, found) = rest.split_at(pos);
        let Some(after) = found.strip_prefix(home) else {
            break;
        };
        out.push_str(before);
        if after.is_empty() || after.starts_with(['/', '\\']) {
            out.push('~');
        } else {
            out.push_str(home);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// `$XDG_CACHE_HOME`, else `<home>/.cache`.
fn cache_base() -> Option<PathBuf> {
    std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| workspace::home_dir().ok().map(|h| h.join(".cache")))
}

/// Return `<cache>/aps/`, creating it if needed.
fn cache_dir() -> Option<PathBuf> {
    let dir = cache_base()?.join("aps");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the log file path for `command` under the cache directory.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(cache_dir()?.join(format!("{command}.log")))
}

/// Home directory as a string, for [`abbreviate_home`].
pub(super) fn home_prefix() -> Option<String> {
    workspace::home_dir()
        .ok()
        .map(|h| h.to_string_lossy().trim_end_matches(['/', '\\']).to_string())
        .filter(|h| !h.is_empty())
}

/// Display `path` with the home directory abbreviated.
pub(super) fn display_path(path: &Path, home: Option<&str>) -> String {
    let shown = path.display().to_string();
    match home {
        Some(h) => abbreviate_home(&shown, h),
        None => shown,
    }
}

/// Current UTC time in `format` (a `chrono` strftime string).
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
