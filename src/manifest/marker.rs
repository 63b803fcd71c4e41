//! Detection markers: the files and directories that signal an adapter.
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// What kind of filesystem entry a marker expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Any existing path.
    File,
    /// A directory.
    Dir,
}

/// A normalized detection marker.
///
/// `rel_path` never ends in `/`, is never empty, never absolute, and never
/// escapes the workspace through `..`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionMarker {
    kind: MarkerKind,
    label: String,
    rel_path: String,
}

impl DetectionMarker {
    /// A file marker whose label is its path.
    ///
    /// # Errors
    ///
    /// Returns a reason string if `rel_path` is not a safe relative path.
    pub fn file(rel_path: &str) -> Result<Self, String> {
        Self::normalize(MarkerInput::Explicit {
            kind: "file".to_string(),
            label: None,
            rel_path: rel_path.to_string(),
        })
    }

    /// A directory marker labelled `<rel_path>/`.
    ///
    /// # Errors
    ///
    /// Returns a reason string if `rel_path` is not a safe relative path.
    pub fn dir(rel_path: &str) -> Result<Self, String> {
        Self::normalize(MarkerInput::Explicit {
            kind: "dir".to_string(),
            label: None,
            rel_path: rel_path.to_string(),
        })
    }

    /// Kind of entry this marker expects.
    #[must_use]
    pub const fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Text reported as the detection reason.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Workspace-relative path, `/`-separated, no trailing slash.
    #[must_use]
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    /// Normalize either input shape into a marker.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the kind is unknown or the path
    /// is empty, absolute, or contains `..`.
    pub fn normalize(input: MarkerInput) -> Result<Self, String> {
        let (kind, label, raw_path) = match input {
            MarkerInput::Shorthand(s) => {
                let kind = if s.ends_with('/') {
                    MarkerKind::Dir
                } else {
                    MarkerKind::File
                };
                (kind, s.clone(), s)
            }
            MarkerInput::Explicit {
                kind,
                label,
                rel_path,
            } => {
                let kind = match kind.as_str() {
                    "file" => MarkerKind::File,
                    "dir" => MarkerKind::Dir,
                    other => return Err(format!("unknown kind '{other}' (expected file or dir)")),
                };
                let trimmed = rel_path.trim_end_matches('/');
                let label = label.unwrap_or_else(|| match kind {
                    MarkerKind::Dir => format!("{trimmed}/"),
                    MarkerKind::File => trimmed.to_string(),
                });
                (kind, label, rel_path)
            }
        };

        let rel_path = raw_path.trim_end_matches('/').to_string();
        validate_rel_path(&rel_path)?;
        Ok(Self {
            kind,
            label,
            rel_path,
        })
    }
}

/// Raw marker as written in a descriptor: a shorthand string or an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MarkerInput {
    /// `"CLAUDE.md"` or `".claude/"`; a trailing slash means directory.
    Shorthand(String),
    /// `{ "kind": "dir", "label": ".claude/", "relPath": ".claude" }`.
    Explicit {
        /// `file` or `dir`.
        kind: String,
        /// Reason text; defaults to the path (plus `/` for directories).
        #[serde(default)]
        label: Option<String>,
        /// Workspace-relative path.
        #[serde(rename = "relPath", alias = "rel_path")]
        rel_path: String,
    },
}

fn validate_rel_path(rel_path: &str) -> Result<(), String> {
    if rel_path.is_empty() {
        return Err("empty path".to_string());
    }
    let path = Path::new(rel_path);
    if path.has_root() || path.is_absolute() {
        return Err(format!("path '{rel_path}' must be relative"));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(format!("path '{rel_path}' must not contain '..'"));
    }
    Ok(())
}
