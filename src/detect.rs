//! Marker-based detection of which adapters apply to a workspace.
use serde::Serialize;
use std::path::Path;

use crate::manifest::{MarkerKind, Platform};
use crate::operations::FileSystemOps;

/// Detection result for one platform.
///
/// `detected` is derived from `reasons`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterDetection {
    platform_id: String,
    detected: bool,
    reasons: Vec<String>,
}

impl AdapterDetection {
    fn from_reasons(platform_id: &str, reasons: Vec<String>) -> Self {
        Self {
            platform_id: platform_id.to_string(),
            detected: !reasons.is_empty(),
            reasons,
        }
    }

    /// Platform this result is for.
    #[must_use]
    pub fn platform_id(&self) -> &str {
        &self.platform_id
    }

    /// `true` if at least one marker matched.
    #[must_use]
    pub const fn detected(&self) -> bool {
        self.detected
    }

    /// Labels of every matching marker, in declaration order.
    #[must_use]
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

/// Detection results keyed by platform id, in the order platforms were given.
///
/// Serializes as a JSON object mapping each id to its [`AdapterDetection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detections {
    entries: Vec<AdapterDetection>,
}

impl Serialize for Detections {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap as _;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.platform_id, entry)?;
        }
        map.end()
    }
}

impl Detections {
    /// Result for `platform_id`, if that platform was checked.
    #[must_use]
    pub fn get(&self, platform_id: &str) -> Option<&AdapterDetection> {
        self.entries.iter().find(|d| d.platform_id == platform_id)
    }

    /// `true` if `platform_id` was checked and detected.
    #[must_use]
    pub fn is_detected(&self, platform_id: &str) -> bool {
        self.get(platform_id).is_some_and(AdapterDetection::detected)
    }

    /// Ids of detected platforms.
    #[must_use]
    pub fn detected_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|d| d.detected)
            .map(|d| d.platform_id.clone())
            .collect()
    }

    /// Iterate over all results.
    pub fn iter(&self) -> impl Iterator<Item = &AdapterDetection> {
        self.entries.iter()
    }
}

/// Check every platform's markers against `workspace_root`.
///
/// Directory markers need a directory at the path; file markers only need
/// the path to exist.  All matching markers are recorded.  Nothing is
/// written.
pub fn detect<'a>(
    workspace_root: &Path,
    platforms: impl IntoIterator<Item = &'a Platform>,
    fs: &dyn FileSystemOps,
) -> Detections {
    let entries = platforms
        .into_iter()
        .map(|platform| {
            let reasons = platform
                .markers()
                .iter()
                .filter(|marker| {
                    let path = workspace_root.join(marker.rel_path());
                    match marker.kind() {
                        MarkerKind::Dir => fs.is_dir(&path),
                        MarkerKind::File => fs.exists(&path),
                    }
                })
                .map(|marker| marker.label().to_string())
                .collect();
            AdapterDetection::from_reasons(platform.platform_id(), reasons)
        })
        .collect();
    Detections { entries }
}

/// Suffix appended to a platform name in selection lists.
#[must_use]
pub const fn format_detection_label(detection: &AdapterDetection) -> &'static str {
    if detection.detected {
        " (detected)"
    } else {
        ""
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::manifest::DetectionMarker;
    use crate::operations::MockFileSystemOps;

    fn claude() -> Platform {
        Platform::new("claude-code", "Claude Code", "/p/platforms/claude-code").with_markers(vec![
            DetectionMarker::dir(".claude").unwrap(),
            DetectionMarker::file("CLAUDE.md").unwrap(),
            DetectionMarker::file(".mcp.json").unwrap(),
        ])
    }

    fn copilot() -> Platform {
        Platform::new("vscode-copilot", "VS Code Copilot", "/p/platforms/vscode-copilot")
            .with_markers(vec![
                DetectionMarker::file(".github/copilot-instructions.md").unwrap(),
                DetectionMarker::dir(".github/agents").unwrap(),
            ])
    }

    #[test]
    fn nothing_present_means_nothing_detected() {
        let fs = MockFileSystemOps::new().with_dir("/ws");
        let platforms = [claude(), copilot()];
        let d = detect(Path::new("/ws"), &platforms, &fs);
        for det in d.iter() {
            assert!(!det.detected());
            assert!(det.reasons().is_empty());
        }
        assert!(d.detected_ids().is_empty());
    }

    #[test]
    fn all_matching_markers_are_reasons() {
        let fs = MockFileSystemOps::new()
            .with_dir("/ws/.claude")
            .with_file("/ws/CLAUDE.md", "");
        let platforms = [claude()];
        let d = detect(Path::new("/ws"), &platforms, &fs);
        let det = d.get("claude-code").unwrap();
        assert!(det.detected());
        assert_eq!(det.reasons(), &[".claude/".to_string(), "CLAUDE.md".to_string()]);
    }

    #[test]
    fn dir_marker_ignores_plain_file() {
        let fs = MockFileSystemOps::new().with_file("/ws/.claude", "not a dir");
        let platforms = [claude()];
        let d = detect(Path::new("/ws"), &platforms, &fs);
        assert!(!d.is_detected("claude-code"));
    }

    #[test]
    fn file_marker_accepts_directory() {
        let fs = MockFileSystemOps::new().with_dir("/ws/CLAUDE.md");
        let platforms = [claude()];
        assert!(detect(Path::new("/ws"), &platforms, &fs).is_detected("claude-code"));
    }

    #[test]
    fn copilot_instructions_file_is_detected() {
        let fs = MockFileSystemOps::new().with_file("/ws/.github/copilot-instructions.md", "");
        let platforms = [claude(), copilot()];
        let d = detect(Path::new("/ws"), &platforms, &fs);
        assert_eq!(d.detected_ids(), vec!["vscode-copilot"]);
        assert_eq!(
            d.get("vscode-copilot").unwrap().reasons(),
            &[".github/copilot-instructions.md".to_string()]
        );
    }

    #[test]
    fn zero_markers_never_detected() {
        let fs = MockFileSystemOps::new().with_dir("/ws/.claude");
        let platforms = [Platform::new("bare", "Bare", "/p/platforms/bare")];
        let d = detect(Path::new("/ws"), &platforms, &fs);
        assert!(!d.is_detected("bare"));
    }

    #[test]
    fn detection_label() {
        let fs = MockFileSystemOps::new().with_dir("/ws/.claude");
        let platforms = [claude(), copilot()];
        let d = detect(Path::new("/ws"), &platforms, &fs);
        assert_eq!(format_detection_label(d.get("claude-code").unwrap()), " (detected)");
        assert_eq!(format_detection_label(d.get("vscode-copilot").unwrap()), "");
    }

    #[test]
    fn serializes_as_map_keyed_by_id() {
        let fs = MockFileSystemOps::new().with_dir("/ws/.claude");
        let platforms = [claude()];
        let json = serde_json::to_value(detect(Path::new("/ws"), &platforms, &fs)).unwrap();
        assert!(json.is_object());
        assert_eq!(json["claude-code"]["platformId"], "claude-code");
        assert_eq!(json["claude-code"]["detected"], true);
        assert_eq!(json["claude-code"]["reasons"][0], ".claude/");
    }
}
