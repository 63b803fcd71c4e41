//! Command: report workspace, detected adapters, and installed skills.
use anyhow::{Context as _, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::{DoctorOpts, GlobalOpts};
use crate::detect::{Detections, detect};
use crate::logging::Log;
use crate::manifest::{LoadOptions, PlatformOrder, load_platforms};
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::plan::InstallScope;
use crate::plan::destinations::skill_path;
use crate::workspace;

/// Installation status of one well-known skill location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Installation {
    /// Row label, e.g. `repo (claude)`.
    pub scope: String,
    /// Skill directory checked.
    pub path: String,
    /// `true` if the directory contains `SKILL.md`.
    pub installed: bool,
}

/// Everything `doctor` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorReport {
    /// Workspace root from `--root` or the enclosing git repository.
    pub workspace_root: Option<String>,
    /// First detected adapter in UI order.
    pub detected_platform: Option<String>,
    /// Per-adapter detection results; `None` when detection could not run.
    pub detected_adapters: Option<Detections>,
    /// Status of each well-known skill location.
    pub installations: Vec<Installation>,
}

impl DoctorReport {
    /// Render the report as text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![
            "APS Doctor".to_string(),
            "----------".to_string(),
            format!(
                "Workspace root: {}",
                self.workspace_root.as_deref().unwrap_or("(not detected)")
            ),
            format!(
                "Detected platform (heuristic): {}",
                self.detected_platform.as_deref().unwrap_or("(none)")
            ),
        ];
        if let Some(detections) = &self.detected_adapters {
            let ids = detections.detected_ids();
            if ids.is_empty() {
                lines.push("Detected adapters: (none)".to_string());
            } else {
                lines.push(format!("Detected adapters: {}", ids.join(", ")));
                for d in detections.iter().filter(|d| d.detected()) {
                    lines.push(format!("  - {}: {}", d.platform_id(), d.reasons().join(", ")));
                }
            }
        }
        lines.push(String::new());
        lines.push("Installed skills:".to_string());
        for row in &self.installations {
            let mark = if row.installed { "✓" } else { "✗" };
            lines.push(format!("- {}: {} {mark}", row.scope, row.path));
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// Build the report.
///
/// Adapters are detected only when both a workspace root and a payload are
/// available.  A location counts as installed when it contains `SKILL.md`.
pub fn build_report(
    workspace_root: Option<&Path>,
    home: &Path,
    payload_dir: Option<&Path>,
    fs: &dyn FileSystemOps,
    log: &dyn Log,
) -> DoctorReport {
    let detected_adapters = match (workspace_root, payload_dir) {
        (Some(root), Some(payload)) => {
            match load_platforms(payload, fs, LoadOptions::default()) {
                Ok(report) => {
                    for warning in &report.warnings {
                        log.debug(&format!("manifest warning: {warning}"));
                    }
                    Some(detect(root, report.registry.ordered(PlatformOrder::Ui), fs))
                }
                Err(e) => {
                    log.warn(&format!("cannot load adapters: {e:#}"));
                    None
                }
            }
        }
        _ => None,
    };

    let mut locations: Vec<(&str, PathBuf)> = Vec::with_capacity(4);
    if let Some(root) = workspace_root {
        locations.push(("repo", skill_path(InstallScope::Repo, root, false)));
        locations.push(("repo (claude)", skill_path(InstallScope::Repo, root, true)));
    }
    locations.push(("personal", skill_path(InstallScope::Personal, home, false)));
    locations.push((
        "personal (claude)",
        skill_path(InstallScope::Personal, home, true),
    ));

    let installations = locations
        .into_iter()
        .map(|(scope, path)| Installation {
            scope: scope.to_string(),
            installed: fs.is_file(&path.join("SKILL.md")),
            path: path.display().to_string(),
        })
        .collect();

    DoctorReport {
        workspace_root: workspace_root.map(|p| p.display().to_string()),
        detected_platform: detected_adapters
            .as_ref()
            .and_then(|d| d.detected_ids().into_iter().next()),
        detected_adapters,
        installations,
    }
}

/// Run the doctor command.
///
/// # Errors
///
/// Returns an error if the current or home directory cannot be determined
/// or `out` cannot be written.
pub fn run(
    global: &GlobalOpts,
    opts: &DoctorOpts,
    out: &mut dyn Write,
    log: &dyn Log,
) -> Result<()> {
    let cwd = std::env::current_dir().context("determining current directory")?;
    let home = workspace::home_dir()?;
    let workspace_root = workspace::resolve_workspace_root(global.root.as_deref(), &cwd, &home);
    let flag = global
        .payload
        .as_deref()
        .map(|p| workspace::absolutize(p, &cwd, &home));
    let payload_dir = match workspace::resolve_payload_dir(flag.as_deref(), &cwd) {
        Ok(dir) => Some(dir),
        Err(e) => {
            log.debug(&format!("{e}"));
            None
        }
    };

    let report = build_report(
        workspace_root.as_deref(),
        &home,
        payload_dir.as_deref(),
        &SystemFileSystemOps,
        log,
    );

    if opts.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(out, "{}", report.render())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::RecordingLog;
    use crate::operations::MockFileSystemOps;

    const COPILOT_MANIFEST: &str = r#"{
        "platformId": "vscode-copilot",
        "displayName": "VS Code Copilot",
        "detectionMarkers": [".github/copilot-instructions.md"]
    }"#;

    fn copilot_workspace() -> MockFileSystemOps {
        MockFileSystemOps::new()
            .with_file("/p/platforms/vscode-copilot/manifest.json", COPILOT_MANIFEST)
            .with_file("/ws/.github/copilot-instructions.md", "")
            .with_file("/ws/.github/skills/agnostic-prompt-standard/SKILL.md", "")
    }

    fn workspace_report(fs: &MockFileSystemOps) -> DoctorReport {
        let log = RecordingLog::default();
        build_report(
            Some(Path::new("/ws")),
            Path::new("/home/u"),
            Some(Path::new("/p")),
            fs,
            &log,
        )
    }

    #[test]
    fn report_with_workspace_and_payload() {
        let report = workspace_report(&copilot_workspace());

        let detections = report.detected_adapters.as_ref().unwrap();
        assert_eq!(detections.detected_ids(), vec!["vscode-copilot"]);
        assert_eq!(
            detections.get("vscode-copilot").unwrap().reasons(),
            &[".github/copilot-instructions.md".to_string()]
        );
        assert_eq!(report.detected_platform.as_deref(), Some("vscode-copilot"));
        assert_eq!(report.installations.len(), 4);
        assert!(report.installations[0].installed);
        assert!(!report.installations[1].installed);
        assert_eq!(report.installations[2].scope, "personal");
    }

    #[test]
    fn report_without_workspace_has_personal_rows_only() {
        let fs = MockFileSystemOps::new()
            .with_file("/home/u/.claude/skills/agnostic-prompt-standard/SKILL.md", "");
        let log = RecordingLog::default();
        let report = build_report(None, Path::new("/home/u"), None, &fs, &log);

        assert_eq!(report.workspace_root, None);
        assert_eq!(report.detected_adapters, None);
        assert_eq!(report.detected_platform, None);
        let scopes: Vec<_> = report.installations.iter().map(|i| i.scope.as_str()).collect();
        assert_eq!(scopes, vec!["personal", "personal (claude)"]);
        assert!(!report.installations[0].installed);
        assert!(report.installations[1].installed);
    }

    #[test]
    fn directory_without_skill_file_is_not_installed() {
        let fs = MockFileSystemOps::new()
            .with_dir("/home/u/.copilot/skills/agnostic-prompt-standard");
        let log = RecordingLog::default();
        let report = build_report(None, Path::new("/home/u"), None, &fs, &log);
        assert!(!report.installations[0].installed);
    }

    #[test]
    fn render_text_without_workspace() {
        let report = DoctorReport {
            workspace_root: None,
            detected_platform: None,
            detected_adapters: None,
            installations: vec![Installation {
                scope: "personal".into(),
                path: "/home/u/.copilot/skills/agnostic-prompt-standard".into(),
                installed: false,
            }],
        };
        insta::assert_snapshot!(report.render(), @r"
        APS Doctor
        ----------
        Workspace root: (not detected)
        Detected platform (heuristic): (none)

        Installed skills:
        - personal: /home/u/.copilot/skills/agnostic-prompt-standard ✗
        ");
    }

    #[test]
    fn render_text_lists_detection_reasons() {
        let text = workspace_report(&copilot_workspace()).render();
        assert!(text.contains("Detected platform (heuristic): vscode-copilot\n"));
        assert!(text.contains(
            "Detected adapters: vscode-copilot\n  - vscode-copilot: .github/copilot-instructions.md\n"
        ));
        assert!(text.contains("- repo: /ws/.github/skills/agnostic-prompt-standard ✓"));
    }

    #[test]
    fn render_text_with_nothing_detected() {
        let fs = MockFileSystemOps::new()
            .with_file("/p/platforms/vscode-copilot/manifest.json", COPILOT_MANIFEST)
            .with_dir("/ws");
        let text = workspace_report(&fs).render();
        assert!(text.contains("Detected platform (heuristic): (none)\nDetected adapters: (none)\n"));
    }

    #[test]
    fn json_keys_are_snake_case_and_adapters_keyed_by_id() {
        let report = workspace_report(&copilot_workspace());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["workspace_root"], "/ws");
        assert_eq!(value["detected_platform"], "vscode-copilot");
        let adapter = &value["detected_adapters"]["vscode-copilot"];
        assert_eq!(adapter["platformId"], "vscode-copilot");
        assert_eq!(adapter["detected"], true);
        assert_eq!(adapter["reasons"][0], ".github/copilot-instructions.md");
        assert_eq!(value["installations"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn json_adapters_are_null_without_workspace() {
        let log = RecordingLog::default();
        let report = build_report(None, Path::new("/home/u"), None, &MockFileSystemOps::new(), &log);
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["detected_adapters"].is_null());
        assert!(value["workspace_root"].is_null());
    }
}
