// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed environment holding a skill payload,
// a workspace, and a home directory, plus a fluent builder so each
// integration test can set up an isolated installer run without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use aps_cli::commands::CommandSetup;
use aps_cli::logging::{Log, TaskEntry, TaskStatus};

/// Descriptor for the VS Code Copilot adapter, detected by
/// `.github/copilot-instructions.md`.
pub const COPILOT_MANIFEST: &str = r#"{
  "platformId": "vscode-copilot",
  "displayName": "VS Code Copilot",
  "adapterVersion": "1.0.0",
  "detectionMarkers": [".github/copilot-instructions.md", ".github/agents/"]
}"#;

/// Descriptor for the Claude Code adapter, detected by `.claude/`.
pub const CLAUDE_MANIFEST: &str = r#"{
  "platformId": "claude-code",
  "displayName": "Claude Code",
  "detectionMarkers": [{ "kind": "dir", "relPath": ".claude", "label": ".claude/" }]
}"#;

/// An isolated installer environment backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `payload/`   skill payload with `SKILL.md` and `platforms/`
/// - `ws/`        workspace root (contains `.git/`)
/// - `home/`      stand-in for the user's home directory
pub struct TestEnv {
    pub root: tempfile::TempDir,
}

impl TestEnv {
    /// Skill payload root.
    pub fn payload(&self) -> PathBuf {
        self.root.path().join("payload")
    }

    /// Workspace root.
    pub fn workspace(&self) -> PathBuf {
        self.root.path().join("ws")
    }

    /// Home directory.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Load the payload's adapters the way commands do.
    pub fn setup(&self, log: &dyn Log) -> CommandSetup {
        CommandSetup::load(self.workspace(), self.home(), self.payload(), log)
            .expect("load command setup")
    }

    /// Write `content` to `rel` under the workspace.
    pub fn write_workspace_file(&self, rel: &str, content: &str) {
        write_file(&self.workspace().join(rel), content);
    }
}

/// Fluent builder for [`TestEnv`].
pub struct TestEnvBuilder {
    env: TestEnv,
}

impl TestEnvBuilder {
    /// Begin with a payload holding only `SKILL.md`, an empty workspace with
    /// `.git/`, and an empty home directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let env = TestEnv { root };
        write_file(&env.payload().join("SKILL.md"), "# Agnostic Prompt Standard\n");
        write_file(&env.payload().join("references/format.md"), "format\n");
        std::fs::create_dir_all(env.workspace().join(".git")).expect("create .git");
        std::fs::create_dir_all(env.home()).expect("create home");
        Self { env }
    }

    /// Add an adapter directory `platforms/<dir>/` with `manifest`.
    pub fn with_platform(self, dir: &str, manifest: &str) -> Self {
        write_file(
            &self
                .env
                .payload()
                .join("platforms")
                .join(dir)
                .join("manifest.json"),
            manifest,
        );
        self
    }

    /// Add a template file under `platforms/<dir>/templates/<rel>`.
    pub fn with_template(self, dir: &str, rel: &str, content: &str) -> Self {
        write_file(
            &self
                .env
                .payload()
                .join("platforms")
                .join(dir)
                .join("templates")
                .join(rel),
            content,
        );
        self
    }

    /// Create a file in the workspace.
    pub fn with_workspace_file(self, rel: &str, content: &str) -> Self {
        self.env.write_workspace_file(rel, content);
        self
    }

    /// Finish building and return the environment.
    pub fn build(self) -> TestEnv {
        self.env
    }
}

/// Payload with the two standard adapters and a couple of templates.
pub fn standard_env() -> TestEnvBuilder {
    TestEnvBuilder::new()
        .with_platform("vscode-copilot", COPILOT_MANIFEST)
        .with_template(
            "vscode-copilot",
            ".github/agents/aps-author.agent.md",
            "agent v1\n",
        )
        .with_template("vscode-copilot", "AGENTS.md", "agents root\n")
        .with_platform("claude-code", CLAUDE_MANIFEST)
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Every file under `root` mapped to its content, for before/after
/// comparisons.
pub fn snapshot_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(dir: &Path, root: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                out.insert(
                    path.strip_prefix(root).expect("under root").join(""),
                    Vec::new(),
                );
                walk(&path, root, out);
            } else {
                let content = std::fs::read(&path).expect("read file");
                out.insert(path.strip_prefix(root).expect("under root").to_path_buf(), content);
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

/// [`Log`] that keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl MemoryLog {
    /// All messages, each prefixed with its level.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lock").clone()
    }

    /// All recorded task entries.
    pub fn tasks(&self) -> Vec<TaskEntry> {
        self.tasks.lock().expect("lock").clone()
    }

    fn push(&self, level: &str, msg: &str) {
        self.lines.lock().expect("lock").push(format!("{level} {msg}"));
    }
}

impl Log for MemoryLog {
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
        self.tasks.lock().expect("lock").push(TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}
