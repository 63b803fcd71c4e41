//! Subcommand implementations and the setup they share.
pub mod doctor;
pub mod init;
pub mod platforms;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::logging::Log;
use crate::manifest::{LoadOptions, PlatformRegistry, load_platforms};
use crate::operations::SystemFileSystemOps;
use crate::workspace;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the working directory, home directory, and skill payload, then
/// loads every bundled adapter so that each command does not have to repeat
/// the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Directory the command was started from.
    pub cwd: PathBuf,
    /// The user's home directory.
    pub home: PathBuf,
    /// Enclosing git repository of `cwd`; decides the default scope.
    pub repo_root: Option<PathBuf>,
    /// Located skill payload.
    pub payload_dir: PathBuf,
    /// Every adapter that loaded cleanly.
    pub registry: PlatformRegistry,
}

impl CommandSetup {
    /// Locate the payload and load all adapter descriptors.
    ///
    /// # Errors
    ///
    /// Returns an error if the current or home directory cannot be
    /// determined, the payload cannot be found, or `platforms/` cannot be
    /// listed.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let cwd = std::env::current_dir().context("determining current directory")?;
        let home = workspace::home_dir()?;
        let flag = global
            .payload
            .as_deref()
            .map(|p| workspace::absolutize(p, &cwd, &home));
        let payload_dir = workspace::resolve_payload_dir(flag.as_deref(), &cwd)?;
        Self::load(cwd, home, payload_dir, log)
    }

    /// Load adapter descriptors from an already located payload.
    ///
    /// # Errors
    ///
    /// Returns an error if `platforms/` exists but cannot be listed.
    pub fn load(cwd: PathBuf, home: PathBuf, payload_dir: PathBuf, log: &dyn Log) -> Result<Self> {
        log.debug(&format!("payload: {}", payload_dir.display()));

        let report = load_platforms(&payload_dir, &SystemFileSystemOps, LoadOptions::default())
            .with_context(|| format!("loading adapters from {}", payload_dir.display()))?;
        if !report.warnings.is_empty() {
            log.warn(&format!(
                "found {} adapter manifest warning(s):",
                report.warnings.len()
            ));
            for warning in &report.warnings {
                log.warn(&format!("  {warning}"));
            }
        }
        log.debug(&format!("loaded {} platform adapter(s)", report.registry.len()));

        let repo_root = workspace::find_repo_root(&cwd);
        Ok(Self {
            cwd,
            home,
            repo_root,
            payload_dir,
            registry: report.registry,
        })
    }

    /// Workspace root from `--root` or the enclosing git repository.
    #[must_use]
    pub fn workspace_root(&self, root_flag: Option<&Path>) -> Option<PathBuf> {
        root_flag.map_or_else(
            || self.repo_root.clone(),
            |root| Some(workspace::absolutize(root, &self.cwd, &self.home)),
        )
    }
}
