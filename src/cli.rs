use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the APS skill installer.
#[derive(Parser, Debug)]
#[command(
    name = "aps",
    about = "Install the Agnostic Prompt Standard skill and platform adapters",
    version
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options every subcommand accepts
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Workspace root (defaults to the nearest ancestor containing .git)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Skill payload directory (defaults to $APS_PAYLOAD_DIR or the bundled copy)
    #[arg(long, global = true)]
    pub payload: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the skill and selected platform templates
    Init(InitOpts),
    /// Report workspace, detected adapters, and installed skills
    Doctor(DoctorOpts),
    /// List bundled platform adapters
    Platforms,
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used for the log file name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Doctor(_) => "doctor",
            Self::Platforms => "platforms",
            Self::Version => "version",
        }
    }
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct InitOpts {
    /// Install into the workspace (.github/skills or .claude/skills)
    #[arg(long, conflicts_with = "personal")]
    pub repo: bool,

    /// Install for the current user (~/.copilot/skills or ~/.claude/skills)
    #[arg(long)]
    pub personal: bool,

    /// Platform adapters to apply (repeatable, comma-separated; "none" for none)
    #[arg(long, value_delimiter = ',')]
    pub platform: Vec<String>,

    /// Accept defaults without prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Overwrite existing skill directories and template files
    #[arg(short, long)]
    pub force: bool,

    /// Show the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,
}

/// Options for the `doctor` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct DoctorOpts {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::unreachable
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn init_opts(args: &[&str]) -> InitOpts {
        let cli = Cli::parse_from(args);
        let Command::Init(opts) = cli.command else {
            unreachable!("expected init command");
        };
        opts
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init_defaults() {
        let opts = init_opts(&["aps", "init"]);
        assert!(!opts.repo && !opts.personal && !opts.yes && !opts.force);
        assert!(opts.platform.is_empty());
    }

    #[test]
    fn parse_platforms_comma_and_repeat() {
        let opts = init_opts(&[
            "aps",
            "init",
            "--platform",
            "vscode-copilot,claude-code",
            "--platform",
            "opencode",
        ]);
        assert_eq!(opts.platform, vec!["vscode-copilot", "claude-code", "opencode"]);
    }

    #[test]
    fn repo_and_personal_conflict() {
        let err = Cli::try_parse_from(["aps", "init", "--repo", "--personal"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn json_requires_dry_run() {
        assert!(Cli::try_parse_from(["aps", "init", "--json"]).is_err());
        let opts = init_opts(&["aps", "init", "--dry-run", "--json"]);
        assert!(opts.dry_run && opts.json);
    }

    #[test]
    fn parse_short_flags() {
        let opts = init_opts(&["aps", "init", "-y", "-f"]);
        assert!(opts.yes);
        assert!(opts.force);
    }

    #[test]
    fn parse_global_root_and_payload_after_subcommand() {
        let cli = Cli::parse_from(["aps", "init", "--root", "/ws", "--payload", "/p"]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/ws")));
        assert_eq!(cli.global.payload, Some(PathBuf::from("/p")));
    }

    #[test]
    fn parse_doctor_json() {
        let cli = Cli::parse_from(["aps", "doctor", "--json"]);
        assert!(matches!(cli.command, Command::Doctor(DoctorOpts { json: true })));
        assert_eq!(cli.command.name(), "doctor");
    }

    #[test]
    fn parse_platforms_and_version() {
        assert!(matches!(
            Cli::parse_from(["aps", "platforms"]).command,
            Command::Platforms
        ));
        assert!(matches!(
            Cli::parse_from(["aps", "version"]).command,
            Command::Version
        ));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["aps", "-v", "platforms"]);
        assert!(cli.verbose);
    }
}
