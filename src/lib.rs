//! Installer for the Agnostic Prompt Standard (APS) skill.
//!
//! Copies the bundled skill payload into a repository or the user's home
//! directory and projects platform adapter templates (VS Code Copilot,
//! Claude Code, OpenCode, ...) into the workspace.
//!
//! The public API is organised into layers:
//!
//! - **[`manifest`]** - load and validate adapter descriptors into a registry
//! - **[`detect`]** - marker-based adapter detection
//! - **[`plan`]** - read-only install plans and their text/JSON rendering
//! - **[`resources`]** - idempotent `check + apply` filesystem primitives
//! - **[`tasks`]** - named units of work that execute a plan
//! - **[`commands`]** - subcommand orchestration (`init`, `doctor`, `platforms`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod detect;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod operations;
pub mod plan;
pub mod prompt;
pub mod resources;
pub mod tasks;
pub mod workspace;
