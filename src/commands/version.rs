//! Command: print version information.
use anyhow::Result;
use std::io::Write;

/// Version stamped by `build.rs`, or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("APS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the installer version.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "aps {}", version())?;
    Ok(())
}
