//! Command: list bundled platform adapters.
use anyhow::Result;
use std::io::Write;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Log;
use crate::manifest::{PlatformOrder, PlatformRegistry};

/// Run the platforms command.
///
/// # Errors
///
/// Returns an error if the payload cannot be located or `out` cannot be
/// written.
pub fn run(global: &GlobalOpts, out: &mut dyn Write, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    write_list(&setup.registry, out)
}

/// Write the adapter list in UI order.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_list(registry: &PlatformRegistry, out: &mut dyn Write) -> Result<()> {
    if registry.is_empty() {
        writeln!(out, "No platform adapters found.")?;
        return Ok(());
    }
    writeln!(out, "Available platform adapters:")?;
    for platform in registry.ordered(PlatformOrder::Ui) {
        let version = platform
            .adapter_version()
            .map_or_else(|| "unknown".to_string(), |v| format!("v{v}"));
        writeln!(
            out,
            "- {}: {} ({version})",
            platform.platform_id(),
            platform.display_name()
        )?;
    }
    Ok(())
}
