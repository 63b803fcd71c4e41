//! Platform adapter descriptors: discovery, validation, and the registry.
//!
//! Each adapter lives in `<payload>/platforms/<dir>/` with a `manifest.json`
//! descriptor and an optional `templates/` tree.  Loading never fails on a
//! bad descriptor; problems are returned as warnings next to the registry.
pub mod descriptor;
pub mod marker;
pub mod registry;

use anyhow::Result;
use std::path::Path;

pub use descriptor::{ParsedDescriptor, Platform, parse_descriptor};
pub use marker::{DetectionMarker, MarkerInput, MarkerKind};
pub use registry::{KNOWN_ADAPTER_ORDER, PlatformOrder, PlatformRegistry};

use crate::error::ManifestError;
use crate::operations::FileSystemOps;

/// Descriptor file name inside each adapter directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// What to do with a descriptor that fails validation but still parses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Skip the platform and warn.
    #[default]
    Strict,
    /// Keep the best-effort record and warn.
    Lenient,
}

/// Options for [`load_platforms`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Handling of degraded descriptors.
    pub strictness: Strictness,
}

/// Result of scanning a payload's `platforms/` directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Platforms that were loaded, in directory-name order.
    pub registry: PlatformRegistry,
    /// One entry per skipped or degraded descriptor.
    pub warnings: Vec<ManifestError>,
}

/// Scan `<payload_root>/platforms/` and load every adapter descriptor.
///
/// Directories starting with `_` and directories without a `manifest.json`
/// are skipped silently.  A missing `platforms/` directory yields an empty
/// registry.
///
/// # Errors
///
/// Returns an error only if `platforms/` exists but cannot be listed.
pub fn load_platforms(
    payload_root: &Path,
    fs: &dyn FileSystemOps,
    options: LoadOptions,
) -> Result<LoadReport> {
    let platforms_dir = payload_root.join("platforms");
    if !fs.is_dir(&platforms_dir) {
        return Ok(LoadReport::default());
    }

    let mut loaded = Vec::new();
    let mut warnings = Vec::new();

    for dir in fs.read_dir(&platforms_dir)? {
        let skip = dir
            .file_name()
            .is_none_or(|n| n.to_string_lossy().starts_with('_'));
        if skip || !fs.is_dir(&dir) {
            continue;
        }
        let manifest_path = dir.join(MANIFEST_FILE);
        if !fs.exists(&manifest_path) {
            continue;
        }

        let text = match fs.read_to_string(&manifest_path) {
            Ok(text) => text,
            Err(source) => {
                warnings.push(ManifestError::Io {
                    path: manifest_path,
                    source,
                });
                continue;
            }
        };

        match parse_descriptor(&manifest_path, &dir, &text) {
            Ok(ParsedDescriptor::Valid(platform)) => loaded.push(platform),
            Ok(ParsedDescriptor::Degraded { platform, warning }) => {
                warnings.push(warning);
                if options.strictness == Strictness::Lenient {
                    loaded.push(platform);
                }
            }
            Err(e) => warnings.push(e),
        }
    }

    let (registry, duplicates) = PlatformRegistry::build(loaded);
    warnings.extend(duplicates);
    Ok(LoadReport { registry, warnings })
}
