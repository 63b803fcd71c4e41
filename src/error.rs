//! Domain-specific error types for the skill installer.
//!
//! Library modules return typed errors built with [`thiserror`]; command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! ApsError
//! ├── Manifest(ManifestError)  - one adapter descriptor is unusable (recoverable)
//! ├── Config(ConfigError)      - the invocation cannot be planned (fatal)
//! └── Conflict(ConflictError)  - a destination already exists (fatal without --force)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the installer.
#[derive(Error, Debug)]
pub enum ApsError {
    /// An adapter descriptor could not be loaded.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// The requested install cannot be planned.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A planned write would clobber existing content.
    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

/// Errors raised while reading or validating a platform descriptor.
///
/// These are recoverable: the loader logs them and skips the platform.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The descriptor file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path of the descriptor.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The descriptor is not valid JSON.
    #[error("invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        /// Path of the descriptor.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A required field is absent or has the wrong type.
    #[error("{}: missing or non-string field '{field}'", .path.display())]
    MissingField {
        /// Path of the descriptor.
        path: PathBuf,
        /// JSON field name.
        field: &'static str,
    },

    /// A required string field is empty.
    #[error("{}: field '{field}' must not be empty", .path.display())]
    EmptyField {
        /// Path of the descriptor.
        path: PathBuf,
        /// JSON field name.
        field: &'static str,
    },

    /// The `detectionMarkers` field is not a list.
    #[error("{}: 'detectionMarkers' must be an array", .path.display())]
    InvalidMarkerList {
        /// Path of the descriptor.
        path: PathBuf,
    },

    /// One detection marker could not be normalized.
    #[error("{}: detection marker #{index}: {reason}", .path.display())]
    InvalidMarker {
        /// Path of the descriptor.
        path: PathBuf,
        /// Zero-based position in `detectionMarkers`.
        index: usize,
        /// What is wrong with the marker.
        reason: String,
    },

    /// Another descriptor already claimed this platform id.
    #[error("duplicate platform id '{id}' in {}", .path.display())]
    DuplicatePlatformId {
        /// The repeated id.
        id: String,
        /// Path of the descriptor that was skipped.
        path: PathBuf,
    },
}

/// Fatal errors that prevent a plan from being built.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Repo scope was requested but no workspace could be found.
    #[error(
        "Repo install selected but no workspace root found. Run in a git repo or pass --root <path>."
    )]
    MissingWorkspaceRoot,

    /// The bundled skill payload could not be located.
    #[error("skill payload not found (searched: {})", display_paths(.searched))]
    PayloadNotFound {
        /// Every candidate directory that was checked.
        searched: Vec<PathBuf>,
    },

    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("cannot determine home directory: neither HOME nor USERPROFILE is set")]
    HomeNotFound,

    /// An explicitly requested platform is not bundled.
    #[error("unknown platform '{id}' (available: {})", .available.join(", "))]
    UnknownPlatform {
        /// The requested id.
        id: String,
        /// Ids of the bundled platforms.
        available: Vec<String>,
    },
}

/// Errors raised when a non-interactive install would overwrite content.
#[derive(Error, Debug)]
pub enum ConflictError {
    /// A skill destination already exists and `--force` was not given.
    #[error("Destination exists: {} (use --force to overwrite)", .path.display())]
    DestinationExists {
        /// The first conflicting destination.
        path: PathBuf,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
