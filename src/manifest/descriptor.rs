//! Parsing and validation of one `manifest.json` descriptor.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::marker::{DetectionMarker, MarkerInput};
use crate::error::ManifestError;

/// A validated platform adapter.
///
/// Built once by the loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    platform_id: String,
    display_name: String,
    adapter_version: Option<String>,
    description: Option<String>,
    markers: Vec<DetectionMarker>,
    #[serde(skip)]
    dir: PathBuf,
}

impl Platform {
    /// Create a platform with no markers and no version.
    #[must_use]
    pub fn new(platform_id: &str, display_name: &str, dir: impl Into<PathBuf>) -> Self {
        Self {
            platform_id: platform_id.to_string(),
            display_name: display_name.to_string(),
            adapter_version: None,
            description: None,
            markers: Vec::new(),
            dir: dir.into(),
        }
    }

    /// Set the adapter version.
    #[must_use]
    pub fn with_adapter_version(mut self, version: &str) -> Self {
        self.adapter_version = Some(version.to_string());
        self
    }

    /// Set the detection markers.
    #[must_use]
    pub fn with_markers(mut self, markers: Vec<DetectionMarker>) -> Self {
        self.markers = markers;
        self
    }

    /// Stable identifier, e.g. `claude-code`.
    #[must_use]
    pub fn platform_id(&self) -> &str {
        &self.platform_id
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Adapter version, if the descriptor declares one.
    #[must_use]
    pub fn adapter_version(&self) -> Option<&str> {
        self.adapter_version.as_deref()
    }

    /// Free-form description, if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Detection markers in declaration order.
    #[must_use]
    pub fn markers(&self) -> &[DetectionMarker] {
        &self.markers
    }

    /// Adapter directory inside the payload.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The adapter's template tree (may not exist).
    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.dir.join("templates")
    }

    /// The descriptor file this platform was loaded from.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(super::MANIFEST_FILE)
    }
}

/// Outcome of parsing a structurally valid JSON descriptor.
#[derive(Debug)]
pub enum ParsedDescriptor {
    /// Every field validated.
    Valid(Platform),
    /// Validation failed; `platform` holds what could be salvaged.
    Degraded {
        /// Best-effort record: ids fall back to the directory name and only
        /// markers that normalize are kept.
        platform: Platform,
        /// The first validation failure.
        warning: ManifestError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    #[serde(default)]
    platform_id: Value,
    #[serde(default)]
    display_name: Value,
    #[serde(default)]
    adapter_version: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    detection_markers: Value,
}

/// Parse the descriptor text found at `path` for the adapter in `dir`.
///
/// # Errors
///
/// Returns [`ManifestError::InvalidJson`] when `text` is not a JSON object;
/// every other problem yields [`ParsedDescriptor::Degraded`].
pub fn parse_descriptor(
    path: &Path,
    dir: &Path,
    text: &str,
) -> Result<ParsedDescriptor, ManifestError> {
    let raw: RawDescriptor =
        serde_json::from_str(text).map_err(|source| ManifestError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

    let dir_name = dir
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().to_string());

    let mut first_error: Option<ManifestError> = None;
    let mut note = |e: ManifestError| {
        if first_error.is_none() {
            first_error = Some(e);
        }
    };

    let platform_id = required_string(path, "platformId", &raw.platform_id).unwrap_or_else(|e| {
        note(e);
        dir_name.clone()
    });
    let display_name =
        required_string(path, "displayName", &raw.display_name).unwrap_or_else(|e| {
            note(e);
            dir_name.clone()
        });
    let adapter_version =
        optional_string(path, "adapterVersion", &raw.adapter_version).unwrap_or_else(|e| {
            note(e);
            None
        });
    let description = optional_string(path, "description", &raw.description).unwrap_or_else(|e| {
        note(e);
        None
    });

    let mut markers = Vec::new();
    match &raw.detection_markers {
        Value::Null => {}
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let normalized = serde_json::from_value::<MarkerInput>(item.clone())
                    .map_err(|_| "expected a string or an object with kind and relPath".to_string())
                    .and_then(DetectionMarker::normalize);
                match normalized {
                    Ok(marker) => markers.push(marker),
                    Err(reason) => note(ManifestError::InvalidMarker {
                        path: path.to_path_buf(),
                        index,
                        reason,
                    }),
                }
            }
        }
        _ => note(ManifestError::InvalidMarkerList {
            path: path.to_path_buf(),
        }),
    }

    let platform = Platform {
        platform_id,
        display_name,
        adapter_version,
        description,
        markers,
        dir: dir.to_path_buf(),
    };

    Ok(match first_error {
        None => ParsedDescriptor::Valid(platform),
        Some(warning) => ParsedDescriptor::Degraded { platform, warning },
    })
}

fn required_string(path: &Path, field: &'static str, value: &Value) -> Result<String, ManifestError> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err(ManifestError::EmptyField {
            path: path.to_path_buf(),
            field,
        }),
        Value::String(s) => Ok(s.clone()),
        _ => Err(ManifestError::MissingField {
            path: path.to_path_buf(),
            field,
        }),
    }
}

fn optional_string(
    path: &Path,
    field: &'static str,
    value: &Value,
) -> Result<Option<String>, ManifestError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(ManifestError::MissingField {
            path: path.to_path_buf(),
            field,
        }),
    }
}
