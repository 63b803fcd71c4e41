//! The set of loaded platforms, keyed by id.
use crate::error::{ConfigError, ManifestError};

use super::descriptor::Platform;

/// Adapters listed first in interactive lists, in this order.
pub const KNOWN_ADAPTER_ORDER: &[&str] = &["vscode-copilot", "claude-code", "crush", "opencode"];

/// How [`PlatformRegistry::ordered`] sorts its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformOrder {
    /// Load order (platform directory names, bytewise).
    Insertion,
    /// Known adapters first, then the rest by display name.
    Ui,
}

/// Immutable registry of platform adapters built once per invocation.
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    platforms: Vec<Platform>,
}

impl PlatformRegistry {
    /// Build a registry, keeping the first platform for each id.
    ///
    /// Later duplicates are dropped and reported as warnings.
    #[must_use]
    pub fn build(platforms: impl IntoIterator<Item = Platform>) -> (Self, Vec<ManifestError>) {
        let mut kept: Vec<Platform> = Vec::new();
        let mut warnings = Vec::new();
        for platform in platforms {
            if kept
                .iter()
                .any(|p| p.platform_id() == platform.platform_id())
            {
                warnings.push(ManifestError::DuplicatePlatformId {
                    id: platform.platform_id().to_string(),
                    path: platform.manifest_path(),
                });
            } else {
                kept.push(platform);
            }
        }
        (Self { platforms: kept }, warnings)
    }

    /// Look up a platform by id.
    #[must_use]
    pub fn get(&self, platform_id: &str) -> Option<&Platform> {
        self.platforms
            .iter()
            .find(|p| p.platform_id() == platform_id)
    }

    /// Number of platforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    /// `true` if no platform was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Platforms in the requested order.
    #[must_use]
    pub fn ordered(&self, order: PlatformOrder) -> Vec<&Platform> {
        let mut out: Vec<&Platform> = self.platforms.iter().collect();
        if order == PlatformOrder::Ui {
            out.sort_by(|a, b| ui_sort_key(a).cmp(&ui_sort_key(b)));
        }
        out
    }

    /// Ids in the requested order.
    #[must_use]
    pub fn ids(&self, order: PlatformOrder) -> Vec<String> {
        self.ordered(order)
            .into_iter()
            .map(|p| p.platform_id().to_string())
            .collect()
    }

    /// Check that every id in `requested` is registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlatform`] for the first unknown id.
    pub fn check_known(&self, requested: &[String]) -> Result<(), ConfigError> {
        match requested.iter().find(|id| self.get(id).is_none()) {
            Some(id) => Err(ConfigError::UnknownPlatform {
                id: id.clone(),
                available: self.ids(PlatformOrder::Ui),
            }),
            None => Ok(()),
        }
    }
}

fn ui_sort_key(p: &Platform) -> (usize, String, String) {
    let rank = KNOWN_ADAPTER_ORDER
        .iter()
        .position(|known| *known == p.platform_id())
        .unwrap_or(KNOWN_ADAPTER_ORDER.len());
    let name = if rank < KNOWN_ADAPTER_ORDER.len() {
        String::new()
    } else {
        p.display_name().to_lowercase()
    };
    (rank, name, p.platform_id().to_string())
}
