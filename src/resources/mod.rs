//! Idempotent resource primitives (check + apply pattern).
pub mod fs;
pub mod skill_dir;
pub mod template_file;

pub use skill_dir::SkillDirResource;
pub use template_file::TemplateFileResource;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// Implementations create parent directories as needed and bring the
    /// destination to the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// permission issues, or invalid paths.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of an installable resource on disk.
///
/// # Examples
///
/// ```
/// use aps_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let stale = ResourceState::Incorrect { current: "older copy".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(stale, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Destination does not exist.
    Missing,
    /// Destination exists and matches the source.
    Correct,
    /// Destination exists but differs from the source.
    Incorrect {
        /// Short description of what is there now.
        current: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use aps_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}

/// Resources that can determine their own state before applying.
///
/// ```ignore
/// if resource.needs_change()? {
///     resource.apply()?;
/// }
/// ```
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be inspected.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`current_state`](Self::current_state).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    struct TestResource {
        state: ResourceState,
    }

    impl Applicable for TestResource {
        fn description(&self) -> String {
            "test resource".to_string()
        }

        fn apply(&self) -> Result<ResourceChange> {
            Ok(ResourceChange::Applied)
        }
    }

    impl Resource for TestResource {
        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.state.clone())
        }
    }

    #[test]
    fn needs_change_for_missing_resource() {
        let resource = TestResource {
            state: ResourceState::Missing,
        };
        assert!(resource.needs_change().unwrap());
    }

    #[test]
    fn needs_change_for_incorrect_resource() {
        let resource = TestResource {
            state: ResourceState::Incorrect {
                current: "wrong".to_string(),
            },
        };
        assert!(resource.needs_change().unwrap());
    }

    #[test]
    fn no_change_for_correct_resource() {
        let resource = TestResource {
            state: ResourceState::Correct,
        };
        assert!(!resource.needs_change().unwrap());
    }
}
