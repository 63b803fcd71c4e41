use crate::logging::Log;
use crate::plan::InstallPlan;

/// Shared context for task execution.
pub struct Context<'a> {
    /// The plan being executed.
    pub plan: &'a InstallPlan,
    /// Logger for output and task recording.
    pub log: &'a dyn Log,
    /// Remove existing skill destinations before copying.
    ///
    /// Set when `--force` was given or the user confirmed the overwrite.
    pub replace_existing: bool,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("plan", &self.plan)
            .field("log", &"<dyn Log>")
            .field("replace_existing", &self.replace_existing)
            .finish()
    }
}

impl<'a> Context<'a> {
    /// Creates a new context for task execution.
    #[must_use]
    pub const fn new(plan: &'a InstallPlan, log: &'a dyn Log, replace_existing: bool) -> Self {
        Self {
            plan,
            log,
            replace_existing,
        }
    }
}
