//! The frozen dispatch table.

use std::{collections::HashMap, sync::Arc};

use termhost_core::Runner;

/// Maps command identifiers to runner instances.
///
/// Built once through [`crate::TerminalBuilder`] and read-only afterwards,
/// so multiple sessions can resolve concurrently from a shared `Arc`
/// without locking.
pub struct RunnerRegistry {
    runners: HashMap<String, Arc<dyn Runner>>,
}

impl RunnerRegistry {
    pub(crate) fn from_runners(runners: HashMap<String, Arc<dyn Runner>>) -> Self {
        Self { runners }
    }

    /// Look up the runner bound to `name`.
    ///
    /// Lookup is exact-match; `None` means no runner is bound, which the
    /// session surfaces as an unrecognized-command outcome.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Runner>> {
        self.runners.get(name).map(Arc::clone)
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// Whether the registry holds no runners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Iterate over the registered command identifiers.
    #[must_use]
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.runners.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for RunnerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.commands().collect();
        names.sort_unstable();
        f.debug_struct("RunnerRegistry")
            .field("commands", &names)
            .finish()
    }
}
