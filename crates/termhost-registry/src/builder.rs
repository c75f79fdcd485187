//! Composition root for runner registration.

use std::{collections::HashMap, sync::Arc};

use termhost_core::Runner;
use thiserror::Error;

use crate::RunnerRegistry;

/// Registry build error.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("command identifier cannot be empty")]
    EmptyIdentifier,
    #[error("duplicate registration for command: {0}")]
    DuplicateIdentifier(String),
}

/// Accumulates runner registrations before a session starts.
///
/// Runners arrive already constructed; the builder never builds them
/// itself. Registration order is irrelevant. `build` validates the
/// accumulated set and produces the frozen [`RunnerRegistry`]; duplicate
/// identifiers are rejected at build time rather than silently
/// overwritten, so collisions fail fast before any session starts.
#[derive(Default)]
pub struct TerminalBuilder {
    entries: Vec<(String, Arc<dyn Runner>)>,
}

impl TerminalBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind `name` to `runner`.
    #[must_use]
    pub fn register<S, R>(self, name: S, runner: R) -> Self
    where
        S: Into<String>,
        R: Runner + 'static,
    {
        self.register_arc(name, Arc::new(runner))
    }

    /// Bind `name` to an already-shared runner instance.
    #[must_use]
    pub fn register_arc<S: Into<String>>(mut self, name: S, runner: Arc<dyn Runner>) -> Self {
        self.entries.push((name.into(), runner));
        self
    }

    /// Validate the accumulated registrations and freeze them.
    ///
    /// # Errors
    /// Returns an error for an empty identifier or a duplicate binding.
    pub fn build(self) -> Result<RunnerRegistry, BuildError> {
        let mut runners: HashMap<String, Arc<dyn Runner>> =
            HashMap::with_capacity(self.entries.len());
        for (name, runner) in self.entries {
            if name.is_empty() {
                return Err(BuildError::EmptyIdentifier);
            }
            if runners.insert(name.clone(), runner).is_some() {
                return Err(BuildError::DuplicateIdentifier(name));
            }
        }
        let registry = RunnerRegistry::from_runners(runners);
        tracing::debug!(commands = registry.len(), "dispatch table built");
        Ok(registry)
    }
}
