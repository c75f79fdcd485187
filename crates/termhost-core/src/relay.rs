//! Outcome delivery to the rendering/logging collaborator.

use crate::{RunOutcome, RunStatus};

/// Receives every outcome a session produces.
///
/// The host's obligation ends at handing the outcome over; rendering,
/// exit-code mapping, and persistence are the relay's concern.
pub trait ResultRelay: Send + Sync {
    /// Deliver the outcome of one invocation.
    fn relay(&self, command: &str, outcome: &RunOutcome);

    /// Called once when the session stops, after the last outcome.
    fn flush(&self) {}
}

/// Relay that logs outcomes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRelay;

impl ResultRelay for TracingRelay {
    fn relay(&self, command: &str, outcome: &RunOutcome) {
        match outcome.status() {
            RunStatus::Success => {
                tracing::info!(command = %command, message = ?outcome.message(), "command succeeded");
            }
            RunStatus::Error => {
                tracing::error!(command = %command, message = ?outcome.message(), "command failed");
            }
            RunStatus::Unrecognized => {
                tracing::warn!(command = %command, "command not recognized");
            }
            RunStatus::Cancelled => {
                tracing::info!(command = %command, "command cancelled");
            }
            RunStatus::Exit => {
                tracing::info!(command = %command, code = ?outcome.exit_code(), "exit requested");
            }
        }
    }
}
