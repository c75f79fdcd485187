//! The command handler contract.

use async_trait::async_trait;

use crate::{ExecutionContext, RunOutcome};

/// Contract implemented by every command handler.
///
/// The host invokes `run` at most once per dispatched command and never
/// retries on its own; retry policy, if any, belongs to the runner or an
/// external supervisor. Expected business failures belong in the returned
/// [`RunOutcome`] status; an `Err` is reserved for unexpected faults and
/// is converted to an error-status outcome at the dispatch boundary.
///
/// Runners observing the context's cancellation signal should wind down
/// promptly and return [`RunOutcome::cancelled`].
#[async_trait]
pub trait Runner: Send + Sync {
    /// Execute the command described by `ctx`.
    ///
    /// # Errors
    /// Returns an error only for unexpected faults.
    async fn run(&self, ctx: ExecutionContext) -> anyhow::Result<RunOutcome>;
}
