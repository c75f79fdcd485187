//! The hosted session state machine.

use std::{sync::Arc, time::Duration};

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use termhost_core::{CommandRequest, ExecutionContext, ResultRelay, RunOutcome, Runner};
use termhost_registry::RunnerRegistry;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Session identifier.
pub type SessionId = Uuid;

/// Lifecycle state of a hosted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Assembled but not yet started.
    Created,
    /// Start requested; internal state being initialized.
    Starting,
    /// Accepting and dispatching commands.
    Running,
    /// Stop in progress; no new commands accepted.
    Stopping,
    /// Terminal until an explicit restart.
    Stopped,
}

/// Session lifecycle error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is not running (state: {0:?})")]
    NotRunning(SessionState),
    #[error("session has already been started")]
    AlreadyStarted,
    #[error("dispatch table is empty")]
    EmptyDispatchTable,
    #[error("restart requires a stopped session (state: {0:?})")]
    NotStopped(SessionState),
}

/// How long a stop or cancellation waits for an in-flight runner before
/// the invocation is aborted.
const DEFAULT_CANCEL_GRACE: Duration = Duration::from_secs(5);

/// Long-running host that dispatches a stream of resolved commands.
///
/// One session is one logical terminal: commands are dispatched strictly
/// in arrival order, one at a time, and all session state (lifecycle,
/// invocation counter, recorded exit code) has the dispatch loop as its
/// single writer. The registry is shared read-only, so independent
/// sessions may run concurrently over one `Arc<RunnerRegistry>` without
/// coordination.
pub struct HostedSession {
    id: SessionId,
    registry: Arc<RunnerRegistry>,
    relay: Arc<dyn ResultRelay>,
    state: SessionState,
    dispatched: u64,
    exit_code: Option<i32>,
    shutdown: CancellationToken,
    cancel_grace: Duration,
}

impl HostedSession {
    /// Create a session in the `Created` state.
    #[must_use]
    pub fn new(registry: Arc<RunnerRegistry>, relay: Arc<dyn ResultRelay>) -> Self {
        Self {
            id: Uuid::new_v4(),
            registry,
            relay,
            state: SessionState::Created,
            dispatched: 0,
            exit_code: None,
            shutdown: CancellationToken::new(),
            cancel_grace: DEFAULT_CANCEL_GRACE,
        }
    }

    /// Override the grace period granted to cancelled runners.
    #[must_use]
    pub const fn with_cancel_grace(mut self, grace: Duration) -> Self {
        self.cancel_grace = grace;
        self
    }

    /// Unique identifier of this session.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Number of commands received while running, including unrecognized
    /// and faulting ones.
    #[must_use]
    pub const fn commands_dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Exit code recorded from the most recent exit-request outcome.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// A handle for requesting a stop from outside the dispatch loop.
    ///
    /// Cancelling the token stops the session at the next dispatch
    /// boundary and cancels any in-flight invocation. The token is
    /// replaced on restart; handles taken before a restart are inert.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Request a stop without waiting for it to complete.
    pub fn request_stop(&self) {
        self.shutdown.cancel();
    }

    /// Transition `Created -> Running`.
    ///
    /// # Errors
    /// Fails if the session was already started or the dispatch table is
    /// empty.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Created {
            return Err(SessionError::AlreadyStarted);
        }
        if self.registry.is_empty() {
            return Err(SessionError::EmptyDispatchTable);
        }
        self.state = SessionState::Starting;
        self.dispatched = 0;
        self.exit_code = None;
        self.state = SessionState::Running;
        tracing::info!(session = %self.id, commands = self.registry.len(), "session running");
        Ok(())
    }

    /// Dispatch one resolved command.
    ///
    /// The invocation's cancellation signal is a child of the session
    /// shutdown token, so a stop request cancels in-flight work.
    ///
    /// # Errors
    /// Fails if the session is not in the `Running` state.
    pub async fn dispatch(&mut self, request: CommandRequest) -> Result<RunOutcome, SessionError> {
        let cancel = self.shutdown.child_token();
        self.dispatch_with_cancellation(request, cancel).await
    }

    /// Dispatch one resolved command with a caller-supplied cancellation
    /// signal, allowing a single invocation to be cancelled without
    /// stopping the session.
    ///
    /// # Errors
    /// Fails if the session is not in the `Running` state.
    pub async fn dispatch_with_cancellation(
        &mut self,
        request: CommandRequest,
        cancel: CancellationToken,
    ) -> Result<RunOutcome, SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning(self.state));
        }
        if self.shutdown.is_cancelled() {
            self.stop();
            return Err(SessionError::NotRunning(self.state));
        }

        // Exactly one increment per received command, whatever the outcome.
        self.dispatched += 1;

        let name = request.name.clone();
        let outcome = match self.registry.resolve(&name) {
            Some(runner) => self.invoke(runner, request, cancel).await,
            None => {
                tracing::warn!(session = %self.id, command = %name, "command not recognized");
                RunOutcome::unrecognized(&name)
            }
        };

        self.relay.relay(&name, &outcome);

        if outcome.is_exit_request() {
            self.exit_code = outcome.exit_code();
            tracing::info!(session = %self.id, code = ?self.exit_code, "exit requested");
            self.stop();
        }

        Ok(outcome)
    }

    /// Drive the session from a stream of resolved commands.
    ///
    /// Commands are dispatched strictly in arrival order, one at a time.
    /// Returns once the stream ends, a runner requests exit, or the
    /// shutdown token fires; the session is stopped in all three cases.
    ///
    /// # Errors
    /// Fails if the session is not in the `Running` state when called.
    pub async fn serve<S>(&mut self, mut commands: S) -> Result<(), SessionError>
    where
        S: Stream<Item = CommandRequest> + Unpin,
    {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning(self.state));
        }

        let shutdown = self.shutdown.clone();
        loop {
            if self.state != SessionState::Running {
                break;
            }
            let next = tokio::select! {
                () = shutdown.cancelled() => None,
                next = commands.next() => next,
            };
            let Some(request) = next else { break };
            if self.dispatch(request).await.is_err() {
                break;
            }
        }
        self.stop();
        Ok(())
    }

    /// Transition to `Stopped`, cancelling in-flight work and flushing
    /// the relay. Idempotent; accepts no further commands afterwards.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.state = SessionState::Stopping;
        self.shutdown.cancel();
        self.relay.flush();
        self.state = SessionState::Stopped;
        tracing::info!(session = %self.id, dispatched = self.dispatched, "session stopped");
    }

    /// Return a stopped session to `Created` with a zeroed counter and a
    /// fresh shutdown token.
    ///
    /// # Errors
    /// Fails unless the session is in the `Stopped` state.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Stopped {
            return Err(SessionError::NotStopped(self.state));
        }
        self.state = SessionState::Created;
        self.dispatched = 0;
        self.exit_code = None;
        self.shutdown = CancellationToken::new();
        tracing::info!(session = %self.id, "session reset");
        Ok(())
    }

    /// Invoke `runner` on its own task so that faults and panics stop at
    /// the dispatch boundary instead of taking the session down.
    async fn invoke(
        &self,
        runner: Arc<dyn Runner>,
        request: CommandRequest,
        cancel: CancellationToken,
    ) -> RunOutcome {
        let command = request.name.clone();
        let ctx = ExecutionContext::new(request, cancel.clone());
        let mut handle: JoinHandle<anyhow::Result<RunOutcome>> =
            tokio::spawn(async move { runner.run(ctx).await });

        let joined = tokio::select! {
            res = &mut handle => Some(res),
            () = cancel.cancelled() => None,
            () = self.shutdown.cancelled() => {
                cancel.cancel();
                None
            }
        };

        let joined = match joined {
            Some(res) => res,
            // Cancelled: grant the runner a bounded window to wind down,
            // then abort so a misbehaving runner cannot block shutdown.
            None => match tokio::time::timeout(self.cancel_grace, &mut handle).await {
                Ok(res) => res,
                Err(_) => {
                    handle.abort();
                    tracing::warn!(
                        session = %self.id,
                        command = %command,
                        grace = ?self.cancel_grace,
                        "runner ignored cancellation, aborting"
                    );
                    return RunOutcome::cancelled();
                }
            },
        };

        match joined {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(fault)) => {
                tracing::error!(session = %self.id, command = %command, error = %fault, "runner fault");
                RunOutcome::error(format!("runner fault: {fault:#}"))
            }
            Err(join_err) if join_err.is_panic() => {
                tracing::error!(session = %self.id, command = %command, "runner panicked");
                RunOutcome::error(format!("runner for '{command}' panicked"))
            }
            Err(_) => RunOutcome::cancelled(),
        }
    }
}

impl std::fmt::Debug for HostedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("dispatched", &self.dispatched)
            .finish_non_exhaustive()
    }
}
