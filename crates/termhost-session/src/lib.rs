//! Hosted session lifecycle and command dispatch.
//!
//! A [`HostedSession`] owns a frozen dispatch table and drives the
//! steady-state loop: resolve each incoming command, invoke its runner,
//! relay the outcome, and track session state until an exit request or
//! an external stop signal.

pub mod session;

pub use session::{HostedSession, SessionError, SessionId, SessionState};
