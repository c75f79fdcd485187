//! Core abstractions for terminal command hosting.
//!
//! This crate provides the fundamental building blocks:
//! - `CommandRequest` - A resolved command identifier plus arguments
//! - `ExecutionContext` - Per-invocation input bundle passed to a runner
//! - `RunOutcome` / `RunStatus` - Typed per-invocation results
//! - `Runner` - The command handler contract
//! - `ResultRelay` - Outcome delivery to the rendering layer

pub mod context;
pub mod outcome;
pub mod relay;
pub mod runner;

pub use context::{CommandRequest, ExecutionContext};
pub use outcome::{RunOutcome, RunStatus};
pub use relay::{ResultRelay, TracingRelay};
pub use runner::Runner;
