//! Runner registration and resolution.
//!
//! Provides:
//! - `TerminalBuilder` - Composition root where runners are registered
//! - `RunnerRegistry` - The frozen dispatch table consumed by sessions

pub mod builder;
pub mod registry;

pub use builder::{BuildError, TerminalBuilder};
pub use registry::RunnerRegistry;
