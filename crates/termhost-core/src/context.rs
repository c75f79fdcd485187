//! Per-invocation execution context.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// A command already resolved by the parsing layer: the canonical
/// identifier plus its ordered argument values.
///
/// The core makes no assumption about how the identifier was derived
/// from raw input; tokenization and grammar belong to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Canonical command identifier.
    pub name: String,
    /// Ordered argument values.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandRequest {
    /// Create a request with arguments.
    #[must_use]
    pub fn new<S, I>(name: S, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a request with no arguments.
    #[must_use]
    pub fn bare<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

/// Immutable input bundle handed to a runner for a single invocation.
///
/// One context is constructed per dispatched command and discarded once
/// the invocation completes or is cancelled; contexts are never shared
/// across concurrent runs.
#[derive(Debug)]
pub struct ExecutionContext {
    request: CommandRequest,
    cancellation: CancellationToken,
}

impl ExecutionContext {
    /// Create a context for one invocation.
    #[must_use]
    pub const fn new(request: CommandRequest, cancellation: CancellationToken) -> Self {
        Self {
            request,
            cancellation,
        }
    }

    /// The resolved command identifier.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.request.name
    }

    /// The ordered argument values.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.request.args
    }

    /// The cancellation signal for this invocation.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Completes when cancellation is requested for this invocation.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_collects_args() {
        let req = CommandRequest::new("echo", ["hi", "there"]);
        assert_eq!(req.name, "echo");
        assert_eq!(req.args, vec!["hi".to_string(), "there".to_string()]);

        let bare = CommandRequest::bare("status");
        assert!(bare.args.is_empty());
    }

    #[test]
    fn context_exposes_request_fields() {
        let ctx = ExecutionContext::new(
            CommandRequest::new("echo", ["hi"]),
            CancellationToken::new(),
        );
        assert_eq!(ctx.command(), "echo");
        assert_eq!(ctx.args(), ["hi".to_string()]);
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn context_observes_cancellation() {
        let token = CancellationToken::new();
        let ctx = ExecutionContext::new(CommandRequest::bare("sleep"), token.clone());

        token.cancel();
        assert!(ctx.is_cancelled());
        tokio_test::block_on(ctx.cancelled());
    }

    #[test]
    fn request_deserializes_without_args() {
        let req: CommandRequest = serde_json::from_str(r#"{"name":"status"}"#).unwrap();
        assert_eq!(req.name, "status");
        assert!(req.args.is_empty());
    }
}
