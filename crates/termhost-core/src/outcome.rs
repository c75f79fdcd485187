//! Typed per-invocation results.

use serde::{Deserialize, Serialize};

/// Status of a completed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The command completed successfully.
    Success,
    /// The command failed in a handled way, or a runner fault was
    /// contained at the dispatch boundary.
    Error,
    /// No runner is bound to the command identifier.
    Unrecognized,
    /// The invocation was cancelled before completion.
    Cancelled,
    /// The runner requested that the session terminate.
    Exit,
}

/// The outcome a runner produces for a single invocation.
///
/// Constructed through the associated functions, which keep the status
/// and exit-code fields consistent: only [`RunOutcome::exit`] populates
/// an exit code, and it always does. Deserialization enforces the same
/// consistency and rejects mismatched input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    status: RunStatus,
    message: Option<String>,
    exit_code: Option<i32>,
}

impl<'de> Deserialize<'de> for RunOutcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            status: RunStatus,
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            exit_code: Option<i32>,
        }

        let raw = Raw::deserialize(deserializer)?;
        match (raw.status, raw.exit_code) {
            (RunStatus::Exit, None) => Err(serde::de::Error::custom(
                "exit outcome requires an exit code",
            )),
            (status, Some(_)) if status != RunStatus::Exit => Err(serde::de::Error::custom(
                "exit code is only valid for exit outcomes",
            )),
            (status, exit_code) => Ok(Self {
                status,
                message: raw.message,
                exit_code,
            }),
        }
    }
}

impl RunOutcome {
    /// Successful completion with no payload.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            status: RunStatus::Success,
            message: None,
            exit_code: None,
        }
    }

    /// Successful completion with a payload message.
    #[must_use]
    pub fn success_with<S: Into<String>>(message: S) -> Self {
        Self {
            status: RunStatus::Success,
            message: Some(message.into()),
            exit_code: None,
        }
    }

    /// Handled failure with a description.
    #[must_use]
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            status: RunStatus::Error,
            message: Some(message.into()),
            exit_code: None,
        }
    }

    /// No runner bound to `command`.
    #[must_use]
    pub fn unrecognized<S: AsRef<str>>(command: S) -> Self {
        Self {
            status: RunStatus::Unrecognized,
            message: Some(format!("command not recognized: {}", command.as_ref())),
            exit_code: None,
        }
    }

    /// The invocation was cancelled.
    #[must_use]
    pub const fn cancelled() -> Self {
        Self {
            status: RunStatus::Cancelled,
            message: None,
            exit_code: None,
        }
    }

    /// Request that the session terminate with `code`.
    #[must_use]
    pub const fn exit(code: i32) -> Self {
        Self {
            status: RunStatus::Exit,
            message: None,
            exit_code: Some(code),
        }
    }

    /// The invocation status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Optional payload or failure description.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The requested exit code, present only for exit outcomes.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Whether this outcome asks the session to terminate.
    #[must_use]
    pub fn is_exit_request(&self) -> bool {
        self.status == RunStatus::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_always_carries_code() {
        let outcome = RunOutcome::exit(2);
        assert_eq!(outcome.status(), RunStatus::Exit);
        assert_eq!(outcome.exit_code(), Some(2));
        assert!(outcome.is_exit_request());
    }

    #[test]
    fn non_exit_outcomes_carry_no_code() {
        assert_eq!(RunOutcome::success().exit_code(), None);
        assert_eq!(RunOutcome::success_with("done").exit_code(), None);
        assert_eq!(RunOutcome::error("bad input").exit_code(), None);
        assert_eq!(RunOutcome::cancelled().exit_code(), None);
        assert_eq!(RunOutcome::unrecognized("frobnicate").exit_code(), None);
    }

    #[test]
    fn unrecognized_names_the_command() {
        let outcome = RunOutcome::unrecognized("frobnicate");
        assert_eq!(outcome.status(), RunStatus::Unrecognized);
        assert_eq!(
            outcome.message(),
            Some("command not recognized: frobnicate")
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&RunOutcome::exit(0)).unwrap();
        assert!(json.contains(r#""status":"exit""#));

        let parsed: RunOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, RunOutcome::exit(0));
    }

    #[test]
    fn deserialize_rejects_exit_without_code() {
        let err = serde_json::from_str::<RunOutcome>(
            r#"{"status":"exit","message":null,"exit_code":null}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exit outcome requires an exit code"));
    }

    #[test]
    fn deserialize_rejects_code_on_non_exit() {
        let err = serde_json::from_str::<RunOutcome>(r#"{"status":"success","exit_code":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("only valid for exit outcomes"));
    }

    #[test]
    fn deserialize_accepts_consistent_outcomes() {
        let parsed: RunOutcome =
            serde_json::from_str(r#"{"status":"exit","exit_code":2}"#).unwrap();
        assert_eq!(parsed, RunOutcome::exit(2));

        let parsed: RunOutcome =
            serde_json::from_str(r#"{"status":"error","message":"bad input"}"#).unwrap();
        assert_eq!(parsed, RunOutcome::error("bad input"));
    }
}
