//! Uniform command results
//!
//! A dispatched command is either `Ready` with its outcome or `Pending` on a
//! spawned task. Both end in exactly one `Outcome`.

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::error;

/// Terminal result of one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub command_text: String,
    pub succeeded: bool,
    pub response_text: String,
    pub completes_synchronously: bool,
}

impl Outcome {
    pub fn immediate(command_text: &str, succeeded: bool, response_text: impl Into<String>) -> Self {
        Self {
            command_text: command_text.to_string(),
            succeeded,
            response_text: response_text.into(),
            completes_synchronously: true,
        }
    }

    pub fn deferred(command_text: &str, succeeded: bool, response_text: impl Into<String>) -> Self {
        Self {
            command_text: command_text.to_string(),
            succeeded,
            response_text: response_text.into(),
            completes_synchronously: false,
        }
    }
}

/// Handle to an outcome still being computed
#[derive(Debug)]
pub struct PendingOutcome {
    progress: String,
    handle: JoinHandle<Outcome>,
    fallback: Outcome,
}

impl PendingOutcome {
    /// `fallback` is delivered if the task panics or is dropped by the runtime.
    pub fn new(progress: impl Into<String>, handle: JoinHandle<Outcome>, fallback: Outcome) -> Self {
        Self {
            progress: progress.into(),
            handle,
            fallback,
        }
    }

    /// Status line to show while waiting, e.g. "Finding location: chennai..."
    pub fn progress(&self) -> &str {
        &self.progress
    }

    pub async fn resolve(self) -> Outcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    "command task for {:?} failed: {}",
                    self.fallback.command_text, e
                );
                self.fallback
            }
        }
    }
}

/// What `dispatch` hands back
#[derive(Debug)]
pub enum Dispatched {
    Ready(Outcome),
    Pending(PendingOutcome),
}

impl Dispatched {
    pub fn is_pending(&self) -> bool {
        matches!(self, Dispatched::Pending(_))
    }

    /// Wait for the terminal outcome regardless of origin
    pub async fn resolve(self) -> Outcome {
        match self {
            Dispatched::Ready(outcome) => outcome,
            Dispatched::Pending(pending) => pending.resolve().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_resolves_to_itself() {
        let outcome = Outcome::immediate("zoom in", true, "Zoomed in");
        let resolved = Dispatched::Ready(outcome.clone()).resolve().await;
        assert_eq!(resolved, outcome);
        assert!(resolved.completes_synchronously);
    }

    #[tokio::test]
    async fn test_pending_resolves_to_task_result() {
        let handle = tokio::spawn(async { Outcome::deferred("go to x", true, "Showing: x") });
        let pending = PendingOutcome::new(
            "Finding location: x...",
            handle,
            Outcome::deferred("go to x", false, "Error finding location: x"),
        );
        assert_eq!(pending.progress(), "Finding location: x...");
        let outcome = pending.resolve().await;
        assert!(outcome.succeeded);
        assert!(!outcome.completes_synchronously);
    }

    #[tokio::test]
    async fn test_panicking_task_yields_fallback() {
        let handle = tokio::spawn(async {
            let fail = true;
            if fail {
                panic!("geocoder blew up");
            }
            Outcome::deferred("go to x", true, "Showing: x")
        });
        let fallback = Outcome::deferred("go to x", false, "Error finding location: x");
        let outcome = PendingOutcome::new("...", handle, fallback.clone())
            .resolve()
            .await;
        assert_eq!(outcome, fallback);
    }
}
