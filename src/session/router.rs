//! Outcome routing
//!
//! Every outcome, immediate or resolved later, arrives on one channel. The
//! router logs it, shows it and refreshes the history in that order.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use tracing::{info, warn};

use super::presenter::Presenter;
use crate::dispatch::Outcome;
use crate::history::{CommandRecord, CommandStore};

/// Writes outcomes to the command store. Failures are reported and swallowed.
#[derive(Clone)]
pub struct OutcomeLogger {
    store: Option<Arc<dyn CommandStore>>,
}

impl OutcomeLogger {
    pub fn new(store: Option<Arc<dyn CommandStore>>) -> Self {
        Self { store }
    }

    /// Returns true when the outcome was written.
    pub fn log(&self, outcome: &Outcome) -> bool {
        let Some(store) = &self.store else {
            warn!("command store unavailable, not logging {:?}", outcome.command_text);
            return false;
        };
        match store.log_command(
            &outcome.command_text,
            outcome.succeeded,
            &outcome.response_text,
        ) {
            Ok(id) => {
                info!(id, succeeded = outcome.succeeded, "logged command");
                true
            }
            Err(e) => {
                warn!("failed to log command {:?}: {}", outcome.command_text, e);
                false
            }
        }
    }

    /// Current history, or `None` when it cannot be read.
    pub fn history(&self) -> Option<Vec<CommandRecord>> {
        let store = self.store.as_ref()?;
        match store.list_commands() {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("failed to load command history: {}", e);
                None
            }
        }
    }
}

/// An outcome waiting for the router, with an optional delivery ack
#[derive(Debug)]
pub struct QueuedOutcome {
    pub outcome: Outcome,
    pub delivered: Option<oneshot::Sender<()>>,
}

pub struct OutcomeRouter {
    outcomes: UnboundedReceiver<QueuedOutcome>,
    logger: OutcomeLogger,
    presenter: Arc<dyn Presenter>,
}

impl OutcomeRouter {
    pub fn new(
        outcomes: UnboundedReceiver<QueuedOutcome>,
        logger: OutcomeLogger,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            outcomes,
            logger,
            presenter,
        }
    }

    /// Deliver the next outcome. `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<Outcome> {
        let QueuedOutcome { outcome, delivered } = self.outcomes.recv().await?;
        self.deliver(&outcome);
        if let Some(ack) = delivered {
            // The submitter may have stopped waiting
            let _ = ack.send(());
        }
        Some(outcome)
    }

    /// Deliver outcomes until the session is dropped.
    pub async fn run(mut self) {
        while self.next().await.is_some() {}
        info!("outcome channel closed");
    }

    fn deliver(&self, outcome: &Outcome) {
        let logged = self.logger.log(outcome);
        self.presenter.show_outcome(outcome);
        if logged && let Some(records) = self.logger.history() {
            self.presenter.refresh_history(&records);
        }
    }
}
