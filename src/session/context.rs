//! Voice session
//!
//! Owns the classifier, dispatcher and the sending half of the outcome channel.
//! `submit` returns once the outcome is queued; the returned `Delivery` resolves
//! after the router has logged and shown it.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use super::presenter::Presenter;
use super::router::{OutcomeLogger, OutcomeRouter, QueuedOutcome};
use crate::dispatch::{CommandDispatcher, Dispatched};
use crate::history::CommandStore;
use crate::intent::IntentClassifier;
use crate::speech::{CaptureError, CaptureEvent, Transcript};

/// Everything a session needs, handed over at construction
pub struct SessionContext {
    pub classifier: IntentClassifier,
    pub dispatcher: CommandDispatcher,
    pub store: Option<Arc<dyn CommandStore>>,
    pub presenter: Arc<dyn Presenter>,
}

/// Resolves once the router has delivered a submitted outcome
#[derive(Debug)]
pub struct Delivery(oneshot::Receiver<()>);

impl Delivery {
    /// Returns false if the router went away before delivering.
    pub async fn delivered(self) -> bool {
        self.0.await.is_ok()
    }
}

pub struct VoiceSession {
    classifier: IntentClassifier,
    dispatcher: CommandDispatcher,
    presenter: Arc<dyn Presenter>,
    outcomes: UnboundedSender<QueuedOutcome>,
}

impl VoiceSession {
    /// Build a session and the router that drains its outcomes.
    pub fn new(ctx: SessionContext) -> (Self, OutcomeRouter) {
        let (tx, rx) = mpsc::unbounded_channel();
        let router = OutcomeRouter::new(rx, OutcomeLogger::new(ctx.store), ctx.presenter.clone());
        let session = Self {
            classifier: ctx.classifier,
            dispatcher: ctx.dispatcher,
            presenter: ctx.presenter,
            outcomes: tx,
        };
        (session, router)
    }

    /// Capture errors produce no outcome, so there is nothing to wait for.
    pub async fn handle_event(&self, event: CaptureEvent) -> Option<Delivery> {
        match event {
            CaptureEvent::Transcript(transcript) => Some(self.submit(transcript).await),
            CaptureEvent::Error(error) => {
                self.handle_capture_error(&error);
                None
            }
        }
    }

    /// Classify, dispatch and queue the outcome of one transcript.
    pub async fn submit(&self, transcript: Transcript) -> Delivery {
        let span = info_span!("command", cycle_id = %Uuid::new_v4());
        async {
            self.presenter
                .show_status(&format!("Command: {}", transcript));

            let intent = self.classifier.classify(transcript.as_str());
            let outcome = match self.dispatcher.dispatch(transcript.as_str(), intent) {
                Dispatched::Ready(outcome) => outcome,
                Dispatched::Pending(pending) => {
                    self.presenter.show_status(pending.progress());
                    pending.resolve().await
                }
            };

            let (ack, delivery) = oneshot::channel();
            let queued = QueuedOutcome {
                outcome,
                delivered: Some(ack),
            };
            if self.outcomes.send(queued).is_err() {
                warn!("outcome router is gone, dropping result for {:?}", transcript.as_str());
            }
            Delivery(delivery)
        }
        .instrument(span)
        .await
    }

    /// Capture errors are shown but never logged as commands.
    pub fn handle_capture_error(&self, error: &CaptureError) {
        warn!("speech capture failed: {:?}", error);
        self.presenter.show_status(&error.message());
    }
}
