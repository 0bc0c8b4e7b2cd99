use tracing::debug;

use crate::dispatch::Outcome;
use crate::history::CommandRecord;

/// User-facing display for statuses, outcomes and the history list
pub trait Presenter: Send + Sync {
    /// Transient status line ("Command: ...", progress text, capture errors)
    fn show_status(&self, text: &str);

    fn show_outcome(&self, outcome: &Outcome);

    /// Called with the full history, newest first, after each successful write
    fn refresh_history(&self, records: &[CommandRecord]);
}

/// Prints to stdout; logs go to stderr so the two never interleave on one stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn show_status(&self, text: &str) {
        println!("{}", text);
    }

    fn show_outcome(&self, outcome: &Outcome) {
        let marker = if outcome.succeeded { "ok" } else { "!!" };
        println!("[{}] {}", marker, outcome.response_text);
    }

    fn refresh_history(&self, records: &[CommandRecord]) {
        debug!("history now holds {} commands", records.len());
    }
}
