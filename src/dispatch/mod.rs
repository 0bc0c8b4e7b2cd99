pub mod dispatcher;
pub mod outcome;

pub use dispatcher::{CommandDispatcher, DispatchSettings};
pub use outcome::{Dispatched, Outcome, PendingOutcome};
