pub mod context;
pub mod presenter;
pub mod router;

pub use context::{Delivery, SessionContext, VoiceSession};
pub use presenter::{ConsolePresenter, Presenter};
pub use router::{OutcomeLogger, OutcomeRouter, QueuedOutcome};
