//! Transcript → intent classification

pub mod classifier;
pub mod matchers;
pub mod types;

pub use classifier::{IntentClassifier, classify};
pub use types::{Intent, NearbySearch, OverlayTrigger};
