//! Intent classification for transcripts
//!
//! Rules are checked in a fixed priority order and the first match wins.
//! Navigation ("go to", "show me") is checked before everything else, so
//! "go to satellite view" is a location lookup for "satellite view".

use tracing::debug;

use super::matchers::{contains, contains_any, extract_location, extract_nearby_search};
use super::types::{Intent, OVERLAY_TRIGGERS, OverlayTrigger};
use crate::map::layers::{OPEN_STREET_MAP, SATELLITE};

/// Applies the pattern matchers in priority order.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    overlays: Vec<OverlayTrigger>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            overlays: OVERLAY_TRIGGERS.to_vec(),
        }
    }

    /// Classifier with a custom overlay registry
    pub fn with_overlays(overlays: Vec<OverlayTrigger>) -> Self {
        Self { overlays }
    }

    /// Classify a transcript into exactly one intent. Never fails.
    pub fn classify(&self, transcript: &str) -> Intent {
        let intent = self.match_rules(transcript);
        debug!(intent = intent.as_str(), "classified transcript: {}", transcript);
        intent
    }

    fn match_rules(&self, text: &str) -> Intent {
        if contains_any(text, &["go to", "show me"])
            && let Some(location) = extract_location(text)
        {
            return Intent::PanToLocation { location };
        }

        if contains(text, "zoom in") {
            return Intent::ZoomIn;
        }
        if contains(text, "zoom out") {
            return Intent::ZoomOut;
        }

        if contains(text, "satellite") {
            return Intent::SetBaseLayer {
                name: SATELLITE.to_string(),
            };
        }
        if (contains(text, "map") && !contains(text, "satellite"))
            || contains(text, "street")
            || contains(text, "default view")
        {
            return Intent::SetBaseLayer {
                name: OPEN_STREET_MAP.to_string(),
            };
        }

        if let Some(intent) = self.match_overlay(text) {
            return intent;
        }

        if contains(text, "clear") && contains_any(text, &["marker", "result"]) {
            return Intent::ClearMarkers;
        }

        if contains_any(text, &["find", "search for"])
            && contains_any(text, &["near", "around", "in"])
        {
            match extract_nearby_search(text) {
                Some(search) => return Intent::NearbySearch(search),
                None => debug!("nearby-search trigger matched but extraction failed"),
            }
        }

        Intent::Unrecognized {
            text: text.to_string(),
        }
    }

    fn match_overlay(&self, text: &str) -> Option<Intent> {
        for trigger in &self.overlays {
            let show = [
                format!("show {}", trigger.keyword),
                format!("enable {}", trigger.keyword),
            ];
            if show.iter().any(|p| contains(text, p)) {
                return Some(Intent::SetOverlay {
                    name: trigger.overlay.to_string(),
                    visible: true,
                });
            }

            let hide = [
                format!("hide {}", trigger.keyword),
                format!("disable {}", trigger.keyword),
            ];
            if hide.iter().any(|p| contains(text, p)) {
                return Some(Intent::SetOverlay {
                    name: trigger.overlay.to_string(),
                    visible: false,
                });
            }
        }
        None
    }
}

/// Classify with the default overlay registry
pub fn classify(transcript: &str) -> Intent {
    IntentClassifier::new().classify(transcript)
}
