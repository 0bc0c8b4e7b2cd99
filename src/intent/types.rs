//! Shared types and constants for intent classification

use serde::{Deserialize, Serialize};

/// Phrases that start a location lookup, checked in this order
pub const NAVIGATION_TRIGGERS: &[&str] = &["go to", "show me"];

/// Words that end an extracted location phrase
pub const LOCATION_STOP_WORDS: &[&str] = &[" in", " near", " with", " and"];

/// Verbs stripped from the left side of a fallback nearby-search split
pub const SEARCH_VERBS: &[&str] = &["find", "show", "search for", "display"];

/// Spoken overlay keyword and the overlay it toggles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTrigger {
    pub keyword: &'static str,
    pub overlay: &'static str,
}

/// Fixed overlay registry in match order
pub const OVERLAY_TRIGGERS: &[OverlayTrigger] = &[
    OverlayTrigger {
        keyword: "bhuvan",
        overlay: "Bhuvan India",
    },
    OverlayTrigger {
        keyword: "land use",
        overlay: "Tamil Nadu Land Use",
    },
    OverlayTrigger {
        keyword: "land degradation",
        overlay: "Tamil Nadu Land Degradation",
    },
    OverlayTrigger {
        keyword: "lulc",
        overlay: "SISDP Phase 2 LULC 10K",
    },
];

/// POI category and the place to search around
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbySearch {
    pub poi_type: String,
    pub location: String,
}

/// Classified meaning of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    PanToLocation { location: String },
    ZoomIn,
    ZoomOut,
    SetBaseLayer { name: String },
    SetOverlay { name: String, visible: bool },
    ClearMarkers,
    NearbySearch(NearbySearch),
    /// Carries the original transcript for the diagnostic echo
    Unrecognized { text: String },
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::PanToLocation { .. } => "pan_to_location",
            Intent::ZoomIn => "zoom_in",
            Intent::ZoomOut => "zoom_out",
            Intent::SetBaseLayer { .. } => "set_base_layer",
            Intent::SetOverlay { .. } => "set_overlay",
            Intent::ClearMarkers => "clear_markers",
            Intent::NearbySearch(_) => "nearby_search",
            Intent::Unrecognized { .. } => "unrecognized",
        }
    }
}
