//! Command dispatch
//!
//! Routes a classified intent to the map surface, geocoder or POI finder and
//! turns whatever happens into an `Outcome`. Network lookups run on spawned
//! tasks and come back as `Dispatched::Pending`; every failure is converted to
//! its fixed response text here and never escapes as an error.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{error, info, warn};

use super::outcome::{Dispatched, Outcome, PendingOutcome};
use crate::config::Config;
use crate::intent::{Intent, NearbySearch};
use crate::map::{LayerChange, MapSurface};
use crate::services::{GeocodeError, Geocoder, PoiFinder, tag_expression};

/// Zoom levels and search radius used by location commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub pan_zoom: u8,
    pub search_zoom: u8,
    pub poi_radius_m: u32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            pan_zoom: 12,
            search_zoom: 14,
            poi_radius_m: 5000,
        }
    }
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            pan_zoom: config.map.pan_zoom,
            search_zoom: config.map.search_zoom,
            poi_radius_m: config.services.poi_radius_m,
        }
    }
}

#[derive(Clone)]
pub struct CommandDispatcher {
    map: Option<Arc<dyn MapSurface>>,
    geocoder: Arc<dyn Geocoder>,
    poi_finder: Arc<dyn PoiFinder>,
    settings: DispatchSettings,
}

impl CommandDispatcher {
    pub fn new(
        map: Option<Arc<dyn MapSurface>>,
        geocoder: Arc<dyn Geocoder>,
        poi_finder: Arc<dyn PoiFinder>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            map,
            geocoder,
            poi_finder,
            settings,
        }
    }

    /// Dispatch `intent`, classified from `command_text`.
    ///
    /// Must be called inside a tokio runtime: network-bound intents spawn a task.
    pub fn dispatch(&self, command_text: &str, intent: Intent) -> Dispatched {
        info!(intent = intent.as_str(), "dispatching {:?}", command_text);

        match intent {
            Intent::PanToLocation { location } => self.spawn_pan(command_text, location),
            Intent::NearbySearch(search) => self.spawn_nearby(command_text, search),
            Intent::ZoomIn => self.on_map(command_text, "zoom in", |map| map.zoom_in(), |_| {
                (true, "Zoomed in".to_string())
            }),
            Intent::ZoomOut => self.on_map(command_text, "zoom out", |map| map.zoom_out(), |_| {
                (true, "Zoomed out".to_string())
            }),
            Intent::SetBaseLayer { name } => self.on_map(
                command_text,
                "set base layer",
                |map| map.set_base_layer(&name),
                |change| match change.unwrap_or(LayerChange::Unknown) {
                    LayerChange::Applied => (true, format!("Switched to {} view", name)),
                    LayerChange::Unknown => (false, "Unknown map layer".to_string()),
                },
            ),
            Intent::SetOverlay { name, visible } => self.on_map(
                command_text,
                "toggle overlay",
                |map| map.set_overlay_visible(&name, visible),
                |change| match change.unwrap_or(LayerChange::Unknown) {
                    LayerChange::Applied if visible => (true, format!("Showing {} layer", name)),
                    LayerChange::Applied => (true, format!("Hiding {} layer", name)),
                    LayerChange::Unknown => (false, "Unknown overlay layer".to_string()),
                },
            ),
            Intent::ClearMarkers => {
                self.on_map(command_text, "clear markers", |map| map.clear_markers(), |_| {
                    (true, "Cleared all markers".to_string())
                })
            }
            Intent::Unrecognized { text } => Dispatched::Ready(Outcome::immediate(
                command_text,
                false,
                format!("Sorry, I didn't understand: \"{}\"", text),
            )),
        }
    }

    /// Run a synchronous map action and build its outcome.
    ///
    /// `describe` gets `None` when no map is attached. A panicking map yields
    /// a failed "Map error: could not {action}" outcome.
    fn on_map<T>(
        &self,
        command_text: &str,
        action: &str,
        f: impl FnOnce(&dyn MapSurface) -> T,
        describe: impl FnOnce(Option<T>) -> (bool, String),
    ) -> Dispatched {
        let result = match &self.map {
            Some(map) => {
                let map = map.as_ref();
                panic::catch_unwind(AssertUnwindSafe(|| f(map))).map(Some)
            }
            None => {
                warn!("map unavailable, skipping {}", action);
                Ok(None)
            }
        };

        let outcome = match result {
            Ok(effect) => {
                let (succeeded, text) = describe(effect);
                Outcome::immediate(command_text, succeeded, text)
            }
            Err(_) => {
                error!("map failed during {} for {:?}", action, command_text);
                Outcome::immediate(command_text, false, format!("Map error: could not {}", action))
            }
        };
        Dispatched::Ready(outcome)
    }

    fn spawn_pan(&self, command_text: &str, location: String) -> Dispatched {
        let progress = format!("Finding location: {}...", location);
        let fallback = Outcome::deferred(
            command_text,
            false,
            format!("Error finding location: {}", location),
        );

        let map = self.map.clone();
        let geocoder = Arc::clone(&self.geocoder);
        let zoom = self.settings.pan_zoom;
        let command = command_text.to_string();

        let handle = tokio::spawn(async move {
            let (succeeded, text) = pan_to_location(map, geocoder, &location, zoom).await;
            Outcome::deferred(&command, succeeded, text)
        });

        Dispatched::Pending(PendingOutcome::new(progress, handle, fallback))
    }

    fn spawn_nearby(&self, command_text: &str, search: NearbySearch) -> Dispatched {
        let progress = format!(
            "Searching for {} near {}...",
            search.poi_type, search.location
        );
        let fallback = Outcome::deferred(
            command_text,
            false,
            format!("Error searching for {}", search.poi_type),
        );

        let map = self.map.clone();
        let geocoder = Arc::clone(&self.geocoder);
        let poi_finder = Arc::clone(&self.poi_finder);
        let settings = self.settings;
        let command = command_text.to_string();

        let handle = tokio::spawn(async move {
            let (succeeded, text) =
                nearby_search(map, geocoder, poi_finder, &search, settings).await;
            Outcome::deferred(&command, succeeded, text)
        });

        Dispatched::Pending(PendingOutcome::new(progress, handle, fallback))
    }
}

async fn pan_to_location(
    map: Option<Arc<dyn MapSurface>>,
    geocoder: Arc<dyn Geocoder>,
    location: &str,
    zoom: u8,
) -> (bool, String) {
    match geocoder.geocode(location).await {
        Ok(point) => {
            if let Some(map) = &map {
                map.pan_zoom_to(point.lat, point.lon, zoom);
                map.place_marker(point.lat, point.lon, &point.display_name);
            } else {
                warn!("map unavailable, not panning to {}", point.display_name);
            }
            (true, format!("Showing: {}", location))
        }
        Err(GeocodeError::NotFound(_)) => (false, format!("Couldn't find location: {}", location)),
        Err(GeocodeError::Transport(e)) => {
            warn!("geocoding '{}' failed: {}", location, e);
            (false, format!("Error finding location: {}", location))
        }
    }
}

async fn nearby_search(
    map: Option<Arc<dyn MapSurface>>,
    geocoder: Arc<dyn Geocoder>,
    poi_finder: Arc<dyn PoiFinder>,
    search: &NearbySearch,
    settings: DispatchSettings,
) -> (bool, String) {
    let NearbySearch { poi_type, location } = search;

    let point = match geocoder.geocode(location).await {
        Ok(point) => point,
        Err(e) => {
            warn!("POI search error: {}", e);
            return (false, format!("Error finding {}", location));
        }
    };

    if let Some(map) = &map {
        map.pan_zoom_to(point.lat, point.lon, settings.search_zoom);
        map.clear_markers();
    }

    let tag = tag_expression(poi_type);
    let pois = match poi_finder
        .find_nearby(&tag, point.lat, point.lon, settings.poi_radius_m)
        .await
    {
        Ok(pois) => pois,
        Err(e) => {
            warn!("POI search error: {}", e);
            return (false, format!("Error searching for {}", poi_type));
        }
    };

    if pois.is_empty() {
        return (false, format!("No {} found near {}", poi_type, location));
    }

    if let Some(map) = &map {
        for poi in &pois {
            map.place_marker(poi.lat, poi.lon, poi.name.as_deref().unwrap_or(poi_type));
        }
    }
    (
        true,
        format!("Found {} {} near {}", pois.len(), poi_type, location),
    )
}
