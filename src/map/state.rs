//! In-process map surface.
//!
//! Holds the view, the active base layer, overlay visibility and the marker
//! set behind one mutex. Commands whose async chains overlap write here in
//! completion order, so the last chain to finish wins.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::layers::{BaseLayer, OPEN_STREET_MAP, Overlay, default_base_layers, default_overlays};
use super::surface::{LayerChange, MapSurface, Marker};
use crate::config::{MAX_ZOOM, MapConfig};

/// Point-in-time copy of the map state
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub active_base_layer: Option<String>,
    pub visible_overlays: BTreeSet<String>,
    pub markers: Vec<Marker>,
}

#[derive(Debug)]
struct MapState {
    view: MapView,
    base_layers: Vec<BaseLayer>,
    overlays: Vec<Overlay>,
}

impl MapState {
    fn max_zoom(&self) -> u8 {
        self.view
            .active_base_layer
            .as_ref()
            .and_then(|name| self.base_layers.iter().find(|l| &l.name == name))
            .map(|l| l.max_zoom)
            .unwrap_or(MAX_ZOOM)
    }
}

#[derive(Debug)]
pub struct InMemoryMap {
    state: Mutex<MapState>,
}

impl Default for InMemoryMap {
    fn default() -> Self {
        Self::new(&MapConfig::default())
    }
}

impl InMemoryMap {
    pub fn new(config: &MapConfig) -> Self {
        Self::with_layers(config, default_base_layers(), default_overlays())
    }

    pub fn with_layers(config: &MapConfig, base_layers: Vec<BaseLayer>, overlays: Vec<Overlay>) -> Self {
        let active = base_layers
            .iter()
            .find(|l| l.name == OPEN_STREET_MAP)
            .or_else(|| base_layers.first())
            .map(|l| l.name.clone());

        Self {
            state: Mutex::new(MapState {
                view: MapView {
                    center: (config.initial_lat, config.initial_lon),
                    zoom: config.initial_zoom,
                    active_base_layer: active,
                    visible_overlays: BTreeSet::new(),
                    markers: Vec::new(),
                },
                base_layers,
                overlays,
            }),
        }
    }

    pub fn view(&self) -> MapView {
        self.lock().view.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MapState> {
        // A panic mid-update leaves plain data behind; keep serving it
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MapSurface for InMemoryMap {
    fn pan_zoom_to(&self, lat: f64, lon: f64, zoom: u8) {
        let mut state = self.lock();
        let zoom = zoom.min(state.max_zoom());
        state.view.center = (lat, lon);
        state.view.zoom = zoom;
        debug!("map view set to ({}, {}) @ {}", lat, lon, zoom);
    }

    fn zoom_in(&self) {
        let mut state = self.lock();
        let max = state.max_zoom();
        state.view.zoom = state.view.zoom.saturating_add(1).min(max);
    }

    fn zoom_out(&self) {
        let mut state = self.lock();
        state.view.zoom = state.view.zoom.saturating_sub(1);
    }

    fn set_base_layer(&self, name: &str) -> LayerChange {
        let mut state = self.lock();
        // All base layers come off first, even when the requested one is unknown
        state.view.active_base_layer = None;
        if state.base_layers.iter().any(|l| l.name == name) {
            state.view.active_base_layer = Some(name.to_string());
            let max = state.max_zoom();
            state.view.zoom = state.view.zoom.min(max);
            LayerChange::Applied
        } else {
            LayerChange::Unknown
        }
    }

    fn set_overlay_visible(&self, name: &str, visible: bool) -> LayerChange {
        let mut state = self.lock();
        if !state.overlays.iter().any(|o| o.name == name) {
            return LayerChange::Unknown;
        }
        if visible {
            state.view.visible_overlays.insert(name.to_string());
        } else {
            state.view.visible_overlays.remove(name);
        }
        LayerChange::Applied
    }

    fn place_marker(&self, lat: f64, lon: f64, label: &str) {
        self.lock().view.markers.push(Marker {
            lat,
            lon,
            label: label.to_string(),
        });
    }

    fn clear_markers(&self) {
        self.lock().view.markers.clear();
    }
}
