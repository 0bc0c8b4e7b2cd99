/// Result of a layer switch or overlay toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerChange {
    Applied,
    Unknown,
}

/// A marker placed on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

/// Capabilities the dispatcher needs from the map renderer.
pub trait MapSurface: Send + Sync {
    fn pan_zoom_to(&self, lat: f64, lon: f64, zoom: u8);
    fn zoom_in(&self);
    fn zoom_out(&self);
    fn set_base_layer(&self, name: &str) -> LayerChange;
    fn set_overlay_visible(&self, name: &str, visible: bool) -> LayerChange;
    fn place_marker(&self, lat: f64, lon: f64, label: &str);
    fn clear_markers(&self);
}
