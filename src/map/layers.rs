//! Registered base layers and overlays.

pub const OPEN_STREET_MAP: &str = "OpenStreetMap";
pub const SATELLITE: &str = "Satellite";

/// Tile source backing a base layer
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayer {
    pub name: String,
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

/// WMS overlay drawn on top of the base layer
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub name: String,
    pub wms_url: String,
    pub wms_layer: String,
    /// (south, west, north, east); `None` means unbounded
    pub bounds: Option<(f64, f64, f64, f64)>,
}

const BHUVAN_VEC1: &str = "https://bhuvan-vec1.nrsc.gov.in/bhuvan/wms";
const BHUVAN_VEC2: &str = "https://bhuvan-vec2.nrsc.gov.in/bhuvan/wms";
const TAMIL_NADU_BOUNDS: (f64, f64, f64, f64) = (8.075, 76.234, 13.565, 80.349);

pub fn default_base_layers() -> Vec<BaseLayer> {
    vec![
        BaseLayer {
            name: OPEN_STREET_MAP.to_string(),
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            max_zoom: 19,
            attribution: "© OpenStreetMap contributors".to_string(),
        },
        BaseLayer {
            name: SATELLITE.to_string(),
            url_template: "https://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}".to_string(),
            max_zoom: 20,
            attribution: "© Google Maps".to_string(),
        },
    ]
}

pub fn default_overlays() -> Vec<Overlay> {
    vec![
        Overlay {
            name: "Bhuvan India".to_string(),
            wms_url: BHUVAN_VEC1.to_string(),
            wms_layer: "india3".to_string(),
            bounds: None,
        },
        Overlay {
            name: "SISDP Phase 2 LULC 10K".to_string(),
            wms_url: BHUVAN_VEC2.to_string(),
            wms_layer: "sisdp_phase2:SISDP_P2_LULC_10K_2016_2019_TN".to_string(),
            bounds: Some(TAMIL_NADU_BOUNDS),
        },
        Overlay {
            name: "Tamil Nadu Land Use".to_string(),
            wms_url: BHUVAN_VEC2.to_string(),
            wms_layer: "lulc:TN_LULC50K_1516".to_string(),
            bounds: Some(TAMIL_NADU_BOUNDS),
        },
        Overlay {
            name: "Tamil Nadu Land Degradation".to_string(),
            wms_url: BHUVAN_VEC2.to_string(),
            wms_layer: "ld:TN_LD50K_1516".to_string(),
            bounds: Some(TAMIL_NADU_BOUNDS),
        },
    ]
}
