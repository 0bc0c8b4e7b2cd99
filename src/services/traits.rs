use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// A point of interest returned by a nearby lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("location not found: {0}")]
    NotFound(String),
    #[error("geocoding transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoiError {
    #[error("poi lookup transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, location: &str) -> Result<GeoPoint, GeocodeError>;
}

#[async_trait]
pub trait PoiFinder: Send + Sync {
    /// Find POIs matching `tag_expression` within `radius_m` meters of (`lat`, `lon`).
    async fn find_nearby(
        &self,
        tag_expression: &str,
        lat: f64,
        lon: f64,
        radius_m: u32,
    ) -> Result<Vec<Poi>, PoiError>;
}
