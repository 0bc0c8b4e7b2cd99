//! Geocoding against the OpenStreetMap Nominatim search API

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use super::traits::{GeoPoint, GeocodeError, Geocoder};
use crate::config::ServicesConfig;
use crate::error::Result;

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimGeocoder {
    pub fn new(config: &ServicesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

fn first_hit(location: &str, hits: Vec<SearchHit>) -> std::result::Result<GeoPoint, GeocodeError> {
    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(location.to_string()))?;

    let lat = hit
        .lat
        .parse::<f64>()
        .map_err(|e| GeocodeError::Transport(format!("bad latitude '{}': {}", hit.lat, e)))?;
    let lon = hit
        .lon
        .parse::<f64>()
        .map_err(|e| GeocodeError::Transport(format!("bad longitude '{}': {}", hit.lon, e)))?;

    Ok(GeoPoint {
        lat,
        lon,
        display_name: hit.display_name,
    })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, location: &str) -> std::result::Result<GeoPoint, GeocodeError> {
        debug!("Geocoding '{}' via {}", location, self.base_url);

        let response = self
            .client
            .get(self.search_url())
            .query(&[("format", "json"), ("q", location)])
            .send()
            .await
            .map_err(|e| {
                error!("Geocoding error: {}", e);
                GeocodeError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Nominatim error {}: {}", status, body);
            return Err(GeocodeError::Transport(format!("HTTP {}", status)));
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Transport(format!("invalid response: {}", e)))?;

        first_hit(location, hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Vec<SearchHit> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_first_hit_is_used() {
        let hits = parse(
            r#"[
                {"place_id": 1, "lat": "13.0836939", "lon": "80.270186", "display_name": "Chennai, Tamil Nadu, India"},
                {"place_id": 2, "lat": "1.0", "lon": "2.0", "display_name": "Elsewhere"}
            ]"#,
        );
        let point = first_hit("chennai", hits).unwrap();
        assert_eq!(point.display_name, "Chennai, Tamil Nadu, India");
        assert!((point.lat - 13.0836939).abs() < 1e-9);
        assert!((point.lon - 80.270186).abs() < 1e-9);
    }

    #[test]
    fn test_empty_result_is_not_found() {
        assert_eq!(
            first_hit("nowhereland", parse("[]")),
            Err(GeocodeError::NotFound("nowhereland".into()))
        );
    }

    #[test]
    fn test_unparseable_coordinate_is_transport_error() {
        let hits = parse(r#"[{"lat": "north", "lon": "80.2", "display_name": "x"}]"#);
        assert!(matches!(
            first_hit("x", hits),
            Err(GeocodeError::Transport(_))
        ));
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let config = ServicesConfig {
            nominatim_url: "http://localhost:8080/".to_string(),
            ..ServicesConfig::default()
        };
        let geocoder = NominatimGeocoder::new(&config).unwrap();
        assert_eq!(geocoder.search_url(), "http://localhost:8080/search");
    }
}
