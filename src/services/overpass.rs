//! POI lookup against the Overpass API

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error};

use super::traits::{Poi, PoiError, PoiFinder};
use crate::config::ServicesConfig;
use crate::error::Result;

/// Spoken POI category → OSM tag expression
const OSM_TAGS: &[(&str, &str)] = &[
    ("hospitals", "amenity=hospital"),
    ("hospital", "amenity=hospital"),
    ("restaurants", "amenity=restaurant"),
    ("restaurant", "amenity=restaurant"),
    ("hotels", "tourism=hotel"),
    ("hotel", "tourism=hotel"),
    ("schools", "amenity=school"),
    ("school", "amenity=school"),
    ("parks", "leisure=park"),
    ("park", "leisure=park"),
    ("atms", "amenity=atm"),
    ("atm", "amenity=atm"),
    ("banks", "amenity=bank"),
    ("bank", "amenity=bank"),
    ("pharmacies", "amenity=pharmacy"),
    ("pharmacy", "amenity=pharmacy"),
    ("supermarkets", "shop=supermarket"),
    ("supermarket", "shop=supermarket"),
    ("police", "amenity=police"),
    ("police station", "amenity=police"),
    ("gas stations", "amenity=fuel"),
    ("gas station", "amenity=fuel"),
    ("petrol pumps", "amenity=fuel"),
    ("petrol pump", "amenity=fuel"),
];

/// Tag expression for a spoken category; unknown categories become a name filter.
pub fn tag_expression(poi_type: &str) -> String {
    let key = poi_type.trim().to_lowercase();
    OSM_TAGS
        .iter()
        .find(|(spoken, _)| *spoken == key)
        .map(|(_, tag)| tag.to_string())
        .unwrap_or_else(|| format!("name~\"{}\"", poi_type.replace('"', "")))
}

/// Overpass QL for nodes matching `tag_expression` around a point
pub fn build_query(tag_expression: &str, lat: f64, lon: f64, radius_m: u32) -> String {
    format!(
        "[out:json];\nnode[{}](around:{},{},{});\nout body;\n",
        tag_expression, radius_m, lat, lon
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl From<OverpassResponse> for Vec<Poi> {
    fn from(resp: OverpassResponse) -> Self {
        resp.elements
            .into_iter()
            .filter_map(|mut el| {
                Some(Poi {
                    lat: el.lat?,
                    lon: el.lon?,
                    name: el.tags.remove("name"),
                })
            })
            .collect()
    }
}

pub struct OverpassPoiFinder {
    client: reqwest::Client,
    base_url: String,
}

impl OverpassPoiFinder {
    pub fn new(config: &ServicesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.overpass_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn interpreter_url(&self) -> String {
        format!("{}/api/interpreter", self.base_url)
    }
}

#[async_trait]
impl PoiFinder for OverpassPoiFinder {
    async fn find_nearby(
        &self,
        tag_expression: &str,
        lat: f64,
        lon: f64,
        radius_m: u32,
    ) -> std::result::Result<Vec<Poi>, PoiError> {
        let query = build_query(tag_expression, lat, lon, radius_m);
        debug!("Overpass query: {}", query.replace('\n', " "));

        let response = self
            .client
            .post(self.interpreter_url())
            .body(query)
            .send()
            .await
            .map_err(|e| {
                error!("POI search error: {}", e);
                PoiError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Overpass error {}: {}", status, body);
            return Err(PoiError::Transport(format!("HTTP {}", status)));
        }

        let parsed: OverpassResponse = response
            .json()
            .await
            .map_err(|e| PoiError::Transport(format!("invalid response: {}", e)))?;

        Ok(parsed.into())
    }
}
