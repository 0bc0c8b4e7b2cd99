use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{Result, VoiceGisError};

/// Highest zoom level any registered base layer supports.
pub const MAX_ZOOM: u8 = 20;

/// Main configuration structure loaded from voice_gis.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Initial view and the zoom levels used by location commands
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapConfig {
    pub initial_lat: f64,
    pub initial_lon: f64,
    pub initial_zoom: u8,
    /// Zoom applied after "go to"/"show me"
    pub pan_zoom: u8,
    /// Zoom applied before a nearby search
    pub search_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        // Centered on India
        Self {
            initial_lat: 20.5937,
            initial_lon: 78.9629,
            initial_zoom: 5,
            pan_zoom: 12,
            search_zoom: 14,
        }
    }
}

/// Endpoints and limits for the geocoding and POI web services
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub nominatim_url: String,
    pub overpass_url: String,
    pub user_agent: String,
    pub http_timeout_ms: u64,
    pub poi_radius_m: u32,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            overpass_url: "https://overpass-api.de".to_string(),
            user_agent: format!("voice-gis/{}", env!("CARGO_PKG_VERSION")),
            http_timeout_ms: 10_000,
            poi_radius_m: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file for command history; ":memory:" keeps it in-process
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "voice_commands.sqlite".to_string(),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// `EnvFilter` directives for the subscriber
    pub log_level: String,
    /// TOML file the config was read from; `None` when defaults were used
    pub config_file: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "voice_gis=info".to_string(),
            config_file: None,
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "voice_gis=info".to_string()),
            config_file: None,
        }
    }

    /// Subscriber filter for `log_level`; bad directives fall back to `voice_gis=info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|e| {
            eprintln!("Invalid log filter '{}': {}; using voice_gis=info", self.log_level, e);
            EnvFilter::new("voice_gis=info")
        })
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses VOICE_GIS_CONFIG environment variable or defaults to "voice_gis.toml"
    pub fn load() -> Result<Self> {
        // VGIS_ENV_FILE wins over ./.env
        if let Ok(env_path) = std::env::var("VGIS_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path =
            std::env::var("VOICE_GIS_CONFIG").unwrap_or_else(|_| "voice_gis.toml".to_string());

        let (mut config, config_file) = if let Ok(content) = std::fs::read_to_string(&config_path) {
            (Self::from_toml_str(&content)?, Some(config_path))
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            (Self::default(), None)
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.runtime = RuntimeConfig {
            config_file,
            ..RuntimeConfig::load_from_env()
        };
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env-style overrides. `lookup` is `std::env::var` in production.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("VGIS_DB_PATH") {
            self.storage.database_path = path;
            tracing::debug!("VGIS_DB_PATH env override applied");
        }
        if let Some(url) = lookup("VGIS_NOMINATIM_URL") {
            self.services.nominatim_url = url;
            tracing::debug!("VGIS_NOMINATIM_URL env override applied");
        }
        if let Some(url) = lookup("VGIS_OVERPASS_URL") {
            self.services.overpass_url = url;
            tracing::debug!("VGIS_OVERPASS_URL env override applied");
        }
        if let Some(ua) = lookup("VGIS_USER_AGENT") {
            self.services.user_agent = ua;
        }
        if let Some(timeout) = lookup("VGIS_HTTP_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok()) {
            self.services.http_timeout_ms = timeout;
        }
        if let Some(radius) = lookup("VGIS_POI_RADIUS_M").and_then(|v| v.parse::<u32>().ok()) {
            self.services.poi_radius_m = radius;
        }
    }

    /// Validate the configuration, clamping zoom levels and rejecting unusable limits
    pub fn validate(&mut self) -> Result<()> {
        for (name, zoom) in [
            ("initial_zoom", &mut self.map.initial_zoom),
            ("pan_zoom", &mut self.map.pan_zoom),
            ("search_zoom", &mut self.map.search_zoom),
        ] {
            if *zoom > MAX_ZOOM {
                tracing::warn!("map.{} {} exceeds max {}, clamping", name, zoom, MAX_ZOOM);
                *zoom = MAX_ZOOM;
            }
        }

        if !(-90.0..=90.0).contains(&self.map.initial_lat)
            || !(-180.0..=180.0).contains(&self.map.initial_lon)
        {
            return Err(VoiceGisError::Config {
                message: format!(
                    "initial center ({}, {}) is not a valid coordinate",
                    self.map.initial_lat, self.map.initial_lon
                ),
            });
        }
        if self.services.http_timeout_ms == 0 {
            return Err(VoiceGisError::Config {
                message: "services.http_timeout_ms must be > 0".to_string(),
            });
        }
        if self.services.poi_radius_m == 0 {
            return Err(VoiceGisError::Config {
                message: "services.poi_radius_m must be > 0".to_string(),
            });
        }
        for (name, url) in [
            ("nominatim_url", &self.services.nominatim_url),
            ("overpass_url", &self.services.overpass_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                tracing::warn!("services.{} '{}' doesn't start with http:// or https://", name, url);
            }
        }

        Ok(())
    }
}
