//! Domain-specific error types for voice-gis

use thiserror::Error;

/// Main error type for the voice-gis crate
#[derive(Error, Debug)]
pub enum VoiceGisError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },
}

impl From<toml::de::Error> for VoiceGisError {
    fn from(err: toml::de::Error) -> Self {
        VoiceGisError::Config {
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for VoiceGisError {
    fn from(err: rusqlite::Error) -> Self {
        VoiceGisError::Database {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for VoiceGisError {
    fn from(err: reqwest::Error) -> Self {
        VoiceGisError::Http {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

impl From<std::io::Error> for VoiceGisError {
    fn from(err: std::io::Error) -> Self {
        VoiceGisError::Io {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for VoiceGisError {
    fn from(err: csv::Error) -> Self {
        VoiceGisError::Serialization {
            message: format!("CSV error: {}", err),
        }
    }
}

/// Result type alias for voice-gis operations
pub type Result<T> = std::result::Result<T, VoiceGisError>;
