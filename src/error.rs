//! Error taxonomy.
//!
//! Only [`ConfigError`] is fatal (startup). The per-request errors are caught by
//! the session loop and turned into a message for the user.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Missing or malformed credentials / reference data. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse credentials file {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot parse reference data {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid reference data: {0}")]
    InvalidRegions(String),
    #[error("{name} is not configured (set {env} or add `{key}` to the credentials file)")]
    MissingKey {
        name: &'static str,
        env: &'static str,
        key: &'static str,
    },
    #[error("cannot build HTTP client: {0}")]
    Http(#[source] reqwest::Error),
}

/// Reverse-geocoding failures. Recoverable.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("coordinates out of range: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("geocoding request failed with HTTP {0}")]
    Status(StatusCode),
    #[error("unexpected geocoding response: {0}")]
    Decode(String),
    #[error("geocoding response has no address")]
    MissingAddress,
}

/// eBird failures. Recoverable.
#[derive(Debug, Error)]
pub enum SightingsError {
    #[error("eBird request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("eBird request failed with HTTP {0}")]
    Status(StatusCode),
    #[error("eBird does not recognize species code `{0}`")]
    UnknownSpecies(String),
    #[error("unexpected eBird response: {0}")]
    Decode(String),
}

/// Chart/table rendering failures. Recoverable.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("there are no sightings to chart")]
    NoSightings,
    #[error("chart drawing failed: {0}")]
    Draw(String),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot open {} in the browser: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
