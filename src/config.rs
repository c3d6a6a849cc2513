//! Runtime configuration: API keys, service base URLs, and file locations.
//!
//! Credentials live in a small TOML file kept out of version control:
//!
//! ```toml
//! ebird_api_key = "..."
//! locationiq_api_key = "..."
//! ```
//!
//! Environment variables take priority over the file. Blank values count as absent.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_EBIRD_URL: &str = "https://api.ebird.org/v2";
pub const DEFAULT_GEOCODE_URL: &str = "https://us1.locationiq.com";
pub const DEFAULT_MEDIA_URL: &str = "https://search.macaulaylibrary.org";
pub const DEFAULT_REGIONS_PATH: &str = "data/regions.json";
pub const DEFAULT_CREDENTIALS_FILE: &str = "secrets.toml";
pub const DEFAULT_MAX_SPECIES: usize = 15;

pub const EBIRD_KEY_ENV: &str = "BIRDWATCH_EBIRD_KEY";
pub const LOCATIONIQ_KEY_ENV: &str = "BIRDWATCH_LOCATIONIQ_KEY";

/// Raw credentials as found in one source (file or environment).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub ebird_api_key: Option<String>,
    pub locationiq_api_key: Option<String>,
}

impl Credentials {
    /// Parse a TOML credentials file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `BIRDWATCH_EBIRD_KEY` / `BIRDWATCH_LOCATIONIQ_KEY`.
    pub fn from_env() -> Self {
        Self {
            ebird_api_key: std::env::var(EBIRD_KEY_ENV).ok(),
            locationiq_api_key: std::env::var(LOCATIONIQ_KEY_ENV).ok(),
        }
    }

    /// Combine two sources, preferring non-blank values from `self`.
    pub fn or(self, fallback: Credentials) -> Credentials {
        Credentials {
            ebird_api_key: non_blank(self.ebird_api_key).or(non_blank(fallback.ebird_api_key)),
            locationiq_api_key: non_blank(self.locationiq_api_key)
                .or(non_blank(fallback.locationiq_api_key)),
        }
    }

    /// Both keys, or the first one that is missing.
    pub fn into_keys(self) -> Result<(String, String), ConfigError> {
        let ebird = non_blank(self.ebird_api_key).ok_or(ConfigError::MissingKey {
            name: "eBird API key",
            env: EBIRD_KEY_ENV,
            key: "ebird_api_key",
        })?;
        let locationiq = non_blank(self.locationiq_api_key).ok_or(ConfigError::MissingKey {
            name: "LocationIQ API key",
            env: LOCATIONIQ_KEY_ENV,
            key: "locationiq_api_key",
        })?;
        Ok((ebird, locationiq))
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Where to look for the credentials file when none is given explicitly:
/// `./secrets.toml`, then `<config dir>/birdwatch/secrets.toml`.
pub fn default_credentials_paths() -> Vec<PathBuf> {
    let mut out = vec![PathBuf::from(DEFAULT_CREDENTIALS_FILE)];
    if let Some(dir) = dirs::config_dir() {
        out.push(dir.join("birdwatch").join(DEFAULT_CREDENTIALS_FILE));
    }
    out
}

/// Load credentials from an explicit file (which must exist) or from the first
/// default location that exists (none existing is fine, the environment may
/// still supply the keys).
pub fn load_credentials_file(explicit: Option<&Path>) -> Result<Credentials, ConfigError> {
    if let Some(path) = explicit {
        return Credentials::from_file(path);
    }
    match default_credentials_paths().into_iter().find(|p| p.is_file()) {
        Some(path) => {
            log::info!("loading credentials from {}", path.display());
            Credentials::from_file(path)
        }
        None => Ok(Credentials::default()),
    }
}

/// Immutable process configuration, built once and handed to each client.
#[derive(Debug, Clone)]
pub struct Config {
    pub ebird_key: String,
    pub locationiq_key: String,
    pub ebird_url: String,
    pub geocode_url: String,
    pub media_url: String,
    pub regions_path: PathBuf,
    /// Persist rendered pages here instead of a temporary directory.
    pub out_dir: Option<PathBuf>,
    pub open_browser: bool,
    /// Number of bars in the species-count chart.
    pub max_species: usize,
}

impl Config {
    /// Configuration with default endpoints and file locations.
    pub fn new(ebird_key: impl Into<String>, locationiq_key: impl Into<String>) -> Self {
        Self {
            ebird_key: ebird_key.into(),
            locationiq_key: locationiq_key.into(),
            ebird_url: DEFAULT_EBIRD_URL.into(),
            geocode_url: DEFAULT_GEOCODE_URL.into(),
            media_url: DEFAULT_MEDIA_URL.into(),
            regions_path: PathBuf::from(DEFAULT_REGIONS_PATH),
            out_dir: None,
            open_browser: true,
            max_species: DEFAULT_MAX_SPECIES,
        }
    }

    /// Resolve keys with environment-over-file priority.
    pub fn from_credentials(env: Credentials, file: Credentials) -> Result<Self, ConfigError> {
        let (ebird, locationiq) = env.or(file).into_keys()?;
        Ok(Self::new(ebird, locationiq))
    }
}
