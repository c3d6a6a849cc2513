//! Reverse geocoding through the LocationIQ `v1/reverse` endpoint.

use crate::config::Config;
use crate::error::{ConfigError, GeocodeError};
use crate::http::{build_http_client, join_url};
use crate::models::ReverseGeocode;
use reqwest::blocking::Client as HttpClient;

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    pub base_url: String,
    api_key: String,
    http: HttpClient,
}

impl GeocodeClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.geocode_url.clone(),
            api_key: config.locationiq_key.clone(),
            http: build_http_client().map_err(ConfigError::Http)?,
        })
    }

    /// Turn a coordinate pair into a formatted address (`display_name`).
    ///
    /// The coordinates are sent exactly as given.
    ///
    /// ### Errors
    /// - `InvalidCoordinates` when lat is outside [-90, 90] or lon outside [-180, 180]
    /// - `Transport` / `Status` for network and HTTP failures
    /// - `Decode` when the body is not a JSON geocoding response
    /// - `MissingAddress` when the response carries no usable address
    pub fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<String, GeocodeError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeocodeError::InvalidCoordinates { lat, lon });
        }
        let url = join_url(&self.base_url, "v1/reverse");
        log::debug!("GET {url} (lat={lat}, lon={lon})");
        let (lat_s, lon_s) = (lat.to_string(), lon.to_string());
        let r = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("lat", lat_s.as_str()),
                ("lon", lon_s.as_str()),
                ("format", "json"),
            ])
            .send()?;
        if !r.status().is_success() {
            return Err(GeocodeError::Status(r.status()));
        }
        let body: ReverseGeocode = r
            .json()
            .map_err(|e| GeocodeError::Decode(format!("GET {url}: {e}")))?;
        if let Some(err) = body.error {
            log::warn!("geocoder error for ({lat}, {lon}): {err}");
            return Err(GeocodeError::MissingAddress);
        }
        body.display_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(GeocodeError::MissingAddress)
    }
}
