//! Synchronous client for the **eBird API 2.0**.
//!
//! Covers the three endpoints this tool needs:
//! - `data/obs/{region}/recent` for a county's recent sightings
//! - `ref/taxonomy/ebird?species=...` for species details
//! - `ref/region/list/subnational2/{state}` for a state's counties
//!
//! Species photos come from the Macaulay Library media search, which needs no key.
//!
//! ### Notes
//! - The key is sent in the `X-eBirdApiToken` header, never in the URL.
//! - Records that cannot be turned into a [`Sighting`] are skipped and logged.
//! - There is no retry; a failed request surfaces as [`SightingsError`].
//!
//! Typical usage:
//! ```no_run
//! # use birdwatch::{Config, EbirdClient, regions::{County, Region}};
//! let client = EbirdClient::new(&Config::new("ebird-key", "liq-key"))?;
//! let state = Region { name: "Michigan".into(), code: "US-MI".into(), counties: vec![] };
//! let county = County { name: "Washtenaw".into(), code: "US-MI-161".into() };
//! let sightings = client.list_sightings(&county, &state)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::config::Config;
use crate::error::{ConfigError, SightingsError};
use crate::http::{build_http_client, enc_segment, join_url};
use crate::models::{MediaSearch, Observation, Sighting, SpeciesDetail, Taxon};
use crate::regions::{County, Region};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;

const TOKEN_HEADER: &str = "X-eBirdApiToken";

#[derive(Debug, Clone)]
pub struct EbirdClient {
    pub base_url: String,
    pub media_url: String,
    api_key: String,
    http: HttpClient,
}

#[derive(Debug, Deserialize)]
struct RegionEntry {
    code: String,
    name: String,
}

impl EbirdClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.ebird_url.clone(),
            media_url: config.media_url.clone(),
            api_key: config.ebird_key.clone(),
            http: build_http_client().map_err(ConfigError::Http)?,
        })
    }

    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, SightingsError> {
        log::debug!("GET {url}");
        let r = self
            .http
            .get(url)
            .header(TOKEN_HEADER, &self.api_key)
            .query(query)
            .send()?;
        if !r.status().is_success() {
            return Err(SightingsError::Status(r.status()));
        }
        r.json()
            .map_err(|e| SightingsError::Decode(format!("GET {url}: {e}")))
    }

    /// Recent sightings for one county, most recent first (API order).
    ///
    /// An empty list is a valid result. Malformed records are skipped.
    pub fn list_sightings(
        &self,
        county: &County,
        state: &Region,
    ) -> Result<Vec<Sighting>, SightingsError> {
        let url = join_url(
            &self.base_url,
            &format!("data/obs/{}/recent", enc_segment(&county.code)),
        );
        let v = self.get_json(&url, &[])?;
        let items = v
            .as_array()
            .ok_or_else(|| SightingsError::Decode("observations: not a top-level array".into()))?;

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let parsed = serde_json::from_value::<Observation>(item.clone())
                .map_err(|e| e.to_string())
                .and_then(Sighting::try_from);
            match parsed {
                Ok(s) => out.push(s),
                Err(reason) => log::warn!("skipping observation in {}: {reason}", county.code),
            }
        }
        log::info!(
            "{} sightings in {}, {}",
            out.len(),
            county.name,
            state.name
        );
        Ok(out)
    }

    /// Counties of a state, in API order.
    pub fn list_counties(&self, state: &Region) -> Result<Vec<County>, SightingsError> {
        let url = join_url(
            &self.base_url,
            &format!("ref/region/list/subnational2/{}", enc_segment(&state.code)),
        );
        let v = self.get_json(&url, &[("fmt", "json")])?;
        let entries: Vec<RegionEntry> = serde_json::from_value(v)
            .map_err(|e| SightingsError::Decode(format!("region list: {e}")))?;
        Ok(entries
            .into_iter()
            .map(|e| County {
                name: e.name,
                code: e.code,
            })
            .collect())
    }

    /// Taxonomy for a species code, plus a photo URL when one can be found.
    ///
    /// ### Errors
    /// `SightingsError::UnknownSpecies` when eBird does not know the code.
    pub fn get_species_detail(&self, species_code: &str) -> Result<SpeciesDetail, SightingsError> {
        let code = species_code.trim();
        if code.is_empty() {
            return Err(SightingsError::UnknownSpecies(species_code.to_string()));
        }
        let url = join_url(&self.base_url, "ref/taxonomy/ebird");
        let v = match self.get_json(&url, &[("species", code), ("fmt", "json")]) {
            Err(SightingsError::Status(s))
                if s == StatusCode::NOT_FOUND || s == StatusCode::BAD_REQUEST =>
            {
                return Err(SightingsError::UnknownSpecies(code.to_string()));
            }
            other => other?,
        };
        let taxa: Vec<Taxon> = serde_json::from_value(v)
            .map_err(|e| SightingsError::Decode(format!("taxonomy: {e}")))?;
        let taxon = taxa
            .into_iter()
            .find(|t| t.species_code.eq_ignore_ascii_case(code))
            .ok_or_else(|| SightingsError::UnknownSpecies(code.to_string()))?;

        let image = self.species_image_url(&taxon.species_code);
        Ok(SpeciesDetail::from_taxon(taxon, image))
    }

    /// Best-rated photo for a species. Failures are logged and yield `None`.
    pub fn species_image_url(&self, species_code: &str) -> Option<String> {
        let url = join_url(&self.media_url, "api/v1/search");
        log::debug!("GET {url} (taxonCode={species_code})");
        let query = [
            ("taxonCode", species_code),
            ("mediaType", "photo"),
            ("sort", "rating_rank_desc"),
            ("count", "1"),
        ];
        let result = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<MediaSearch>());
        match result {
            Ok(search) => search.first_image(),
            Err(e) => {
                log::warn!("no photo for {species_code}: {e}");
                None
            }
        }
    }
}
