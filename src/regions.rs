//! Reference data: U.S. states and their counties, keyed by eBird region code.
//!
//! The file is JSON:
//!
//! ```json
//! {"states": [
//!   {"name": "Michigan", "code": "US-MI", "counties": [{"name": "Alcona", "code": "US-MI-001"}]},
//!   {"name": "Alabama", "code": "US-AL"}
//! ]}
//! ```
//!
//! A state listed without counties gets its county list from eBird at selection time.

use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static STATE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^US-[A-Z]{2}$").expect("valid state code regex"));
static COUNTY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^US-[A-Z]{2}-[0-9]{3}$").expect("valid county code regex"));

/// A county and its eBird `subnational2` code (e.g. `US-MI-161`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    pub name: String,
    pub code: String,
}

/// A state with its ordered county list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    /// eBird `subnational1` code, e.g. `US-MI`.
    pub code: String,
    #[serde(default)]
    pub counties: Vec<County>,
}

impl Region {
    pub fn county_names(&self) -> Vec<&str> {
        self.counties.iter().map(|c| c.name.as_str()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct RegionsFile {
    states: Vec<Region>,
}

/// Immutable state lookup table with case-insensitive names.
#[derive(Debug, Clone)]
pub struct Regions {
    states: Vec<Region>,
    by_name: HashMap<String, usize>,
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Regions {
    /// Validate and index a list of states.
    pub fn new(states: Vec<Region>) -> Result<Self, ConfigError> {
        let mut by_name = HashMap::with_capacity(states.len());
        for (idx, state) in states.iter().enumerate() {
            if state.name.trim().is_empty() {
                return Err(ConfigError::InvalidRegions(format!(
                    "state #{} has an empty name",
                    idx + 1
                )));
            }
            if !STATE_CODE.is_match(&state.code) {
                return Err(ConfigError::InvalidRegions(format!(
                    "state {} has malformed code `{}`",
                    state.name, state.code
                )));
            }
            for county in &state.counties {
                let in_state = county
                    .code
                    .strip_prefix(state.code.as_str())
                    .is_some_and(|rest| rest.starts_with('-'));
                if !COUNTY_CODE.is_match(&county.code) || !in_state {
                    return Err(ConfigError::InvalidRegions(format!(
                        "county {} of {} has malformed code `{}`",
                        county.name, state.name, county.code
                    )));
                }
            }
            if by_name.insert(normalize(&state.name), idx).is_some() {
                return Err(ConfigError::InvalidRegions(format!(
                    "state {} is listed twice",
                    state.name
                )));
            }
        }
        Ok(Self { states, by_name })
    }

    /// Parse reference data from JSON text.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: RegionsFile = serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::new(file.states)
    }

    /// Case-insensitive state lookup; surrounding/double whitespace is ignored.
    pub fn lookup(&self, name: &str) -> Option<&Region> {
        self.by_name.get(&normalize(name)).map(|&i| &self.states[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Load the state/county reference file.
///
/// ### Errors
/// `ConfigError` when the file is missing, is not valid JSON, or carries malformed codes.
pub fn load_regions<P: AsRef<Path>>(path: P) -> Result<Regions, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let regions = Regions::from_json(&text, path)?;
    log::info!("loaded {} states from {}", regions.len(), path.display());
    Ok(regions)
}
