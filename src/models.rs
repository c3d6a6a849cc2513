use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_SCIENTIFIC_NAME: &str = "unknown";
pub const UNNAMED_LOCATION: &str = "unnamed location";
pub const NOT_LISTED: &str = "not listed";
pub const ADDRESS_UNAVAILABLE: &str = "address unavailable";

/// Raw observation item from eBird `data/obs/{region}/recent`.
///
/// Every field is optional here; [`Sighting::try_from`] decides what is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub species_code: Option<String>,
    pub com_name: Option<String>,
    pub sci_name: Option<String>,
    pub loc_id: Option<String>,
    pub loc_name: Option<String>,
    pub obs_dt: Option<String>,
    /// Usually a number; tolerate strings too.
    #[serde(default, deserialize_with = "de_opt_u32_from_string_or_number")]
    pub how_many: Option<u32>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub location_private: Option<bool>,
}

/// Serde helper: parse an optional `u32` from a JSON number, a numeric string, or null.
fn de_opt_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct OptU32Visitor;

    impl<'de> Visitor<'de> for OptU32Visitor {
        type Value = Option<u32>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "null, a string or an integer representing a non-negative number")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map(Some).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map(Some).map_err(E::custom)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            // eBird writes "X" for "present, not counted".
            Ok(s.trim().parse::<u32>().ok())
        }
    }

    deserializer.deserialize_any(OptU32Visitor)
}

/// One bird-observation record, as used by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    pub species_code: String,
    pub common_name: String,
    pub scientific_name: String,
    /// `obsDt` as sent by eBird, e.g. `2024-05-01 08:15`.
    pub observed: String,
    pub observed_on: Option<NaiveDate>,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub location_id: Option<String>,
    /// Number of birds reported; `None` when only presence was noted.
    pub count: Option<u32>,
    pub private_location: Option<bool>,
}

impl Sighting {
    /// Count in eBird notation: a number, or `X` for "present".
    pub fn count_label(&self) -> String {
        self.count.map_or_else(|| "X".to_string(), |n| n.to_string())
    }
}

/// Parse the date part of an `obsDt` value (`YYYY-MM-DD[ HH:MM]`).
pub fn parse_obs_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().split_whitespace().next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl TryFrom<Observation> for Sighting {
    /// Why the record was skipped.
    type Error = String;

    fn try_from(o: Observation) -> Result<Self, Self::Error> {
        let species_code = non_empty(o.species_code).ok_or("missing speciesCode")?;
        let latitude = o
            .lat
            .filter(|v| v.is_finite() && (-90.0..=90.0).contains(v))
            .ok_or_else(|| format!("{species_code}: missing or invalid lat"))?;
        let longitude = o
            .lng
            .filter(|v| v.is_finite() && (-180.0..=180.0).contains(v))
            .ok_or_else(|| format!("{species_code}: missing or invalid lng"))?;
        let observed = non_empty(o.obs_dt).unwrap_or_default();
        Ok(Self {
            common_name: non_empty(o.com_name).unwrap_or_else(|| species_code.clone()),
            scientific_name: non_empty(o.sci_name)
                .unwrap_or_else(|| UNKNOWN_SCIENTIFIC_NAME.to_string()),
            observed_on: parse_obs_date(&observed),
            observed,
            latitude,
            longitude,
            location: non_empty(o.loc_name).unwrap_or_else(|| UNNAMED_LOCATION.to_string()),
            location_id: non_empty(o.loc_id),
            count: o.how_many,
            private_location: o.location_private,
            species_code,
        })
    }
}

/// Raw taxon from eBird `ref/taxonomy/ebird`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxon {
    pub species_code: String,
    pub com_name: Option<String>,
    pub sci_name: Option<String>,
    pub category: Option<String>,
    pub taxon_order: Option<f64>,
    pub order: Option<String>,
    pub family_code: Option<String>,
    pub family_com_name: Option<String>,
    pub family_sci_name: Option<String>,
}

/// Taxonomic placement shown in the detail table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub category: String,
    pub order: String,
    pub family_common: String,
    pub family_scientific: String,
    /// First word of the scientific name.
    pub genus: String,
    /// Conservation status. eBird's taxonomy carries none, so this is always "not listed".
    pub status: String,
    pub taxon_order: Option<f64>,
}

/// Everything shown about one selected sighting's species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDetail {
    pub species_code: String,
    pub common_name: String,
    pub scientific_name: String,
    pub image_url: Option<String>,
    /// Public eBird species page.
    pub species_page: String,
    pub taxonomy: Taxonomy,
    /// Filled in from the reverse geocoder; `None` renders as "address unavailable".
    pub address: Option<String>,
}

impl SpeciesDetail {
    pub fn from_taxon(t: Taxon, image_url: Option<String>) -> Self {
        let listed = |v: Option<String>| non_empty(v).unwrap_or_else(|| NOT_LISTED.to_string());
        let sci_name = non_empty(t.sci_name);
        let genus = sci_name
            .as_deref()
            .and_then(|s| s.split_whitespace().next())
            .map_or_else(|| NOT_LISTED.to_string(), str::to_string);
        Self {
            species_page: format!("https://ebird.org/species/{}", t.species_code),
            common_name: non_empty(t.com_name).unwrap_or_else(|| t.species_code.clone()),
            scientific_name: sci_name.unwrap_or_else(|| UNKNOWN_SCIENTIFIC_NAME.to_string()),
            image_url,
            taxonomy: Taxonomy {
                category: listed(t.category),
                order: listed(t.order),
                family_common: listed(t.family_com_name),
                family_scientific: listed(t.family_sci_name),
                genus,
                status: NOT_LISTED.to_string(),
                taxon_order: t.taxon_order,
            },
            address: None,
            species_code: t.species_code,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn address_or_placeholder(&self) -> &str {
        self.address.as_deref().unwrap_or(ADDRESS_UNAVAILABLE)
    }
}

/// Macaulay Library media search response (only what we read).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaSearch {
    #[serde(default)]
    pub results: MediaResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaResults {
    #[serde(default)]
    pub content: Vec<MediaItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub media_url: Option<String>,
    pub preview_url: Option<String>,
}

impl MediaSearch {
    /// First usable image URL.
    pub fn first_image(self) -> Option<String> {
        self.results
            .content
            .into_iter()
            .find_map(|m| non_empty(m.media_url).or(non_empty(m.preview_url)))
    }
}

/// LocationIQ reverse-geocoding response (only what we read).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseGeocode {
    pub display_name: Option<String>,
    pub error: Option<String>,
}
