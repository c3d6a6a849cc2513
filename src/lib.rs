//! birdwatch
//!
//! An interactive console tool for recent bird sightings in a U.S. county. Pairs with the
//! `birdwatch` CLI.
//!
//! ### Features
//! - Pick a state and county from local reference data (or eBird's region list)
//! - Fetch recent sightings for the county from the eBird API
//! - Render overview charts (species counts, location map, sightings per day, busiest
//!   locations, public vs private property) as HTML pages opened in the browser
//! - Pick one sighting to see its species taxonomy, photo, and the reverse-geocoded address
//!
//! ### Example
//! ```no_run
//! use birdwatch::{Config, EbirdClient, GeocodeClient, Renderer, load_regions};
//!
//! let config = Config::new("ebird-key", "locationiq-key");
//! let regions = load_regions(&config.regions_path)?;
//! let michigan = regions.lookup("michigan").expect("listed");
//! let washtenaw = &michigan.counties[80];
//!
//! let ebird = EbirdClient::new(&config)?;
//! let sightings = ebird.list_sightings(washtenaw, michigan)?;
//! let mut renderer = Renderer::new(&config)?;
//! renderer.render_overview("Washtenaw County, Michigan", &sightings)?;
//!
//! let first = &sightings[0];
//! let address = GeocodeClient::new(&config)?.reverse_geocode(first.latitude, first.longitude)?;
//! let detail = ebird.get_species_detail(&first.species_code)?.with_address(address);
//! renderer.render_detail(&detail, first)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod ebird;
pub mod error;
pub mod geocode;
pub mod http;
pub mod models;
pub mod regions;
pub mod session;
pub mod viz;

pub use config::Config;
pub use ebird::EbirdClient;
pub use error::{ConfigError, GeocodeError, RenderError, SightingsError};
pub use geocode::GeocodeClient;
pub use models::{Sighting, SpeciesDetail};
pub use regions::{County, Region, Regions, load_regions};
pub use session::{Session, SessionState};
pub use viz::Renderer;
