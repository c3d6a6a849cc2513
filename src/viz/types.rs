//! Public types for the rendering module.

use std::path::PathBuf;

/// Views produced by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Horizontal bars: sighting records per species.
    SpeciesCounts,
    /// Scatter of sighting coordinates (longitude × latitude).
    LocationMap,
    /// Line + markers: sighting records per calendar day.
    SightingsOverTime,
    /// Horizontal bars: the busiest locations.
    TopLocations,
    /// Pie: records at public vs private locations.
    PublicPrivate,
    /// Species/taxonomy/address table for one sighting.
    DetailTable,
}

impl ChartKind {
    /// File-name stem for the written page.
    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::SpeciesCounts => "species-counts",
            ChartKind::LocationMap => "location-map",
            ChartKind::SightingsOverTime => "sightings-over-time",
            ChartKind::TopLocations => "top-locations",
            ChartKind::PublicPrivate => "public-private",
            ChartKind::DetailTable => "species-detail",
        }
    }
}

/// A rendered page on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ChartKind,
    pub title: String,
    pub path: PathBuf,
}

/// How many locations the top-locations chart shows.
pub const TOP_LOCATIONS: usize = 5;

/// Default chart canvas, in pixels.
pub const CHART_SIZE: (u32, u32) = (1000, 600);
