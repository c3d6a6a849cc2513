//! Visualization: render sighting charts and the species table as standalone HTML pages.
//!
//! - Charts are drawn with Plotters into inline **SVG** (pure-Rust font path, bundled DejaVu Sans)
//! - Distinct series colors (Microsoft Office palette)
//! - Pages go to a session-scoped temporary directory unless an output directory is configured
//! - Every page is handed to a [`Viewer`], normally the default browser

pub mod charts;
pub mod html;
pub mod text;
pub mod types;
pub mod util;

pub use types::{Artifact, CHART_SIZE, ChartKind, TOP_LOCATIONS};

use crate::config::Config;
use crate::error::RenderError;
use crate::models::{Sighting, SpeciesDetail};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

use util::{daily_counts, fmt_count, location_counts, office_color, privacy_split, species_counts};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Where rendered pages end up being shown.
pub trait Viewer {
    fn show(&self, path: &Path) -> std::io::Result<()>;
}

/// Opens pages in the OS default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserViewer;

impl Viewer for BrowserViewer {
    fn show(&self, path: &Path) -> std::io::Result<()> {
        webbrowser::open(&path.to_string_lossy())
    }
}

/// Leaves pages on disk without opening anything (`--no-browser`, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewer;

impl Viewer for NoopViewer {
    fn show(&self, path: &Path) -> std::io::Result<()> {
        log::info!("rendered {}", path.display());
        Ok(())
    }
}

enum OutputDir {
    /// Removed when the renderer is dropped.
    Temp(TempDir),
    Fixed(PathBuf),
}

impl OutputDir {
    fn path(&self) -> &Path {
        match self {
            OutputDir::Temp(t) => t.path(),
            OutputDir::Fixed(p) => p,
        }
    }
}

/// Writes pages and hands them to the viewer. Keeps a history of everything produced.
pub struct Renderer {
    out: OutputDir,
    viewer: Box<dyn Viewer>,
    max_species: usize,
    history: Vec<Artifact>,
}

impl Renderer {
    /// Renderer with the viewer the config asks for (browser or none).
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let viewer: Box<dyn Viewer> = if config.open_browser {
            Box::new(BrowserViewer)
        } else {
            Box::new(NoopViewer)
        };
        Self::with_viewer(config, viewer)
    }

    pub fn with_viewer(config: &Config, viewer: Box<dyn Viewer>) -> Result<Self, RenderError> {
        let out = match &config.out_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|source| RenderError::Write {
                    path: dir.clone(),
                    source,
                })?;
                OutputDir::Fixed(dir.clone())
            }
            None => OutputDir::Temp(
                tempfile::Builder::new()
                    .prefix("birdwatch-")
                    .tempdir()
                    .map_err(|source| RenderError::Write {
                        path: std::env::temp_dir(),
                        source,
                    })?,
            ),
        };
        Ok(Self {
            out,
            viewer,
            max_species: config.max_species.max(1),
            history: Vec::new(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        self.out.path()
    }

    /// Everything rendered so far, oldest first.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.history
    }

    /// Summary charts for one county's sightings.
    ///
    /// Every page is written before any is shown, so a viewer failure still
    /// leaves the full set on disk.
    ///
    /// ### Errors
    /// `RenderError::NoSightings` for an empty list; drawing/IO/viewer failures otherwise.
    pub fn render_overview(
        &mut self,
        county_label: &str,
        sightings: &[Sighting],
    ) -> Result<Vec<Artifact>, RenderError> {
        if sightings.is_empty() {
            return Err(RenderError::NoSightings);
        }
        let total = fmt_count(sightings.len());
        let mut out = Vec::new();

        let species = species_counts(sightings, self.max_species);
        let title = format!("Most Reported Species in {county_label}");
        let svg = charts::render_svg(CHART_SIZE, |root| {
            charts::draw_horizontal_bars(root, &title, "Sighting records", &species, office_color(0))
        })?;
        let summary = format!("Top {} species across {total} recent sighting records.", species.len());
        out.push(self.publish(ChartKind::SpeciesCounts, &title, &summary, &svg)?);

        let points: Vec<(f64, f64)> = sightings.iter().map(|s| (s.longitude, s.latitude)).collect();
        let title = format!("Sighting Locations in {county_label}");
        let svg = charts::render_svg(CHART_SIZE, |root| {
            charts::draw_location_map(root, &title, &points)
        })?;
        let summary = format!("{total} sightings plotted by longitude and latitude.");
        out.push(self.publish(ChartKind::LocationMap, &title, &summary, &svg)?);

        let days = daily_counts(sightings);
        if !days.is_empty() {
            let title = format!("Recent Bird Sightings in {county_label}");
            let svg = charts::render_svg(CHART_SIZE, |root| {
                charts::draw_daily_counts(root, &title, &days)
            })?;
            let summary = format!("Sighting records per day over {} day(s).", days.len());
            out.push(self.publish(ChartKind::SightingsOverTime, &title, &summary, &svg)?);
        }

        let locations = location_counts(sightings, TOP_LOCATIONS);
        let title = format!("Busiest Locations in {county_label}");
        let svg = charts::render_svg(CHART_SIZE, |root| {
            charts::draw_horizontal_bars(root, &title, "Sighting records", &locations, office_color(1))
        })?;
        let summary = format!("The {} locations with the most sighting records.", locations.len());
        out.push(self.publish(ChartKind::TopLocations, &title, &summary, &svg)?);

        if let Some((public, private)) = privacy_split(sightings) {
            let title = format!("Public and Private Property Sightings in {county_label}");
            let svg = charts::render_svg(CHART_SIZE, |root| {
                charts::draw_privacy_pie(root, &title, public, private)
            })?;
            let summary = format!(
                "{} on public property, {} on private property.",
                fmt_count(public),
                fmt_count(private)
            );
            out.push(self.publish(ChartKind::PublicPrivate, &title, &summary, &svg)?);
        }

        self.show_all(&out)?;
        Ok(out)
    }

    /// Table for one selected sighting's species.
    pub fn render_detail(
        &mut self,
        detail: &SpeciesDetail,
        sighting: &Sighting,
    ) -> Result<Artifact, RenderError> {
        let title = format!("{} ({})", detail.common_name, detail.scientific_name);
        let page = html::detail_page(&title, detail, sighting);
        let artifact = self.write_page(ChartKind::DetailTable, &title, &page)?;
        self.show_all(std::slice::from_ref(&artifact))?;
        Ok(artifact)
    }

    fn publish(
        &mut self,
        kind: ChartKind,
        title: &str,
        summary: &str,
        svg: &str,
    ) -> Result<Artifact, RenderError> {
        let page = html::chart_page(title, summary, svg);
        self.write_page(kind, title, &page)
    }

    fn write_page(
        &mut self,
        kind: ChartKind,
        title: &str,
        page: &str,
    ) -> Result<Artifact, RenderError> {
        let path = self
            .output_dir()
            .join(format!("{:03}-{}.html", self.history.len() + 1, kind.slug()));
        std::fs::write(&path, page).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;
        let artifact = Artifact {
            kind,
            title: title.to_string(),
            path,
        };
        self.history.push(artifact.clone());
        Ok(artifact)
    }

    /// Hand each page to the viewer; report the first failure after trying all.
    fn show_all(&self, artifacts: &[Artifact]) -> Result<(), RenderError> {
        let mut first_err = None;
        for a in artifacts {
            if let Err(source) = self.viewer.show(&a.path) {
                log::warn!("cannot open {}: {source}", a.path.display());
                first_err.get_or_insert(RenderError::Open {
                    path: a.path.clone(),
                    source,
                });
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
