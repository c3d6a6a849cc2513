use birdwatch::models::Taxonomy;
use birdwatch::viz::{ChartKind, NoopViewer, Viewer};
use birdwatch::{Config, RenderError, Renderer, Sighting, SpeciesDetail};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

fn sighting(name: &str, loc: &str, day: Option<u32>, private: Option<bool>) -> Sighting {
    Sighting {
        species_code: name.to_lowercase().replace(' ', ""),
        common_name: name.into(),
        scientific_name: "Avis testus".into(),
        observed: day.map_or_else(String::new, |d| format!("2024-05-{d:02} 07:30")),
        observed_on: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 5, d)),
        latitude: 42.28,
        longitude: -83.74,
        location: loc.into(),
        location_id: None,
        count: Some(2),
        private_location: private,
    }
}

fn county_sightings() -> Vec<Sighting> {
    vec![
        sighting("American Robin", "Nichols Arboretum", Some(2), Some(false)),
        sighting("American Robin", "Gallup Park", Some(1), Some(false)),
        sighting("Blue Jay", "Backyard feeder", Some(1), Some(true)),
        sighting("Northern Cardinal", "Nichols Arboretum", Some(3), Some(false)),
    ]
}

fn robin_detail() -> SpeciesDetail {
    SpeciesDetail {
        species_code: "amerob".into(),
        common_name: "American Robin".into(),
        scientific_name: "Turdus migratorius".into(),
        image_url: Some("https://cdn.example.org/asset/123/1200".into()),
        species_page: "https://ebird.org/species/amerob".into(),
        taxonomy: Taxonomy {
            category: "species".into(),
            order: "Passeriformes".into(),
            family_common: "Thrushes & Allies".into(),
            family_scientific: "Turdidae".into(),
            genus: "Turdus".into(),
            status: "not listed".into(),
            taxon_order: Some(27346.0),
        },
        address: None,
    }
}

fn renderer() -> Renderer {
    let config = Config {
        open_browser: false,
        ..Config::new("k", "k")
    };
    Renderer::with_viewer(&config, Box::new(NoopViewer)).unwrap()
}

#[test]
fn overview_renders_every_chart() {
    let mut r = renderer();
    let arts = r
        .render_overview("Washtenaw County, Michigan", &county_sightings())
        .unwrap();
    let kinds: Vec<ChartKind> = arts.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        [
            ChartKind::SpeciesCounts,
            ChartKind::LocationMap,
            ChartKind::SightingsOverTime,
            ChartKind::TopLocations,
            ChartKind::PublicPrivate,
        ]
    );
    for a in &arts {
        assert!(a.path.starts_with(r.output_dir()));
        let page = std::fs::read_to_string(&a.path).unwrap();
        assert!(page.contains("<svg"), "{} has no chart", a.path.display());
        assert!(a.title.contains("Washtenaw County, Michigan"));
    }
    assert_eq!(r.artifacts(), arts.as_slice());
}

#[test]
fn species_chart_lists_names() {
    let mut r = renderer();
    let arts = r.render_overview("Test County", &county_sightings()).unwrap();
    let page = std::fs::read_to_string(&arts[0].path).unwrap();
    assert!(page.contains("American Robin"));
    assert!(page.contains("Northern Cardinal"));
}

#[test]
fn nothing_to_chart_is_an_error() {
    let mut r = renderer();
    assert!(matches!(
        r.render_overview("Empty County", &[]),
        Err(RenderError::NoSightings)
    ));
    assert!(r.artifacts().is_empty());
}

#[test]
fn optional_charts_depend_on_the_data() {
    let mut r = renderer();
    let s = vec![
        sighting("Blue Jay", "Somewhere", None, None),
        sighting("Blue Jay", "Elsewhere", None, None),
    ];
    let kinds: Vec<ChartKind> = r
        .render_overview("Test County", &s)
        .unwrap()
        .iter()
        .map(|a| a.kind)
        .collect();
    assert_eq!(
        kinds,
        [
            ChartKind::SpeciesCounts,
            ChartKind::LocationMap,
            ChartKind::TopLocations
        ]
    );
}

#[test]
fn detail_page_shows_table_and_escapes_text() {
    let mut r = renderer();
    let s = sighting("American Robin", "Mill <Pond>", Some(2), Some(false));
    let detail = robin_detail().with_address("123 Main St, Ann Arbor");
    let a = r.render_detail(&detail, &s).unwrap();
    assert_eq!(a.kind, ChartKind::DetailTable);
    let page = std::fs::read_to_string(&a.path).unwrap();
    assert!(page.contains("Information Types"));
    assert!(page.contains("Turdus migratorius"));
    assert!(page.contains("Passeriformes"));
    assert!(page.contains("<td class=\"field\">Genus</td><td>Turdus</td>"));
    assert!(page.contains("<td class=\"field\">Status</td><td>not listed</td>"));
    assert!(page.contains("Thrushes &amp; Allies"));
    assert!(page.contains("Mill &lt;Pond&gt;"));
    assert!(!page.contains("Mill <Pond>"));
    assert!(page.contains("123 Main St, Ann Arbor"));
    assert!(page.contains("https://cdn.example.org/asset/123/1200"));
}

#[test]
fn detail_page_placeholders() {
    let mut r = renderer();
    let s = sighting("American Robin", "Gallup Park", Some(2), None);
    let detail = SpeciesDetail {
        image_url: None,
        ..robin_detail()
    };
    let a = r.render_detail(&detail, &s).unwrap();
    let page = std::fs::read_to_string(&a.path).unwrap();
    assert!(page.contains("address unavailable"));
    assert!(page.contains("image unavailable"));
}

#[test]
fn fixed_output_dir_keeps_pages() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pages");
    let config = Config {
        out_dir: Some(out.clone()),
        open_browser: false,
        ..Config::new("k", "k")
    };
    let path = {
        let mut r = Renderer::with_viewer(&config, Box::new(NoopViewer)).unwrap();
        let s = county_sightings();
        r.render_detail(&robin_detail(), &s[0]).unwrap().path
    };
    assert!(path.starts_with(&out));
    assert!(path.exists());
}

#[test]
fn temporary_pages_are_removed_with_the_renderer() {
    let path = {
        let mut r = renderer();
        r.render_overview("Test County", &county_sightings()).unwrap()[0]
            .path
            .clone()
    };
    assert!(!path.exists());
}

struct Recording(Rc<RefCell<Vec<PathBuf>>>);

impl Viewer for Recording {
    fn show(&self, path: &Path) -> io::Result<()> {
        self.0.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

#[test]
fn every_page_is_shown_in_order() {
    let shown = Rc::new(RefCell::new(Vec::new()));
    let config = Config {
        open_browser: false,
        ..Config::new("k", "k")
    };
    let mut r = Renderer::with_viewer(&config, Box::new(Recording(shown.clone()))).unwrap();
    let s = county_sightings();
    let arts = r.render_overview("Test County", &s).unwrap();
    let detail = r.render_detail(&robin_detail(), &s[0]).unwrap();
    let expected: Vec<PathBuf> = arts
        .iter()
        .chain(std::iter::once(&detail))
        .map(|a| a.path.clone())
        .collect();
    assert_eq!(*shown.borrow(), expected);
    assert!(expected[0].to_string_lossy().ends_with("001-species-counts.html"));
}

struct Broken;

impl Viewer for Broken {
    fn show(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no browser"))
    }
}

#[test]
fn viewer_failure_is_reported() {
    let config = Config {
        open_browser: false,
        ..Config::new("k", "k")
    };
    let mut r = Renderer::with_viewer(&config, Box::new(Broken)).unwrap();
    let s = county_sightings();
    let err = r.render_detail(&robin_detail(), &s[0]).unwrap_err();
    assert!(matches!(err, RenderError::Open { .. }));
}

/// Fails on the first page only, recording every attempt.
struct FailsFirst(Rc<RefCell<Vec<PathBuf>>>);

impl Viewer for FailsFirst {
    fn show(&self, path: &Path) -> io::Result<()> {
        let mut shown = self.0.borrow_mut();
        shown.push(path.to_path_buf());
        if shown.len() == 1 {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no browser"));
        }
        Ok(())
    }
}

#[test]
fn viewer_failure_still_writes_every_overview_page() {
    let config = Config {
        open_browser: false,
        ..Config::new("k", "k")
    };
    let mut r = Renderer::with_viewer(&config, Box::new(Broken)).unwrap();
    let err = r
        .render_overview("Test County", &county_sightings())
        .unwrap_err();
    match err {
        RenderError::Open { path, .. } => {
            assert!(path.to_string_lossy().ends_with("001-species-counts.html"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(r.artifacts().len(), 5);
    assert!(r.artifacts().iter().all(|a| a.path.exists()));
}

#[test]
fn viewer_is_tried_for_every_page_after_a_failure() {
    let shown = Rc::new(RefCell::new(Vec::new()));
    let config = Config {
        open_browser: false,
        ..Config::new("k", "k")
    };
    let mut r = Renderer::with_viewer(&config, Box::new(FailsFirst(shown.clone()))).unwrap();
    assert!(r.render_overview("Test County", &county_sightings()).is_err());
    let expected: Vec<PathBuf> = r.artifacts().iter().map(|a| a.path.clone()).collect();
    assert_eq!(*shown.borrow(), expected);
    assert_eq!(expected.len(), 5);
}
