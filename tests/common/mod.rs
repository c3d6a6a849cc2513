#![allow(dead_code)]

use birdwatch::regions::{County, Region, Regions};
use birdwatch::viz::{Artifact, NoopViewer};
use birdwatch::{Config, EbirdClient, GeocodeClient, Renderer, Session};
use std::io::Cursor;

pub const EBIRD_KEY: &str = "test-ebird";
pub const LIQ_KEY: &str = "test-liq";

/// Config pointing every service at one mock server, browser off.
pub fn test_config(server_url: &str) -> Config {
    Config {
        ebird_url: server_url.to_string(),
        geocode_url: server_url.to_string(),
        media_url: server_url.to_string(),
        open_browser: false,
        ..Config::new(EBIRD_KEY, LIQ_KEY)
    }
}

/// Michigan with two counties, New York without any (fetched from the API).
pub fn sample_regions() -> Regions {
    Regions::new(vec![
        Region {
            name: "Michigan".into(),
            code: "US-MI".into(),
            counties: vec![
                County {
                    name: "Alcona".into(),
                    code: "US-MI-001".into(),
                },
                County {
                    name: "Alger".into(),
                    code: "US-MI-003".into(),
                },
            ],
        },
        Region {
            name: "New York".into(),
            code: "US-NY".into(),
            counties: vec![],
        },
    ])
    .unwrap()
}

pub const OBSERVATIONS: &str = r#"[
  {"speciesCode":"amerob","comName":"American Robin","sciName":"Turdus migratorius","locId":"L1",
   "locName":"Nichols Arboretum","obsDt":"2024-05-02 08:15","howMany":3,"lat":42.2807,"lng":-83.7236,
   "obsValid":true,"obsReviewed":false,"locationPrivate":false,"subId":"S1"},
  {"speciesCode":"blujay","comName":"Blue Jay","sciName":"Cyanocitta cristata","locId":"L2",
   "locName":"Backyard feeder","obsDt":"2024-05-01 17:40","howMany":1,"lat":42.29,"lng":-83.71,
   "obsValid":true,"obsReviewed":false,"locationPrivate":true,"subId":"S2"},
  {"speciesCode":"amerob","comName":"American Robin","sciName":"Turdus migratorius","locId":"L3",
   "locName":"Gallup Park","obsDt":"2024-05-01","lat":42.30,"lng":-83.70,
   "obsValid":true,"obsReviewed":false,"locationPrivate":false,"subId":"S3"},
  {"comName":"Mystery bird","lat":42.0,"lng":-83.0}
]"#;

pub const ROBIN_TAXON: &str = r#"[
  {"sciName":"Turdus migratorius","comName":"American Robin","speciesCode":"amerob","category":"species",
   "taxonOrder":27346.0,"bandingCodes":["AMRO"],"comNameCodes":[],"sciNameCodes":["TUMI"],
   "order":"Passeriformes","familyCode":"turdid1","familyComName":"Thrushes and Allies",
   "familySciName":"Turdidae"}
]"#;

pub const ROBIN_MEDIA: &str = r#"{"results":{"count":1,"content":[
  {"mediaUrl":"https://cdn.example.org/asset/123/1200","previewUrl":"https://cdn.example.org/asset/123/320"}
]}}"#;

pub const ARBORETUM_ADDRESS: &str = "Nichols Arboretum, Ann Arbor, Washtenaw County, Michigan, USA";

pub fn geocode_body(address: &str) -> String {
    format!(
        r#"{{"place_id":"1","lat":"42.2807","lon":"-83.7236","display_name":"{address}"}}"#
    )
}

pub fn session_for(config: &Config, input: impl AsRef<[u8]>) -> Session<Cursor<Vec<u8>>, Vec<u8>> {
    Session::new(
        sample_regions(),
        EbirdClient::new(config).unwrap(),
        GeocodeClient::new(config).unwrap(),
        Renderer::with_viewer(config, Box::new(NoopViewer)).unwrap(),
        Cursor::new(input.as_ref().to_vec()),
        Vec::new(),
    )
}

/// Run a whole session over `input`; returns console output and rendered artifacts.
pub fn run_session(config: &Config, input: impl AsRef<[u8]>) -> (String, Vec<Artifact>) {
    let mut session = session_for(config, input);
    session.run().unwrap();
    (
        String::from_utf8_lossy(session.output()).into_owned(),
        session.renderer().artifacts().to_vec(),
    )
}
