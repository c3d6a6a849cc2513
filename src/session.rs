//! The interactive read-eval loop, modeled as an explicit state machine.
//!
//! ```text
//! AwaitState -> AwaitCounty -> ShowOverview -> AwaitSightingChoice -> ShowDetail -> AwaitState
//!      \____________\______________\_________________\__________________________-> Exit
//! ```
//!
//! [`Session::step`] performs exactly one transition, so each state can be
//! driven on its own. Per-request failures become a message and a safe next
//! state; only console I/O errors escape.

use crate::ebird::EbirdClient;
use crate::geocode::GeocodeClient;
use crate::models::{Sighting, SpeciesDetail};
use crate::regions::{County, Region, Regions};
use crate::viz::Renderer;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Typed at any prompt (case-insensitive) to leave.
pub const EXIT_SENTINEL: &str = "exit";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitState,
    AwaitCounty {
        region: Region,
    },
    ShowOverview {
        region: Region,
        county: County,
    },
    AwaitSightingChoice {
        region: Region,
        county: County,
        sightings: Vec<Sighting>,
    },
    ShowDetail {
        sighting: Sighting,
        detail: SpeciesDetail,
    },
    Exit,
}

enum Reply {
    Exit,
    Line(String),
}

/// Parse a 1-based menu choice into a 0-based index. Digits only, `1..=max`.
pub fn parse_choice(input: &str, max: usize) -> Option<usize> {
    let s = input.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: usize = s.parse().ok()?;
    (1..=max).contains(&n).then(|| n - 1)
}

pub struct Session<R, W> {
    regions: Regions,
    ebird: EbirdClient,
    geocoder: GeocodeClient,
    renderer: Renderer,
    input: R,
    output: W,
    greeted: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        regions: Regions,
        ebird: EbirdClient,
        geocoder: GeocodeClient,
        renderer: Renderer,
        input: R,
        output: W,
    ) -> Self {
        Self {
            regions,
            ebird,
            geocoder,
            renderer,
            input,
            output,
            greeted: false,
        }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Loop from `AwaitState` until the user exits (sentinel or end of input).
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = SessionState::AwaitState;
        while !matches!(state, SessionState::Exit) {
            state = self.step(state)?;
        }
        writeln!(self.output, "\nGoodbye!")?;
        self.output.flush()
    }

    /// Perform one transition.
    pub fn step(&mut self, state: SessionState) -> io::Result<SessionState> {
        match state {
            SessionState::AwaitState => self.await_state(),
            SessionState::AwaitCounty { region } => self.await_county(region),
            SessionState::ShowOverview { region, county } => self.show_overview(region, county),
            SessionState::AwaitSightingChoice {
                region,
                county,
                sightings,
            } => self.await_sighting_choice(region, county, sightings),
            SessionState::ShowDetail { sighting, detail } => self.show_detail(sighting, detail),
            SessionState::Exit => Ok(SessionState::Exit),
        }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Reply> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        // Undecodable bytes become U+FFFD so the line simply fails to match.
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            writeln!(self.output)?;
            return Ok(Reply::Exit);
        }
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim();
        if line.eq_ignore_ascii_case(EXIT_SENTINEL) {
            Ok(Reply::Exit)
        } else {
            Ok(Reply::Line(line.to_string()))
        }
    }

    /// Prompt until a valid 1-based choice arrives; `None` means exit.
    fn choose_index(
        &mut self,
        prompt: &str,
        max: usize,
        domain: &str,
        action: &str,
    ) -> io::Result<Option<usize>> {
        let mut reply = self.ask(prompt)?;
        loop {
            match reply {
                Reply::Exit => return Ok(None),
                Reply::Line(s) => {
                    if let Some(i) = parse_choice(&s, max) {
                        return Ok(Some(i));
                    }
                }
            }
            reply = self.ask(&format!(
                "Please choose a valid integer (1-{max}) for the {domain} you would like to {action}, or \"exit\": "
            ))?;
        }
    }

    fn report(&mut self, msg: impl Display) -> io::Result<()> {
        log::warn!("{msg}");
        writeln!(self.output, "\n{msg}")
    }

    fn await_state(&mut self) -> io::Result<SessionState> {
        let prompt = if self.greeted {
            "\nTo search for more bird sightings, enter the name of the state you would like to query, or \"exit\": "
        } else {
            "\nWelcome! To get started searching for bird sightings info, enter the name of the state you would like to query, or \"exit\": "
        };
        self.greeted = true;
        let mut reply = self.ask(prompt)?;
        loop {
            match reply {
                Reply::Exit => return Ok(SessionState::Exit),
                Reply::Line(s) => {
                    if let Some(region) = self.regions.lookup(&s) {
                        return Ok(SessionState::AwaitCounty {
                            region: region.clone(),
                        });
                    }
                }
            }
            reply = self.ask("Please enter a valid state: ")?;
        }
    }

    fn await_county(&mut self, region: Region) -> io::Result<SessionState> {
        let region = if region.counties.is_empty() {
            match self.ebird.list_counties(&region) {
                Ok(counties) if !counties.is_empty() => Region { counties, ..region },
                Ok(_) => {
                    self.report(format!("Sorry! No counties are listed for {}.", region.name))?;
                    return Ok(SessionState::AwaitState);
                }
                Err(e) => {
                    self.report(format!(
                        "Sorry! Could not fetch the counties of {}: {e}",
                        region.name
                    ))?;
                    return Ok(SessionState::AwaitState);
                }
            }
        } else {
            region
        };

        writeln!(
            self.output,
            "\nLIST OF COUNTIES IN {}",
            region.name.to_uppercase()
        )?;
        for (i, county) in region.counties.iter().enumerate() {
            writeln!(self.output, "[{}] {}", i + 1, county.name)?;
        }

        let choice = self.choose_index(
            "\nSelect the integer of the county you would like to query, or \"exit\": ",
            region.counties.len(),
            "county",
            "query",
        )?;
        Ok(match choice {
            None => SessionState::Exit,
            Some(i) => SessionState::ShowOverview {
                county: region.counties[i].clone(),
                region,
            },
        })
    }

    fn show_overview(&mut self, region: Region, county: County) -> io::Result<SessionState> {
        writeln!(
            self.output,
            "\nFetching recent sightings for {}, {}...",
            county.name, region.name
        )?;
        let sightings = match self.ebird.list_sightings(&county, &region) {
            Ok(s) => s,
            Err(e) => {
                self.report(format!("Sorry! Could not fetch sightings: {e}"))?;
                return Ok(SessionState::AwaitCounty { region });
            }
        };
        if sightings.is_empty() {
            writeln!(
                self.output,
                "\nSorry! No sightings found in {}. Choose another county.",
                county.name
            )?;
            return Ok(SessionState::AwaitState);
        }

        let label = format!("{} County, {}", county.name, region.name);
        match self.renderer.render_overview(&label, &sightings) {
            Ok(artifacts) => {
                writeln!(self.output, "\nRendered {} overview charts:", artifacts.len())?;
                for a in &artifacts {
                    writeln!(self.output, "  {} ({})", a.title, a.path.display())?;
                }
            }
            Err(e) => self.report(format!("Could not show the overview charts: {e}"))?,
        }

        writeln!(
            self.output,
            "\nLIST OF BIRD SIGHTINGS IN {}",
            county.name.to_uppercase()
        )?;
        for (i, s) in sightings.iter().enumerate() {
            writeln!(
                self.output,
                "[{}] Species: {} | Date: {} | Location: {}",
                i + 1,
                s.common_name,
                s.observed,
                s.location
            )?;
        }
        Ok(SessionState::AwaitSightingChoice {
            region,
            county,
            sightings,
        })
    }

    fn await_sighting_choice(
        &mut self,
        region: Region,
        county: County,
        sightings: Vec<Sighting>,
    ) -> io::Result<SessionState> {
        let choice = self.choose_index(
            "\nSelect the integer of the bird sighting you would like to learn more about, or \"exit\": ",
            sightings.len(),
            "bird sighting",
            "learn more about",
        )?;
        let Some(i) = choice else {
            return Ok(SessionState::Exit);
        };
        let sighting = sightings[i].clone();

        let detail = match self.ebird.get_species_detail(&sighting.species_code) {
            Ok(d) => d,
            Err(e) => {
                self.report(format!(
                    "Sorry! Could not retrieve details for {}: {e}",
                    sighting.common_name
                ))?;
                return Ok(SessionState::AwaitSightingChoice {
                    region,
                    county,
                    sightings,
                });
            }
        };
        let detail = match self
            .geocoder
            .reverse_geocode(sighting.latitude, sighting.longitude)
        {
            Ok(address) => detail.with_address(address),
            Err(e) => {
                self.report(format!("Address lookup failed: {e}"))?;
                detail
            }
        };
        Ok(SessionState::ShowDetail { sighting, detail })
    }

    fn show_detail(&mut self, sighting: Sighting, detail: SpeciesDetail) -> io::Result<SessionState> {
        writeln!(
            self.output,
            "\n{} ({})\n  Order: {}\n  Family: {}\n  Seen: {} at {}\n  Address: {}",
            detail.common_name,
            detail.scientific_name,
            detail.taxonomy.order,
            detail.taxonomy.family_common,
            sighting.observed,
            sighting.location,
            detail.address_or_placeholder()
        )?;
        match self.renderer.render_detail(&detail, &sighting) {
            Ok(a) => writeln!(self.output, "\nRendered species details ({})", a.path.display())?,
            Err(e) => self.report(format!("Could not show the species details: {e}"))?,
        }
        Ok(SessionState::AwaitState)
    }
}
