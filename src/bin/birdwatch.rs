use anyhow::{Context, Result};
use birdwatch::config::{self, Credentials};
use birdwatch::{Config, EbirdClient, GeocodeClient, Renderer, Session, load_regions};
use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "birdwatch",
    version,
    about = "Browse recent eBird sightings by U.S. county and chart them in your browser"
)]
struct Cli {
    /// Credentials file (TOML with `ebird_api_key` and `locationiq_api_key`).
    /// Defaults to ./secrets.toml, then <config dir>/birdwatch/secrets.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// State/county reference data (JSON).
    #[arg(long, default_value = config::DEFAULT_REGIONS_PATH)]
    regions: PathBuf,
    /// Keep rendered pages in this directory instead of a temporary one.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Write pages without opening them in the browser.
    #[arg(long, default_value_t = false)]
    no_browser: bool,
    /// eBird API base URL.
    #[arg(long, default_value = config::DEFAULT_EBIRD_URL)]
    ebird_url: String,
    /// LocationIQ base URL.
    #[arg(long, default_value = config::DEFAULT_GEOCODE_URL)]
    geocode_url: String,
    /// Macaulay Library media search base URL.
    #[arg(long, default_value = config::DEFAULT_MEDIA_URL)]
    media_url: String,
    /// Number of species in the species-count chart.
    #[arg(long, default_value_t = config::DEFAULT_MAX_SPECIES)]
    max_species: usize,
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn build_config(cli: Cli) -> Result<Config> {
    let file = config::load_credentials_file(cli.config.as_deref())
        .context("loading credentials")?;
    let base = Config::from_credentials(Credentials::from_env(), file)
        .context("resolving API keys")?;
    Ok(Config {
        ebird_url: cli.ebird_url,
        geocode_url: cli.geocode_url,
        media_url: cli.media_url,
        regions_path: cli.regions,
        out_dir: cli.out_dir,
        open_browser: !cli.no_browser,
        max_species: cli.max_species,
        ..base
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(cli)?;
    let regions = load_regions(&config.regions_path).context("loading reference data")?;
    let ebird = EbirdClient::new(&config)?;
    let geocoder = GeocodeClient::new(&config)?;
    let renderer = Renderer::new(&config).context("preparing the output directory")?;

    let stdin = io::stdin();
    let mut session = Session::new(regions, ebird, geocoder, renderer, stdin.lock(), io::stdout());
    session.run().context("console I/O")?;
    Ok(())
}
