//! Command-line front end for place resolution.
//!
//! Loads a place dataset and answers single lookups, lists or checks the
//! dataset, resolves a stream of `lon,lat` positions from stdin, or
//! converts a KML export into a dataset.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use georesolve::config::Config;
use georesolve::kml;
use georesolve::{GeoResolver, PlaceRegistry};

#[derive(Parser, Debug)]
#[command(name = "georesolve")]
#[command(about = "Resolve coordinates to named places")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Place dataset (overrides the config file)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the place containing a coordinate, or "-"
    Lookup {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Print every containing place instead of the first
        #[arg(long)]
        all: bool,
    },

    /// List loaded places
    List,

    /// Load the dataset and report skipped entries
    Check,

    /// Resolve "lon,lat" lines read from stdin
    Track,

    /// Convert a KML export into a place dataset
    Convert {
        input: PathBuf,

        /// Defaults to the input path with ".kml" replaced by ".json"
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Loading config {}", path.display()))?,
        None => Config::default(),
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dataset = args.dataset.unwrap_or(config.dataset.path);
    let registry = PlaceRegistry::from_file(&dataset);

    match args.command {
        Command::Lookup { lon, lat, all } => lookup(&registry, lon, lat, all),
        Command::List => list(&registry),
        Command::Check => check(&registry),
        Command::Track => track(&registry),
        Command::Convert { input, output } => convert(&input, output),
    }
}

fn convert(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| kml::default_output_path(input));

    let text = fs::read_to_string(input)
        .with_context(|| format!("Reading {}", input.display()))?;
    let records = kml::parse_kml(&text).with_context(|| format!("Converting {}", input.display()))?;

    let json = serde_json::to_string_pretty(&records)?;
    fs::write(&output, json).with_context(|| format!("Writing {}", output.display()))?;

    info!("Wrote {} entries to {}", records.len(), output.display());
    Ok(())
}

fn lookup(registry: &PlaceRegistry, lon: f64, lat: f64, all: bool) -> Result<()> {
    let resolver = GeoResolver::new(registry);

    if all {
        for name in resolver.resolve_all(geo::Coord { x: lon, y: lat }) {
            println!("{}", name);
        }
    } else {
        println!("{}", resolver.resolve_lon_lat(lon, lat).as_deref().unwrap_or("-"));
    }

    Ok(())
}

fn list(registry: &PlaceRegistry) -> Result<()> {
    registry
        .ensure_loaded()
        .with_context(|| format!("Loading {}", registry.source()))?;
    let Some(set) = registry.places() else {
        anyhow::bail!("Registry not loaded");
    };

    let mut out = io::stdout().lock();
    for (i, place) in set.iter().enumerate() {
        match place.bbox() {
            Some(rect) => writeln!(
                out,
                "{:>3}  {}  ({} points, lon {:.6}..{:.6}, lat {:.6}..{:.6})",
                i,
                place.name,
                place.boundary.len(),
                rect.min().x,
                rect.max().x,
                rect.min().y,
                rect.max().y
            )?,
            None => writeln!(out, "{:>3}  {}", i, place.name)?,
        }
    }

    Ok(())
}

fn check(registry: &PlaceRegistry) -> Result<()> {
    registry
        .ensure_loaded()
        .with_context(|| format!("Loading {}", registry.source()))?;
    let Some(set) = registry.places() else {
        anyhow::bail!("Registry not loaded");
    };

    let report = set.report();
    println!("source:  {}", report.source);
    println!("loaded:  {}", report.loaded);
    println!("skipped: {}", report.skipped.len());
    for entry in &report.skipped {
        println!("  {}", entry);
    }

    Ok(())
}

fn track(registry: &PlaceRegistry) -> Result<()> {
    let resolver = GeoResolver::new(registry);
    let mut current: Option<String> = None;
    let mut out = io::stdout().lock();

    for line in io::stdin().lock().lines() {
        let line = line.context("Reading stdin")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((lon, lat)) = parse_position(line) else {
            warn!("Ignoring malformed position {:?}", line);
            continue;
        };

        let place = resolver.resolve_lon_lat(lon, lat);
        if place != current {
            if let Some(prev) = &current {
                info!("Left {}", prev);
            }
            if let Some(next) = &place {
                info!("Entered {}", next);
            }
            current = place.clone();
        }

        writeln!(
            out,
            "{} {} {}",
            lon,
            lat,
            place.as_deref().unwrap_or("-")
        )?;
    }

    Ok(())
}

/// Parse "lon,lat" or "lon lat"
fn parse_position(line: &str) -> Option<(f64, f64)> {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let lon = parts.next()?.parse().ok()?;
    let lat = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((lon, lat))
}
