#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the hotspot map pipeline.
//!
//! `ingest` fetches a fresh detection batch from the remote provider and
//! merges it into the local store; `compose` turns the stored detections
//! and reference layers into the layer/viewport handoff document for the
//! rendering frontend.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hotspot_map_detection::fetch::{BoundingBox, FIRMS_AREA_CSV_BASE, FetchConfig};
use hotspot_map_detection::{fetch, merge, store};
use hotspot_map_detection_models::DetectionBatch;
use hotspot_map_filter::DateFilterOutcome;
use hotspot_map_geography::{GeometryPaths, GeometryStore};
use hotspot_map_map::{compose_layers, compute_view, handoff_document};

#[derive(Parser)]
#[command(name = "hotspot-map", about = "Hotspot detection map pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch fresh detections and merge them into the local store
    Ingest(IngestArgs),
    /// Compose the layer/viewport handoff document from local data
    Compose(ComposeArgs),
}

#[derive(Args)]
struct IngestArgs {
    /// Provider access key; falls back to the FIRMS_MAP_KEY env var
    #[arg(long)]
    map_key: Option<String>,

    /// Hotspot product identifier
    #[arg(long, default_value = "VIIRS_SNPP_NRT")]
    product: String,

    /// Bounding box as minLon,minLat,maxLon,maxLat
    #[arg(long, default_value = "21,8,33,18")]
    bbox: BoundingBox,

    /// Trailing number of days to fetch
    #[arg(long, default_value_t = 10)]
    days: u32,

    /// Detection store file
    #[arg(long, default_value = "data/raw/detections.csv")]
    store: PathBuf,
}

#[derive(Args)]
struct ComposeArgs {
    /// Detection store file
    #[arg(long, default_value = "data/raw/detections.csv")]
    store: PathBuf,

    /// AOI polygon collection (GeoJSON)
    #[arg(long, default_value = "data/aoi/aoi_regions.geojson")]
    aoi: PathBuf,

    /// Border-crossing table (CSV)
    #[arg(long, default_value = "data/reference/border_crossings.csv")]
    crossings: PathBuf,

    /// Mining-site table (CSV)
    #[arg(long, default_value = "data/reference/mining_sites.csv")]
    mines: PathBuf,

    /// AOI region to filter to; omit to show all detections
    #[arg(long)]
    region: Option<String>,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Write the handoff document here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest(args) => ingest(args).await,
        Commands::Compose(args) => compose(&args),
    }
}

/// Runs one ingestion: fetch, merge against the existing store, persist.
///
/// The store is only rewritten after a successful fetch and merge, so a
/// failed run leaves the durable record untouched.
async fn ingest(args: IngestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let map_key = args
        .map_key
        .or_else(|| std::env::var("FIRMS_MAP_KEY").ok())
        .ok_or("No provider key: pass --map-key or set FIRMS_MAP_KEY")?;

    let config = FetchConfig {
        base_url: FIRMS_AREA_CSV_BASE.to_owned(),
        map_key,
        product: args.product,
        bbox: args.bbox,
        lookback_days: args.days,
    };

    let incoming = fetch::fetch_remote_batch(&config).await?;
    let existing = store::load(&args.store)?;
    let merged = merge::merge(&existing, &incoming);

    log::info!(
        "Merged {} existing + {} fetched -> {} total detections",
        existing.len(),
        incoming.len(),
        merged.len()
    );

    store::persist(&merged, &args.store)?;
    Ok(())
}

/// Composes the handoff document from the local store and reference data.
///
/// Reference-data problems degrade (no region filter, missing marker
/// layers) rather than fail; only an unwritable output is an error.
fn compose(args: &ComposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let geometry = GeometryStore::open(GeometryPaths {
        regions: args.aoi.clone(),
        crossings: args.crossings.clone(),
        mines: args.mines.clone(),
    });

    let region = args.region.as_deref().and_then(|name| {
        let region = geometry.region(name);
        if region.is_none() {
            log::warn!("Unknown region '{name}'; composing without a region filter");
        }
        region
    });

    let batch = match store::load(&args.store) {
        Ok(batch) => batch,
        Err(e) => {
            log::warn!("Detection store unavailable: {e}");
            DetectionBatch::empty()
        }
    };

    let filtered = hotspot_map_filter::filter_by_region(&batch, region);

    let filtered = if args.start.is_some() || args.end.is_some() {
        let start = args.start.unwrap_or(NaiveDate::MIN);
        let end = args.end.unwrap_or(NaiveDate::MAX);
        let (result, outcome) = hotspot_map_filter::filter_by_date_range(&filtered, start, end);
        if outcome == DateFilterOutcome::Unavailable {
            log::warn!("Date filtering unavailable for this store; showing all dates");
        }
        result
    } else {
        filtered
    };

    let view = compute_view(region);
    let layers = compose_layers(&filtered, region, geometry.crossings(), geometry.mines());
    let document = handoff_document(&layers, &view);

    log::info!(
        "Composed {} layers over {} detections",
        layers.len(),
        filtered.len()
    );

    match &args.output {
        Some(path) => write_document(&document, path),
        None => {
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
    }
}

/// Writes the handoff document atomically (temp file + rename).
fn write_document(
    document: &serde_json::Value,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path
        .file_name()
        .map_or_else(|| std::ffi::OsString::from("layers"), ToOwned::to_owned);
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, serde_json::to_string_pretty(document)?)?;
    std::fs::rename(&tmp, path)?;

    log::info!("Wrote handoff document to {}", path.display());
    Ok(())
}
