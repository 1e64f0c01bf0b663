//! Point-of-interest table loading.
//!
//! Each table is a CSV with `name,lat,lon` columns. POIs are rendering
//! data only, so every failure mode here is non-fatal: a missing file or
//! missing required columns yields an empty table and a warning.

use std::path::Path;

use hotspot_map_geography_models::{PointOfInterest, PoiKind};

use crate::ConfigurationError;

/// Loads a point-of-interest table, degrading to empty on any failure.
#[must_use]
pub fn load_points_of_interest(path: &Path, kind: PoiKind) -> Vec<PointOfInterest> {
    match read_table(path, kind) {
        Ok(pois) => {
            log::info!("Loaded {} {kind} markers from {}", pois.len(), path.display());
            pois
        }
        Err(e) => {
            log::warn!("No {kind} markers: {e}");
            Vec::new()
        }
    }
}

fn read_table(path: &Path, kind: PoiKind) -> Result<Vec<PointOfInterest>, ConfigurationError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ConfigurationError::new(format!("POI file {}: {e}", path.display())))?;
    parse_table(bytes.as_slice(), kind)
}

fn parse_table<R: std::io::Read>(
    reader: R,
    kind: PoiKind,
) -> Result<Vec<PointOfInterest>, ConfigurationError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ConfigurationError::new(format!("POI header row: {e}")))?
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    let index_of = |column: &str| headers.iter().position(|h| h == column);

    let (Some(name_idx), Some(lat_idx), Some(lon_idx)) =
        (index_of("name"), index_of("lat"), index_of("lon"))
    else {
        return Err(ConfigurationError::new(
            "POI table is missing one of the required name/lat/lon columns",
        ));
    };

    let mut pois = Vec::new();
    let mut skipped = 0_usize;

    for result in reader.records() {
        let row = result.map_err(|e| ConfigurationError::new(format!("POI row: {e}")))?;

        let name = row.get(name_idx).map(str::trim).filter(|s| !s.is_empty());
        let latitude = row.get(lat_idx).and_then(|s| s.trim().parse::<f64>().ok());
        let longitude = row.get(lon_idx).and_then(|s| s.trim().parse::<f64>().ok());

        let (Some(name), Some(latitude), Some(longitude)) = (name, latitude, longitude) else {
            skipped += 1;
            continue;
        };

        pois.push(PointOfInterest {
            name: name.to_owned(),
            latitude,
            longitude,
            kind,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} {kind} rows without a name and numeric position");
    }

    Ok(pois)
}
