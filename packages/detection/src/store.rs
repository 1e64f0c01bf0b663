//! Flat-file persistence for the detection store.
//!
//! The durable record is a header-first CSV. Column names are matched
//! case-insensitively with surrounding whitespace stripped, so files
//! produced by different provider generations load identically. Writes go
//! through a temp file and an atomic rename.

use std::path::{Path, PathBuf};

use hotspot_map_detection_models::{
    AcquisitionDate, DetectionBatch, DetectionField, FireDetection,
};

use crate::DetectionError;

/// Loads the persisted detection store.
///
/// A missing file is not an error (ingestion has simply never run) and
/// yields an empty batch.
///
/// # Errors
///
/// Returns [`DetectionError`] if the file exists but cannot be read or is
/// not structurally valid CSV.
pub fn load(path: &Path) -> Result<DetectionBatch, DetectionError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No detection store at {}; starting empty", path.display());
            return Ok(DetectionBatch::empty());
        }
        Err(e) => return Err(e.into()),
    };

    let batch = parse_csv(bytes.as_slice())?;
    log::info!("Loaded {} detections from {}", batch.len(), path.display());
    Ok(batch)
}

/// Parses detection CSV text into a batch.
///
/// Headers are normalized (trimmed, lowercased) before matching against
/// the known [`DetectionField`] columns; unrecognized columns are ignored.
/// Rows without a numeric latitude and longitude are skipped and counted.
/// An unparseable `acq_date` is kept verbatim as [`AcquisitionDate::Raw`];
/// a non-numeric `frp` is dropped to empty. Both degrade with a warning,
/// never a failure.
///
/// # Errors
///
/// Returns [`DetectionError::Csv`] if the reader hits malformed CSV.
pub fn parse_csv<R: std::io::Read>(reader: R) -> Result<DetectionBatch, DetectionError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<Option<DetectionField>> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_lowercase().parse::<DetectionField>().ok())
        .collect();

    let index_of = |field: DetectionField| headers.iter().position(|h| *h == Some(field));

    let Some(lat_idx) = index_of(DetectionField::Latitude) else {
        log::warn!("Detection CSV has no latitude column; no rows loaded");
        return Ok(DetectionBatch::empty());
    };
    let Some(lng_idx) = index_of(DetectionField::Longitude) else {
        log::warn!("Detection CSV has no longitude column; no rows loaded");
        return Ok(DetectionBatch::empty());
    };

    let date_idx = index_of(DetectionField::AcqDate);
    let satellite_idx = index_of(DetectionField::Satellite);
    let instrument_idx = index_of(DetectionField::Instrument);
    let frp_idx = index_of(DetectionField::Frp);
    let confidence_idx = index_of(DetectionField::Confidence);
    let version_idx = index_of(DetectionField::Version);

    let mut records = Vec::new();
    let mut skipped = 0_usize;
    let mut raw_dates = 0_usize;
    let mut bad_frp = 0_usize;

    for result in reader.records() {
        let row = result?;

        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let position = cell(Some(lat_idx))
            .and_then(|lat| lat.parse::<f64>().ok())
            .zip(cell(Some(lng_idx)).and_then(|lng| lng.parse::<f64>().ok()));

        let Some((latitude, longitude)) = position else {
            skipped += 1;
            continue;
        };

        let acq_date = cell(date_idx).map(AcquisitionDate::parse);
        if matches!(acq_date, Some(AcquisitionDate::Raw(_))) {
            raw_dates += 1;
        }

        let frp = cell(frp_idx).and_then(|raw| {
            raw.parse::<f64>().map_or_else(
                |_| {
                    bad_frp += 1;
                    None
                },
                Some,
            )
        });

        records.push(FireDetection {
            latitude,
            longitude,
            acq_date,
            satellite: cell(satellite_idx).map(ToOwned::to_owned),
            instrument: cell(instrument_idx).map(ToOwned::to_owned),
            frp,
            confidence: cell(confidence_idx).map(ToOwned::to_owned),
            version: cell(version_idx).map(ToOwned::to_owned),
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} rows without a numeric latitude/longitude");
    }
    if raw_dates > 0 {
        log::warn!(
            "{raw_dates} acquisition dates did not parse; kept raw, date filtering unavailable"
        );
    }
    if bad_frp > 0 {
        log::warn!("{bad_frp} frp values were not numeric and were dropped");
    }

    Ok(DetectionBatch::new(
        records,
        headers.iter().flatten().copied(),
    ))
}

/// Overwrites the detection store atomically.
///
/// The batch is written to `<file>.tmp` beside the target and renamed over
/// it, so a crash mid-write leaves the previous store intact. Only the
/// columns present in the batch's schema are written, in priority order.
///
/// # Errors
///
/// Returns [`DetectionError`] if the temp file cannot be written or the
/// rename fails.
pub fn persist(batch: &DetectionBatch, path: &Path) -> Result<(), DetectionError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let columns: Vec<DetectionField> = DetectionField::ALL
        .iter()
        .copied()
        .filter(|field| batch.fields().contains(field))
        .collect();

    let tmp = tmp_path(path);
    let mut writer = csv::Writer::from_path(&tmp)?;
    writer.write_record(columns.iter().map(AsRef::<str>::as_ref))?;
    for record in batch.records() {
        writer.write_record(
            columns
                .iter()
                .map(|field| record.field_text(*field).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    drop(writer);

    std::fs::rename(&tmp, path)?;
    log::info!("Persisted {} detections to {}", batch.len(), path.display());
    Ok(())
}

/// The sibling temp path used for atomic store rewrites.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| std::ffi::OsString::from("store"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}
