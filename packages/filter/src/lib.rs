#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure spatial and temporal subsetting of detection batches.
//!
//! Both filters are read-only: they take a batch by reference and return
//! a new batch with the same schema and a subset of the records. Neither
//! performs I/O, so they are safe to run concurrently across independent
//! sessions.

use chrono::NaiveDate;
use geo::{Intersects, Point};
use hotspot_map_detection_models::{DetectionBatch, FireDetection};
use hotspot_map_geography_models::AoiRegion;

/// Restricts a batch to detections inside an AOI region.
///
/// `None` is "show all" mode and returns the batch unchanged. Containment
/// is a planar point-in-polygon test on the EPSG:4326 coordinates;
/// detections exactly on the region boundary count as inside.
#[must_use]
pub fn filter_by_region(batch: &DetectionBatch, region: Option<&AoiRegion>) -> DetectionBatch {
    let Some(region) = region else {
        return batch.clone();
    };

    let kept: Vec<FireDetection> = batch
        .records()
        .iter()
        .filter(|record| {
            region
                .polygon
                .intersects(&Point::new(record.longitude, record.latitude))
        })
        .cloned()
        .collect();

    log::debug!(
        "Region '{}' kept {}/{} detections",
        region.name,
        kept.len(),
        batch.len()
    );

    batch.with_records(kept)
}

/// Whether a date filter was actually applied to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilterOutcome {
    /// The batch's dates were usable and out-of-range records were
    /// removed.
    Applied,
    /// The batch's dates were missing or unparsed; the batch passed
    /// through unchanged. Callers must surface this rather than present
    /// the result as filtered.
    Unavailable,
}

/// Restricts a batch to detections acquired within `[start, end]`,
/// inclusive on both ends.
///
/// When the batch is not date-filterable (no acquisition-date column, or
/// any date kept raw after a failed parse) the filter is a no-op and the
/// outcome reports [`DateFilterOutcome::Unavailable`]: rows are passed
/// through, never silently dropped. In an applied filter, records with no
/// date at all are excluded.
#[must_use]
pub fn filter_by_date_range(
    batch: &DetectionBatch,
    start: NaiveDate,
    end: NaiveDate,
) -> (DetectionBatch, DateFilterOutcome) {
    if !batch.date_filterable() {
        log::warn!("Acquisition dates unavailable; date filter not applied");
        return (batch.clone(), DateFilterOutcome::Unavailable);
    }

    let kept: Vec<FireDetection> = batch
        .records()
        .iter()
        .filter(|record| {
            record
                .acq_date
                .as_ref()
                .and_then(hotspot_map_detection_models::AcquisitionDate::as_date)
                .is_some_and(|date| date >= start && date <= end)
        })
        .cloned()
        .collect();

    log::debug!(
        "Date range {start}..={end} kept {}/{} detections",
        kept.len(),
        batch.len()
    );

    (batch.with_records(kept), DateFilterOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiPolygon, Polygon};
    use hotspot_map_detection_models::{AcquisitionDate, DetectionField};

    use super::*;

    fn square_region() -> AoiRegion {
        let square = Polygon::new(
            LineString::from(vec![
                (24.0, 13.0),
                (25.0, 13.0),
                (25.0, 14.0),
                (24.0, 14.0),
                (24.0, 13.0),
            ]),
            vec![],
        );
        AoiRegion {
            name: "Jebel Amer".to_owned(),
            polygon: MultiPolygon(vec![square]),
        }
    }

    fn dated(latitude: f64, longitude: f64, date: &str) -> FireDetection {
        FireDetection {
            acq_date: Some(AcquisitionDate::parse(date)),
            ..FireDetection::at(latitude, longitude)
        }
    }

    #[test]
    fn no_region_is_identity() {
        let batch = DetectionBatch::new(
            vec![FireDetection::at(10.0, 20.0), FireDetection::at(50.0, 60.0)],
            [],
        );
        assert_eq!(filter_by_region(&batch, None), batch);
    }

    #[test]
    fn keeps_only_contained_detections() {
        let region = square_region();
        let batch = DetectionBatch::new(
            vec![
                FireDetection::at(13.5, 24.5),
                FireDetection::at(13.9, 24.1),
                FireDetection::at(12.0, 24.5),
                FireDetection::at(13.5, 26.0),
            ],
            [],
        );
        let filtered = filter_by_region(&batch, Some(&region));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn boundary_points_count_as_contained() {
        let region = square_region();
        let batch = DetectionBatch::new(vec![FireDetection::at(13.0, 24.5)], []);
        let filtered = filter_by_region(&batch, Some(&region));
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let batch = DetectionBatch::new(
            vec![
                dated(10.0, 20.0, "2024-01-01"),
                dated(10.0, 21.0, "2024-01-05"),
                dated(10.0, 22.0, "2024-01-10"),
                dated(10.0, 23.0, "2024-01-11"),
            ],
            [DetectionField::AcqDate],
        );
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        let (filtered, outcome) = filter_by_date_range(&batch, start, end);
        assert_eq!(outcome, DateFilterOutcome::Applied);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn applied_filter_excludes_records_without_a_date() {
        let batch = DetectionBatch::new(
            vec![dated(10.0, 20.0, "2024-01-05"), FireDetection::at(10.0, 21.0)],
            [DetectionField::AcqDate],
        );
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let (filtered, outcome) = filter_by_date_range(&batch, start, end);
        assert_eq!(outcome, DateFilterOutcome::Applied);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn unparsed_dates_pass_the_batch_through() {
        let batch = DetectionBatch::new(
            vec![dated(10.0, 20.0, "bad-date"), dated(10.0, 21.0, "2024-01-05")],
            [DetectionField::AcqDate],
        );
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let (filtered, outcome) = filter_by_date_range(&batch, start, end);
        assert_eq!(outcome, DateFilterOutcome::Unavailable);
        assert_eq!(filtered, batch);
    }
}
