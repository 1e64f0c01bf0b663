#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Hotspot detection record and batch types.
//!
//! This crate defines the canonical detection schema shared across the
//! hotspot-map system: the per-record [`FireDetection`] type, the
//! [`AcquisitionDate`] representation that survives unparseable upstream
//! dates, and the [`DetectionBatch`] collection that pairs records with
//! the set of columns their source schema actually carried.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The detection columns that participate in duplicate detection.
///
/// Variant order is the priority order used when computing a merge key:
/// position fields first, then acquisition metadata, then measurement
/// fields. Upstream products disagree on which columns they ship, so the
/// active key for any given merge is the subset of these present in both
/// batches; see `hotspot_map_detection::merge`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DetectionField {
    /// Detection latitude in decimal degrees (always present).
    Latitude,
    /// Detection longitude in decimal degrees (always present).
    Longitude,
    /// Acquisition date of the observation.
    AcqDate,
    /// Observing satellite (e.g. "N" for Suomi NPP).
    Satellite,
    /// Observing instrument (e.g. "VIIRS", "MODIS").
    Instrument,
    /// Fire radiative power in megawatts.
    Frp,
    /// Detection confidence token, kept raw (letter class or percentage).
    Confidence,
    /// Product/collection version string.
    Version,
}

impl DetectionField {
    /// All identity fields in priority order.
    pub const ALL: &[Self] = &[
        Self::Latitude,
        Self::Longitude,
        Self::AcqDate,
        Self::Satellite,
        Self::Instrument,
        Self::Frp,
        Self::Confidence,
        Self::Version,
    ];
}

/// An acquisition date as reported upstream.
///
/// Upstream rows occasionally carry dates in formats we do not recognize.
/// Those load as [`Raw`](Self::Raw) so the record survives intact; the
/// cost is that date filtering becomes unavailable for the batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AcquisitionDate {
    /// A date that parsed as `YYYY-MM-DD`.
    Parsed(NaiveDate),
    /// The verbatim field value when parsing failed.
    Raw(String),
}

impl AcquisitionDate {
    /// Parses an upstream date field, falling back to the raw text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_or_else(|_| Self::Raw(raw.to_owned()), Self::Parsed)
    }

    /// Returns the parsed date, if this value parsed.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Parsed(date) => Some(*date),
            Self::Raw(_) => None,
        }
    }
}

impl std::fmt::Display for AcquisitionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parsed(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

/// A single satellite-observed thermal anomaly.
///
/// Latitude and longitude are the only fields every product guarantees;
/// everything else is optional and missing fields simply drop out of the
/// dedup key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FireDetection {
    /// Latitude in decimal degrees (EPSG:4326).
    pub latitude: f64,
    /// Longitude in decimal degrees (EPSG:4326).
    pub longitude: f64,
    /// Acquisition date, if the source carried one.
    pub acq_date: Option<AcquisitionDate>,
    /// Observing satellite.
    pub satellite: Option<String>,
    /// Observing instrument.
    pub instrument: Option<String>,
    /// Fire radiative power in megawatts.
    pub frp: Option<f64>,
    /// Raw confidence token.
    pub confidence: Option<String>,
    /// Product version string.
    pub version: Option<String>,
}

impl FireDetection {
    /// Creates a detection with only a position, all metadata absent.
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    /// Renders a field as the text that would appear in the store file.
    ///
    /// `None` means the record has no value for that field (the cell
    /// persists as empty).
    #[must_use]
    pub fn field_text(&self, field: DetectionField) -> Option<String> {
        match field {
            DetectionField::Latitude => Some(self.latitude.to_string()),
            DetectionField::Longitude => Some(self.longitude.to_string()),
            DetectionField::AcqDate => self.acq_date.as_ref().map(ToString::to_string),
            DetectionField::Satellite => self.satellite.clone(),
            DetectionField::Instrument => self.instrument.clone(),
            DetectionField::Frp => self.frp.map(|frp| frp.to_string()),
            DetectionField::Confidence => self.confidence.clone(),
            DetectionField::Version => self.version.clone(),
        }
    }
}

/// An ordered collection of detections plus the columns its source
/// schema carried.
///
/// The field set drives merge-key selection: two batches loaded from
/// different product generations may disagree on optional columns, and
/// only the shared ones can identify a duplicate. Batches are snapshots:
/// filters return new batches and never mutate their input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionBatch {
    records: Vec<FireDetection>,
    fields: BTreeSet<DetectionField>,
}

impl DetectionBatch {
    /// Creates a batch from records and the source's field set.
    ///
    /// Latitude and longitude are always part of the schema, whatever the
    /// caller passes.
    #[must_use]
    pub fn new(
        records: Vec<FireDetection>,
        fields: impl IntoIterator<Item = DetectionField>,
    ) -> Self {
        let mut fields: BTreeSet<DetectionField> = fields.into_iter().collect();
        fields.insert(DetectionField::Latitude);
        fields.insert(DetectionField::Longitude);
        Self { records, fields }
    }

    /// An empty batch with the minimal position-only schema.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), [])
    }

    /// The records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[FireDetection] {
        &self.records
    }

    /// The columns present in this batch's source schema.
    #[must_use]
    pub const fn fields(&self) -> &BTreeSet<DetectionField> {
        &self.fields
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds a new batch with the same schema but a subset of records.
    #[must_use]
    pub fn with_records(&self, records: Vec<FireDetection>) -> Self {
        Self {
            records,
            fields: self.fields.clone(),
        }
    }

    /// The identity fields shared between two batches, in priority order.
    #[must_use]
    pub fn shared_fields(&self, other: &Self) -> Vec<DetectionField> {
        DetectionField::ALL
            .iter()
            .copied()
            .filter(|field| self.fields.contains(field) && other.fields.contains(field))
            .collect()
    }

    /// Whether every record's acquisition date is usable for filtering.
    ///
    /// `false` when the source never carried the column, or when any row's
    /// date failed to parse. In both cases a date filter must pass the
    /// batch through unchanged rather than drop rows.
    #[must_use]
    pub fn date_filterable(&self) -> bool {
        self.fields.contains(&DetectionField::AcqDate)
            && self
                .records
                .iter()
                .all(|record| !matches!(record.acq_date, Some(AcquisitionDate::Raw(_))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip_through_strum() {
        assert_eq!(DetectionField::AcqDate.to_string(), "acq_date");
        assert_eq!("frp".parse::<DetectionField>().unwrap(), DetectionField::Frp);
        assert!("brightness".parse::<DetectionField>().is_err());
    }

    #[test]
    fn acquisition_date_parses_iso_dates() {
        let date = AcquisitionDate::parse("2024-01-15");
        assert_eq!(
            date.as_date(),
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(date.to_string(), "2024-01-15");
    }

    #[test]
    fn acquisition_date_keeps_unparseable_text() {
        let date = AcquisitionDate::parse("15/01/2024");
        assert_eq!(date.as_date(), None);
        assert_eq!(date.to_string(), "15/01/2024");
    }

    #[test]
    fn batch_always_includes_position_fields() {
        let batch = DetectionBatch::new(vec![], [DetectionField::Frp]);
        assert!(batch.fields().contains(&DetectionField::Latitude));
        assert!(batch.fields().contains(&DetectionField::Longitude));
        assert!(batch.fields().contains(&DetectionField::Frp));
    }

    #[test]
    fn shared_fields_follow_priority_order() {
        let a = DetectionBatch::new(vec![], [DetectionField::Version, DetectionField::AcqDate]);
        let b = DetectionBatch::new(vec![], [DetectionField::AcqDate, DetectionField::Frp]);
        assert_eq!(
            a.shared_fields(&b),
            vec![
                DetectionField::Latitude,
                DetectionField::Longitude,
                DetectionField::AcqDate,
            ]
        );
    }

    #[test]
    fn raw_date_disables_date_filtering() {
        let mut record = FireDetection::at(10.0, 20.0);
        record.acq_date = Some(AcquisitionDate::Raw("bad".to_owned()));
        let batch = DetectionBatch::new(vec![record], [DetectionField::AcqDate]);
        assert!(!batch.date_filterable());
    }

    #[test]
    fn missing_date_column_disables_date_filtering() {
        let batch = DetectionBatch::new(vec![FireDetection::at(10.0, 20.0)], []);
        assert!(!batch.date_filterable());
    }
}
