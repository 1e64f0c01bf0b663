//! Incremental merge with schema-drift-tolerant deduplication.
//!
//! Historical and freshly fetched batches may have been produced by
//! different provider generations with different optional columns. The
//! merge key is therefore computed per call: the identity fields present
//! in both batches, in [`DetectionField`] priority order. When field sets
//! diverge the key shrinks and precision weakens; that is the accepted
//! trade-off for never crashing on schema drift.

use std::collections::HashSet;

use hotspot_map_detection_models::{
    AcquisitionDate, DetectionBatch, DetectionField, FireDetection,
};

/// Merges a new batch into the existing record, dropping duplicates.
///
/// Existing records come first and win ties, so re-ingesting overlapping
/// lookback windows never reorders or replaces history. The result's
/// schema is the union of both inputs' field sets. If the inputs share no
/// identity fields at all, the key falls back to whole-record equality.
#[must_use]
pub fn merge(existing: &DetectionBatch, incoming: &DetectionBatch) -> DetectionBatch {
    let mut key_fields = existing.shared_fields(incoming);
    if key_fields.is_empty() {
        key_fields = DetectionField::ALL.to_vec();
    }

    let mut seen: HashSet<Vec<KeyToken>> = HashSet::new();
    let mut records = Vec::with_capacity(existing.len() + incoming.len());

    for record in existing.records().iter().chain(incoming.records()) {
        if seen.insert(record_key(record, &key_fields)) {
            records.push(record.clone());
        }
    }

    let dropped = existing.len() + incoming.len() - records.len();
    if dropped > 0 {
        log::debug!(
            "Merge dropped {dropped} duplicates over key {:?}",
            key_fields
        );
    }

    let fields = existing
        .fields()
        .iter()
        .chain(incoming.fields())
        .copied()
        .collect::<Vec<_>>();
    DetectionBatch::new(records, fields)
}

/// One field's contribution to a dedup key.
///
/// Floats compare by bit pattern: store values round-trip through the
/// same CSV rendering, so equal readings are bit-equal and no epsilon is
/// wanted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyToken {
    Missing,
    Float(u64),
    Text(String),
    Date(AcquisitionDate),
}

fn record_key(record: &FireDetection, fields: &[DetectionField]) -> Vec<KeyToken> {
    fields
        .iter()
        .map(|field| match field {
            DetectionField::Latitude => KeyToken::Float(record.latitude.to_bits()),
            DetectionField::Longitude => KeyToken::Float(record.longitude.to_bits()),
            DetectionField::AcqDate => record
                .acq_date
                .clone()
                .map_or(KeyToken::Missing, KeyToken::Date),
            DetectionField::Satellite => text_token(record.satellite.as_ref()),
            DetectionField::Instrument => text_token(record.instrument.as_ref()),
            DetectionField::Frp => record
                .frp
                .map_or(KeyToken::Missing, |frp| KeyToken::Float(frp.to_bits())),
            DetectionField::Confidence => text_token(record.confidence.as_ref()),
            DetectionField::Version => text_token(record.version.as_ref()),
        })
        .collect()
}

fn text_token(value: Option<&String>) -> KeyToken {
    value.map_or(KeyToken::Missing, |text| KeyToken::Text(text.clone()))
}
