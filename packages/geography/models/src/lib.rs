#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic reference types.
//!
//! Area-of-interest regions (named polygons used for spatial filtering)
//! and points of interest (border crossings and mining sites, rendered as
//! markers but never used for filtering).

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A named area-of-interest polygon in EPSG:4326.
///
/// The name is the selection key users pick regions by, unique within a
/// loaded collection. Loaded once per session and immutable until an
/// explicit store refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct AoiRegion {
    /// Unique region name, e.g. "Jebel Amer".
    pub name: String,
    /// Region geometry. Single polygons are promoted to a one-element
    /// multipolygon on load.
    pub polygon: MultiPolygon<f64>,
}

/// The kinds of point-of-interest tables the map renders.
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
pub enum PoiKind {
    /// A border crossing point.
    BorderCrossing,
    /// A mining site.
    MiningSite,
}

/// A single rendered map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Marker label shown by the renderer's tooltip.
    pub name: String,
    /// Latitude in decimal degrees (EPSG:4326).
    pub latitude: f64,
    /// Longitude in decimal degrees (EPSG:4326).
    pub longitude: f64,
    /// Which reference table this marker came from.
    pub kind: PoiKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poi_kind_round_trips_through_strum() {
        assert_eq!(PoiKind::BorderCrossing.to_string(), "border_crossing");
        assert_eq!(
            "mining_site".parse::<PoiKind>().unwrap(),
            PoiKind::MiningSite
        );
        assert!("checkpoint".parse::<PoiKind>().is_err());
    }
}
