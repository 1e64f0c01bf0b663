//! Viewport calculation.
//!
//! A selected region centers the view on its polygon centroid at a zoom
//! that frames a single AOI; no selection falls back to a fixed
//! country-scale view of the whole study area. Pitch is always 0 since
//! this is a 2D analytical map, not a scene viewer.

use geo::Centroid;
use hotspot_map_geography_models::AoiRegion;
use serde::Serialize;

/// Study-area default center: midpoint of the Sudan + Darfur + Kordofan
/// bounding box (21,8,33,18).
pub const DEFAULT_CENTER_LAT: f64 = 13.0;
/// See [`DEFAULT_CENTER_LAT`].
pub const DEFAULT_CENTER_LNG: f64 = 27.0;
/// Country-scale zoom for the whole study area.
pub const DEFAULT_ZOOM: f64 = 5.0;
/// Zoom that frames a single AOI comfortably.
pub const REGIONAL_ZOOM: f64 = 8.0;

/// The center, zoom, and tilt used to initialize a map view.
///
/// Computed per composition, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Center latitude in decimal degrees.
    pub center_lat: f64,
    /// Center longitude in decimal degrees.
    pub center_lng: f64,
    /// Map zoom level.
    pub zoom: f64,
    /// Camera tilt, always 0.
    pub pitch: f64,
}

/// Computes the view for the active region selection.
///
/// A region with a degenerate polygon (no centroid) also falls back to
/// the study-area default.
#[must_use]
pub fn compute_view(region: Option<&AoiRegion>) -> ViewState {
    region
        .and_then(|region| region.polygon.centroid())
        .map_or_else(default_view, |centroid| ViewState {
            center_lat: centroid.y(),
            center_lng: centroid.x(),
            zoom: REGIONAL_ZOOM,
            pitch: 0.0,
        })
}

const fn default_view() -> ViewState {
    ViewState {
        center_lat: DEFAULT_CENTER_LAT,
        center_lng: DEFAULT_CENTER_LNG,
        zoom: DEFAULT_ZOOM,
        pitch: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiPolygon, Polygon};

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

    #[test]
    fn no_selection_gives_the_fixed_study_area_view() {
        let view = compute_view(None);
        assert!((view.center_lat - DEFAULT_CENTER_LAT).abs() < f64::EPSILON);
        assert!((view.center_lng - DEFAULT_CENTER_LNG).abs() < f64::EPSILON);
        assert!((view.zoom - DEFAULT_ZOOM).abs() < f64::EPSILON);
        assert!(view.pitch.abs() < f64::EPSILON);
    }

    #[test]
    fn selected_region_centers_on_its_centroid() {
        let view = compute_view(Some(&square_region()));
        assert!((view.center_lat - 13.5).abs() < 1e-9);
        assert!((view.center_lng - 24.5).abs() < 1e-9);
        assert!((view.zoom - REGIONAL_ZOOM).abs() < f64::EPSILON);
        assert!(view.pitch.abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_polygon_falls_back_to_the_default_view() {
        let region = AoiRegion {
            name: "empty".to_owned(),
            polygon: MultiPolygon(vec![]),
        };
        assert_eq!(compute_view(Some(&region)), compute_view(None));
    }
}
