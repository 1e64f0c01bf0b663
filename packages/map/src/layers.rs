//! Renderable layer composition.
//!
//! Layers are emitted back-to-front: the detection heat layer first, the
//! active region outline next, point markers last so they are never
//! visually obscured. An empty sequence is a valid outcome and renders
//! nothing.

use geo::MultiPolygon;
use hotspot_map_detection_models::DetectionBatch;
use hotspot_map_geography_models::{AoiRegion, PointOfInterest, PoiKind};
use serde_json::json;

use crate::ViewState;

/// An RGB color handed to the renderer.
pub type Rgb = [u8; 3];

/// Border-crossing marker color (blue).
pub const CROSSING_COLOR: Rgb = [0, 102, 255];
/// Mining-site marker color (gold).
pub const MINE_COLOR: Rgb = [255, 204, 0];
/// Region outline stroke color (red).
pub const OUTLINE_COLOR: Rgb = [255, 0, 0];
/// Marker radius in pixels.
pub const MARKER_RADIUS_PX: f64 = 6.0;

/// One renderable map layer.
///
/// Order within a composed sequence is significant; see
/// [`compose_layers`].
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSpec {
    /// Detection density heat layer over `[lng, lat]` positions.
    Heat {
        /// Detection positions, `[lng, lat]`.
        points: Vec<[f64; 2]>,
    },
    /// Stroked outline of the active AOI region.
    Outline {
        /// Region name, for the renderer's tooltip.
        name: String,
        /// Region geometry.
        polygon: MultiPolygon<f64>,
    },
    /// A point-marker layer for one POI table.
    Points {
        /// Which table these markers came from.
        kind: PoiKind,
        /// The markers.
        points: Vec<PointOfInterest>,
        /// Marker fill color.
        color: Rgb,
        /// Marker radius in pixels.
        radius_px: f64,
    },
}

impl LayerSpec {
    /// Serializes this layer for the handoff document.
    ///
    /// Outline geometry becomes a GeoJSON geometry object; everything
    /// else is plain JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Heat { points } => json!({
                "layer": "heat",
                "points": points,
            }),
            Self::Outline { name, polygon } => json!({
                "layer": "outline",
                "region": name,
                "color": OUTLINE_COLOR,
                "geometry": geojson::Value::from(polygon),
            }),
            Self::Points {
                kind,
                points,
                color,
                radius_px,
            } => json!({
                "layer": "points",
                "kind": kind,
                "color": color,
                "radiusPx": radius_px,
                "points": points,
            }),
        }
    }
}

/// Assembles the ordered layer sequence for one composed view.
///
/// The heat layer appears only when there are detections to aggregate,
/// the outline only when a region is selected, and each marker layer only
/// when its table is non-empty. Crossings and mines get fixed, visually
/// distinct colors so the renderer's tooltip can disambiguate them.
#[must_use]
pub fn compose_layers(
    detections: &DetectionBatch,
    region: Option<&AoiRegion>,
    crossings: &[PointOfInterest],
    mines: &[PointOfInterest],
) -> Vec<LayerSpec> {
    let mut layers = Vec::new();

    if !detections.is_empty() {
        layers.push(LayerSpec::Heat {
            points: detections
                .records()
                .iter()
                .map(|record| [record.longitude, record.latitude])
                .collect(),
        });
    }

    if let Some(region) = region {
        layers.push(LayerSpec::Outline {
            name: region.name.clone(),
            polygon: region.polygon.clone(),
        });
    }

    if !crossings.is_empty() {
        layers.push(LayerSpec::Points {
            kind: PoiKind::BorderCrossing,
            points: crossings.to_vec(),
            color: CROSSING_COLOR,
            radius_px: MARKER_RADIUS_PX,
        });
    }

    if !mines.is_empty() {
        layers.push(LayerSpec::Points {
            kind: PoiKind::MiningSite,
            points: mines.to_vec(),
            color: MINE_COLOR,
            radius_px: MARKER_RADIUS_PX,
        });
    }

    log::debug!("Composed {} layers", layers.len());
    layers
}

/// Builds the JSON document handed to the rendering collaborator:
/// the view state plus the layers in composition order.
#[must_use]
pub fn handoff_document(layers: &[LayerSpec], view: &ViewState) -> serde_json::Value {
    json!({
        "view": view,
        "layers": layers.iter().map(LayerSpec::to_json).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Polygon};
    use hotspot_map_detection_models::FireDetection;

    use super::*;
    use crate::compute_view;

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

    fn marker(name: &str, kind: PoiKind) -> PointOfInterest {
        PointOfInterest {
            name: name.to_owned(),
            latitude: 13.5,
            longitude: 24.5,
            kind,
        }
    }

    #[test]
    fn nothing_to_show_composes_no_layers() {
        let layers = compose_layers(&DetectionBatch::empty(), None, &[], &[]);
        assert!(layers.is_empty());
    }

    #[test]
    fn layers_come_out_back_to_front() {
        let detections = DetectionBatch::new(vec![FireDetection::at(13.5, 24.5)], []);
        let region = square_region();
        let crossings = [marker("Tine", PoiKind::BorderCrossing)];
        let mines = [marker("Jebel Amer workings", PoiKind::MiningSite)];

        let layers = compose_layers(&detections, Some(&region), &crossings, &mines);
        assert_eq!(layers.len(), 4);
        assert!(matches!(layers[0], LayerSpec::Heat { .. }));
        assert!(matches!(layers[1], LayerSpec::Outline { .. }));
        assert!(matches!(
            layers[2],
            LayerSpec::Points {
                kind: PoiKind::BorderCrossing,
                color: CROSSING_COLOR,
                ..
            }
        ));
        assert!(matches!(
            layers[3],
            LayerSpec::Points {
                kind: PoiKind::MiningSite,
                color: MINE_COLOR,
                ..
            }
        ));
    }

    #[test]
    fn empty_marker_tables_emit_no_point_layers() {
        let detections = DetectionBatch::new(vec![FireDetection::at(13.5, 24.5)], []);
        let layers = compose_layers(&detections, None, &[], &[]);
        assert_eq!(layers.len(), 1);
        assert!(matches!(layers[0], LayerSpec::Heat { .. }));
    }

    #[test]
    fn handoff_document_carries_view_and_ordered_layers() {
        let detections = DetectionBatch::new(vec![FireDetection::at(13.5, 24.5)], []);
        let region = square_region();
        let layers = compose_layers(&detections, Some(&region), &[], &[]);
        let view = compute_view(Some(&region));

        let document = handoff_document(&layers, &view);
        assert!((document["view"]["centerLat"].as_f64().unwrap() - 13.5).abs() < 1e-9);
        assert!((document["view"]["pitch"].as_f64().unwrap()).abs() < f64::EPSILON);

        let rendered = document["layers"].as_array().unwrap();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0]["layer"], "heat");
        assert_eq!(rendered[1]["layer"], "outline");
        assert_eq!(rendered[1]["region"], "Jebel Amer");
        assert_eq!(rendered[1]["geometry"]["type"], "MultiPolygon");
    }

    // The full selection scenario: a square AOI, three detections inside
    // and two outside, filter mode "inside AOI".
    #[test]
    fn filtered_region_composes_heat_and_outline() {
        let region = square_region();
        let batch = DetectionBatch::new(
            vec![
                FireDetection::at(13.2, 24.2),
                FireDetection::at(13.5, 24.5),
                FireDetection::at(13.8, 24.8),
                FireDetection::at(10.0, 24.5),
                FireDetection::at(13.5, 30.0),
            ],
            [],
        );

        let filtered = hotspot_map_filter::filter_by_region(&batch, Some(&region));
        assert_eq!(filtered.len(), 3);

        let layers = compose_layers(&filtered, Some(&region), &[], &[]);
        assert_eq!(layers.len(), 2);

        let LayerSpec::Heat { points } = &layers[0] else {
            panic!("expected a heat layer first");
        };
        assert_eq!(points.len(), 3);

        let LayerSpec::Outline { name, .. } = &layers[1] else {
            panic!("expected an outline layer second");
        };
        assert_eq!(name, "Jebel Amer");
    }
}
