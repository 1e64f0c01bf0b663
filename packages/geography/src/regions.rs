//! AOI polygon collection loading.
//!
//! The source is a GeoJSON `FeatureCollection` where each feature carries
//! a string `region` property and a Polygon or MultiPolygon geometry in
//! EPSG:4326.

use std::path::Path;

use geo::MultiPolygon;
use geojson::GeoJson;
use hotspot_map_geography_models::AoiRegion;

use crate::ConfigurationError;

/// Loads the AOI region collection.
///
/// Individual features missing their `region` property or geometry are
/// skipped with a warning; a source that yields no usable region at all
/// is a configuration error, which callers degrade to "no region
/// filtering available".
///
/// # Errors
///
/// Returns [`ConfigurationError`] if the file is missing, is not valid
/// GeoJSON, is not a `FeatureCollection`, or contains no usable feature.
pub fn load_regions(path: &Path) -> Result<Vec<AoiRegion>, ConfigurationError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigurationError::new(format!("AOI file {}: {e}", path.display()))
    })?;

    let geojson: GeoJson = content.parse().map_err(|e| {
        ConfigurationError::new(format!("AOI file {} is not valid GeoJSON: {e}", path.display()))
    })?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(ConfigurationError::new(format!(
            "AOI file {} is not a FeatureCollection",
            path.display()
        )));
    };

    let mut regions = Vec::new();

    for feature in collection.features {
        let Some(name) = feature
            .properties
            .as_ref()
            .and_then(|props| props.get("region"))
            .and_then(|value| value.as_str())
            .map(ToOwned::to_owned)
        else {
            log::warn!("Skipping AOI feature without a string 'region' property");
            continue;
        };

        let Some(polygon) = feature.geometry.as_ref().and_then(to_multipolygon) else {
            log::warn!("Skipping AOI feature '{name}': no polygon geometry");
            continue;
        };

        regions.push(AoiRegion { name, polygon });
    }

    if regions.is_empty() {
        return Err(ConfigurationError::new(format!(
            "AOI file {} has no feature with a 'region' attribute and polygon geometry",
            path.display()
        )));
    }

    log::info!("Loaded {} AOI regions from {}", regions.len(), path.display());
    Ok(regions)
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`], promoting a
/// single `Polygon` to a one-element multipolygon.
fn to_multipolygon(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AOI_FIXTURE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"region": "Jebel Amer"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[24.0, 13.0], [25.0, 13.0], [25.0, 14.0], [24.0, 14.0], [24.0, 13.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"label": "unnamed"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[30.0, 10.0], [31.0, 10.0], [31.0, 11.0], [30.0, 11.0], [30.0, 10.0]]]
                }
            }
        ]
    }"#;

    fn write_fixture(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("hotspot_map_{}_{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_named_regions_and_skips_unnamed_features() {
        let path = write_fixture("aoi.geojson", AOI_FIXTURE);
        let regions = load_regions(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Jebel Amer");
        assert_eq!(regions[0].polygon.0.len(), 1);
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let path = std::env::temp_dir().join("hotspot_map_no_such_aoi.geojson");
        assert!(load_regions(&path).is_err());
    }

    #[test]
    fn collection_without_region_attribute_is_a_configuration_error() {
        let fixture = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"name": "wrong-key"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    }
                }
            ]
        }"#;
        let path = write_fixture("aoi_no_region.geojson", fixture);
        let result = load_regions(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn non_geojson_content_is_a_configuration_error() {
        let path = write_fixture("aoi_garbage.geojson", "not geojson at all");
        let result = load_regions(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
