//! The session cache over the geographic reference layers.
//!
//! All three tables are read once at [`GeometryStore::open`] and held
//! immutable; [`GeometryStore::refresh`] re-reads them from disk and is
//! the only invalidation path. Consumers get read-only slices.

use std::path::PathBuf;

use hotspot_map_geography_models::{AoiRegion, PointOfInterest, PoiKind};

use crate::{poi, regions};

/// File locations of the three reference tables.
#[derive(Debug, Clone)]
pub struct GeometryPaths {
    /// AOI polygon collection (GeoJSON).
    pub regions: PathBuf,
    /// Border-crossing table (CSV).
    pub crossings: PathBuf,
    /// Mining-site table (CSV).
    pub mines: PathBuf,
}

/// Cached AOI regions and POI tables for one session.
///
/// Owns the reference data for the session lifetime. Any table whose
/// source is missing or malformed loads as empty (logged), which
/// downstream turns into "no region filtering" or an absent marker layer
/// rather than a failure.
#[derive(Debug)]
pub struct GeometryStore {
    paths: GeometryPaths,
    regions: Vec<AoiRegion>,
    crossings: Vec<PointOfInterest>,
    mines: Vec<PointOfInterest>,
}

impl GeometryStore {
    /// Opens the store, loading all reference tables.
    #[must_use]
    pub fn open(paths: GeometryPaths) -> Self {
        let mut store = Self {
            paths,
            regions: Vec::new(),
            crossings: Vec::new(),
            mines: Vec::new(),
        };
        store.refresh();
        store
    }

    /// Re-reads every reference table from disk.
    pub fn refresh(&mut self) {
        self.regions = match regions::load_regions(&self.paths.regions) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("Region filtering unavailable: {e}");
                Vec::new()
            }
        };
        self.crossings =
            poi::load_points_of_interest(&self.paths.crossings, PoiKind::BorderCrossing);
        self.mines = poi::load_points_of_interest(&self.paths.mines, PoiKind::MiningSite);
    }

    /// All loaded AOI regions.
    #[must_use]
    pub fn regions(&self) -> &[AoiRegion] {
        &self.regions
    }

    /// Looks up a region by its selection key.
    #[must_use]
    pub fn region(&self, name: &str) -> Option<&AoiRegion> {
        self.regions.iter().find(|region| region.name == name)
    }

    /// The border-crossing markers.
    #[must_use]
    pub fn crossings(&self) -> &[PointOfInterest] {
        &self.crossings
    }

    /// The mining-site markers.
    #[must_use]
    pub fn mines(&self) -> &[PointOfInterest] {
        &self.mines
    }
}
