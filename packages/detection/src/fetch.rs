//! Remote hotspot provider fetch.
//!
//! Issues the area-CSV request shape used by the FIRMS family of
//! endpoints: `{base}/{map_key}/{product}/{bbox}/{days}` returning plain
//! CSV on success. Anything other than 200 is an error carrying the
//! status and body for diagnostics.

use std::time::Duration;

use hotspot_map_detection_models::DetectionBatch;

use crate::{DetectionError, store};

/// Default base endpoint for area-CSV requests.
pub const FIRMS_AREA_CSV_BASE: &str = "https://firms.modaps.eosdis.nasa.gov/api/area/csv";

/// Bounded request timeout so a hung provider fails the ingestion run
/// instead of blocking it indefinitely.
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// A geographic bounding box in EPSG:4326.
///
/// Renders as `minLon,minLat,maxLon,maxLat`, the order the provider's
/// area endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge in decimal degrees.
    pub min_lon: f64,
    /// Southern edge in decimal degrees.
    pub min_lat: f64,
    /// Eastern edge in decimal degrees.
    pub max_lon: f64,
    /// Northern edge in decimal degrees.
    pub max_lat: f64,
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Error returned when a bounding box string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBoundingBox {
    /// The input that failed to parse.
    pub input: String,
}

impl std::fmt::Display for InvalidBoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid bounding box '{}': expected minLon,minLat,maxLon,maxLat",
            self.input
        )
    }
}

impl std::error::Error for InvalidBoundingBox {}

impl std::str::FromStr for BoundingBox {
    type Err = InvalidBoundingBox;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| InvalidBoundingBox {
                input: s.to_owned(),
            })?;

        let [min_lon, min_lat, max_lon, max_lat] = parts[..] else {
            return Err(InvalidBoundingBox {
                input: s.to_owned(),
            });
        };

        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }
}

/// Parameters for one area-CSV request.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base endpoint URL (see [`FIRMS_AREA_CSV_BASE`]).
    pub base_url: String,
    /// Provider access key.
    pub map_key: String,
    /// Product identifier (e.g. `VIIRS_SNPP_NRT`).
    pub product: String,
    /// Area to query.
    pub bbox: BoundingBox,
    /// Trailing number of days to request.
    pub lookback_days: u32,
}

impl FetchConfig {
    /// The full request URL. Contains the access key, so never log it.
    #[must_use]
    pub fn area_url(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.map_key,
            self.product,
            self.bbox,
            self.lookback_days
        )
    }
}

/// Fetches a fresh detection batch from the remote provider.
///
/// # Errors
///
/// Returns [`DetectionError::RemoteFetch`] on a non-200 response,
/// [`DetectionError::Http`] on transport failure or timeout, and
/// [`DetectionError::Csv`] if the body is not parseable CSV.
pub async fn fetch_remote_batch(config: &FetchConfig) -> Result<DetectionBatch, DetectionError> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

    log::info!(
        "Requesting {} detections for bbox {} over the last {} days",
        config.product,
        config.bbox,
        config.lookback_days
    );

    let response = client.get(config.area_url()).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status != reqwest::StatusCode::OK {
        return Err(DetectionError::RemoteFetch { status, body });
    }

    let batch = store::parse_csv(body.as_bytes())?;
    log::info!("Fetched {} detections from remote provider", batch.len());
    Ok(batch)
}
