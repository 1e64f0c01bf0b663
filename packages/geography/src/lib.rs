#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The geometry store.
//!
//! Loads the static geographic reference layers (the AOI polygon
//! collection in [`regions`], the point-of-interest tables in [`poi`])
//! and caches them for the session behind [`GeometryStore`], which has an
//! explicit [`refresh`](GeometryStore::refresh) as its only invalidation
//! path.
//!
//! Reference data is allowed to be absent: a missing or malformed source
//! degrades the affected table to empty with a logged
//! [`ConfigurationError`], and the rest of the pipeline proceeds.

pub mod poi;
pub mod regions;
pub mod store;

pub use store::{GeometryPaths, GeometryStore};

use thiserror::Error;

/// Signalled when a reference-data source is missing or malformed.
///
/// Callers degrade the affected layer or filter to a no-op instead of
/// failing the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration error: {message}")]
pub struct ConfigurationError {
    /// What was wrong with the source.
    pub message: String,
}

impl ConfigurationError {
    /// Creates a configuration error from any message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
