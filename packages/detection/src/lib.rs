#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The detection store.
//!
//! Owns the durable flat-file record of hotspot detections: loading and
//! persisting the store CSV ([`store`]), fetching a fresh batch from the
//! remote area-CSV provider ([`fetch`]), and merging the two with
//! schema-drift-tolerant deduplication ([`merge`]).
//!
//! The store file is only ever rewritten after a successful merge, and the
//! rewrite goes through a temp file + rename so a crash mid-write cannot
//! corrupt the existing record.

pub mod fetch;
pub mod merge;
pub mod store;

use thiserror::Error;

/// Errors that can occur in the detection store.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// The remote provider answered with a non-success status.
    #[error("Remote fetch failed with status {status}: {body}")]
    RemoteFetch {
        /// HTTP status code of the response.
        status: reqwest::StatusCode,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// An HTTP request failed at the transport level (including timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
