#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Viewport calculation and map layer composition.
//!
//! The last stage of the pipeline: turns a filtered detection batch, the
//! active AOI region, and the POI tables into an ordered [`LayerSpec`]
//! sequence plus a [`ViewState`], and serializes both into the JSON
//! handoff document the external rendering collaborator consumes.

pub mod layers;
pub mod viewport;

pub use layers::{LayerSpec, compose_layers, handoff_document};
pub use viewport::{ViewState, compute_view};
