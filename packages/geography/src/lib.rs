#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District boundary loading and name normalization.
//!
//! Reads a `GeoJSON` feature collection into [`DistrictGeometry`] values
//! keyed for joining against observation rows. The same normalization
//! pipeline is applied to boundary names and CSV district names so that
//! "Mannar District" and "mannar" land on the same key.

pub mod loader;
pub mod normalize;

pub use epi_map_geography_models::{DistrictGeometry, NameRules};

use thiserror::Error;

/// Errors that can occur while loading boundaries or rules.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading a boundary or rules file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The boundary file is not parsable `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    Parse(#[from] geojson::Error),

    /// The rules file is not valid TOML.
    #[error("Rules error: {0}")]
    Rules(#[from] toml::de::Error),

    /// The boundary input parsed but is not a feature collection.
    #[error("Expected a GeoJSON FeatureCollection")]
    NotACollection,

    /// No feature carries a recognized district-name property.
    #[error("No district name property found; tried {tried}")]
    MissingDistrictProperty {
        /// Comma-separated list of the property names that were tried.
        tried: String,
    },

    /// Every feature was skipped, leaving nothing to draw.
    #[error("No usable district boundaries in {path}")]
    NoDistricts {
        /// Path of the offending file.
        path: String,
    },
}
