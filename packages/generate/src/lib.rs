#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data utilities around the observation CSV.
//!
//! Generates seeded demo observations for trying the pipeline end to
//! end, and writes a population template CSV for hand-editing.

use thiserror::Error;

pub mod demo;
pub mod interactive;
pub mod population;

/// Errors that can occur while generating data files.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Loading the boundary file failed.
    #[error("Boundary error: {0}")]
    Geo(#[from] epi_map_geography::GeoError),

    /// The population CSV lacks required columns.
    #[error("Missing required columns: {missing}")]
    MissingColumns {
        /// Comma-separated list of the absent column names.
        missing: String,
    },
}
