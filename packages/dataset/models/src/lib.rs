#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Observation record and match-report types.

use epi_map_epi_models::{Metric, MonthKey};
use serde::{Deserialize, Serialize};

/// One district-month row of the observation table.
///
/// Numeric fields are optional: a blank or unparsable cell becomes
/// `None` and the district renders as no-data for that month instead of
/// failing the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    /// Month the observation covers.
    pub month: MonthKey,
    /// District name as written in the CSV.
    pub district: String,
    /// Normalized join key derived from the district name.
    pub district_key: String,
    /// Reported case count.
    pub cases: Option<f64>,
    /// District population.
    pub population: Option<f64>,
    /// Cases per 100,000 residents. Derived from `cases` and
    /// `population` when the CSV leaves it blank.
    pub incidence_per_100k: Option<f64>,
}

impl ObservationRecord {
    /// The value of a metric column on this record.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Cases => self.cases,
            Metric::IncidencePer100k => self.incidence_per_100k,
        }
    }
}

/// District keys that appear in only one of the two input sources.
///
/// A non-empty report is a data-quality warning, not an error: boundary
/// districts without observations render as no-data, and observations
/// without a boundary are carried but never drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    /// Keys present in the boundary file but never observed.
    pub geometry_only: Vec<String>,
    /// Keys observed in the CSV but absent from the boundary file.
    pub observation_only: Vec<String>,
}

impl MatchReport {
    /// True when every key matched both ways.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.geometry_only.is_empty() && self.observation_only.is_empty()
    }
}
