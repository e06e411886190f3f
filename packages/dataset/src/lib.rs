#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Observation loading and the merged district dataset.
//!
//! [`Dataset::load`] reads the observation CSV and the boundary file,
//! joins them on the normalized district key, and fills in the derived
//! incidence column. Everything downstream (scales, frames, rendering)
//! works from the resulting [`Dataset`].

pub mod derive;
pub mod reader;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use epi_map_dataset_models::{MatchReport, ObservationRecord};
use epi_map_epi_models::{Metric, MonthKey};
use epi_map_geography::loader::load_districts;
use epi_map_geography_models::{DistrictGeometry, NameRules};
use thiserror::Error;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading the observation file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The observation file is not parsable CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The observation file lacks required columns.
    #[error("Missing required columns: {missing}")]
    MissingColumns {
        /// Comma-separated list of the absent column names.
        missing: String,
    },

    /// Loading the boundary file failed.
    #[error("Boundary error: {0}")]
    Geo(#[from] epi_map_geography::GeoError),

    /// The observation file parsed but contained no usable rows.
    #[error("No usable observation rows in {path}")]
    NoObservations {
        /// Path of the offending file.
        path: String,
    },
}

/// The loaded observation table and district boundaries, joined on the
/// normalized district key.
///
/// Loaded once per process start; everything after the load is a pure
/// read of this value.
#[derive(Debug, Clone)]
pub struct Dataset {
    districts: Vec<DistrictGeometry>,
    records: Vec<ObservationRecord>,
}

impl Dataset {
    /// Loads and joins the observation CSV and boundary `GeoJSON`.
    ///
    /// Incidence is derived for rows where the CSV leaves it blank.
    /// Districts present in only one source are logged as warnings, not
    /// errors: unmatched boundaries render as no-data.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed, the CSV
    /// lacks required columns, or no usable rows remain.
    pub fn load(
        observations: &Path,
        boundaries: &Path,
        rules: &NameRules,
    ) -> Result<Self, DatasetError> {
        let districts = load_districts(boundaries, rules)?;
        let records = reader::read_observations(observations, rules)?;
        if records.is_empty() {
            return Err(DatasetError::NoObservations {
                path: observations.display().to_string(),
            });
        }

        let records = records
            .into_iter()
            .map(derive::with_derived_incidence)
            .collect();
        let dataset = Self::from_parts(districts, records);

        let report = dataset.match_report();
        if !report.geometry_only.is_empty() {
            log::warn!(
                "{} boundary districts never observed: {}",
                report.geometry_only.len(),
                report.geometry_only.join(", ")
            );
        }
        if !report.observation_only.is_empty() {
            log::warn!(
                "{} observed districts have no boundary: {}",
                report.observation_only.len(),
                report.observation_only.join(", ")
            );
        }

        Ok(dataset)
    }

    /// Builds a dataset from already-loaded parts. Records are taken
    /// as-is; no incidence derivation is applied.
    #[must_use]
    pub const fn from_parts(
        districts: Vec<DistrictGeometry>,
        records: Vec<ObservationRecord>,
    ) -> Self {
        Self { districts, records }
    }

    /// The district boundaries, sorted by join key.
    #[must_use]
    pub fn districts(&self) -> &[DistrictGeometry] {
        &self.districts
    }

    /// Every observation row, in CSV order.
    #[must_use]
    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    /// The distinct observed months, in chronological order.
    #[must_use]
    pub fn months(&self) -> Vec<MonthKey> {
        let months: BTreeSet<MonthKey> = self.records.iter().map(|r| r.month).collect();
        months.into_iter().collect()
    }

    /// The records for one month, keyed by district key.
    ///
    /// When a month carries duplicate rows for a district the last row
    /// wins, matching a spreadsheet correction appended at the end.
    #[must_use]
    pub fn records_for(&self, month: MonthKey) -> BTreeMap<&str, &ObservationRecord> {
        self.records
            .iter()
            .filter(|r| r.month == month)
            .map(|r| (r.district_key.as_str(), r))
            .collect()
    }

    /// Every non-missing value of a metric across the full time range.
    #[must_use]
    pub fn metric_values(&self, metric: Metric) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.value(metric))
            .collect()
    }

    /// District keys present in only one of the two sources.
    #[must_use]
    pub fn match_report(&self) -> MatchReport {
        let geometry_keys: BTreeSet<&str> =
            self.districts.iter().map(|d| d.key.as_str()).collect();
        let record_keys: BTreeSet<&str> =
            self.records.iter().map(|r| r.district_key.as_str()).collect();

        MatchReport {
            geometry_only: geometry_keys
                .difference(&record_keys)
                .map(|&k| k.to_string())
                .collect(),
            observation_only: record_keys
                .difference(&geometry_keys)
                .map(|&k| k.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use epi_map_geography::loader::districts_from_str;

    use super::*;

    const BOUNDARIES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"shapeName":"Alpha District"},"geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]]}},
        {"type":"Feature","properties":{"shapeName":"Beta"},"geometry":{"type":"Polygon","coordinates":[[[2.0,0.0],[3.0,0.0],[3.0,1.0],[2.0,1.0],[2.0,0.0]]]}}
    ]}"#;

    const OBSERVATIONS: &str = "year,month,district,cases,population,incidence_per_100k\n\
                                2023,2,Alpha,5,1000,\n\
                                2023,1,Alpha,10,1000,\n\
                                2023,1,Gamma,3,500,\n";

    fn dataset() -> Dataset {
        let rules = NameRules::default();
        let districts = districts_from_str(BOUNDARIES, &rules).unwrap();
        let records = reader::observations_from_reader(OBSERVATIONS.as_bytes(), &rules)
            .unwrap()
            .into_iter()
            .map(derive::with_derived_incidence)
            .collect();
        Dataset::from_parts(districts, records)
    }

    #[test]
    fn months_are_sorted_and_distinct() {
        let months = dataset().months();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].to_string(), "2023-01");
        assert_eq!(months[1].to_string(), "2023-02");
    }

    #[test]
    fn records_for_selects_one_month() {
        let data = dataset();
        let january = data.records_for(MonthKey::new(2023, 1).unwrap());

        assert_eq!(january.len(), 2);
        assert_eq!(january["alpha"].cases, Some(10.0));
        assert_eq!(january["gamma"].cases, Some(3.0));
    }

    #[test]
    fn records_for_last_row_wins_on_duplicates() {
        let rules = NameRules::default();
        let records = reader::observations_from_reader(
            "year,month,district,cases,population\n\
             2023,1,Alpha,10,1000\n\
             2023,1,Alpha,12,1000\n"
                .as_bytes(),
            &rules,
        )
        .unwrap();
        let data = Dataset::from_parts(Vec::new(), records);

        let january = data.records_for(MonthKey::new(2023, 1).unwrap());
        assert_eq!(january["alpha"].cases, Some(12.0));
    }

    #[test]
    fn metric_values_skip_missing() {
        let data = dataset();
        let incidence = data.metric_values(Metric::IncidencePer100k);

        // 5/1000*1e5, 10/1000*1e5, 3/500*1e5: all derivable.
        assert_eq!(incidence.len(), 3);
        let cases = data.metric_values(Metric::Cases);
        assert_eq!(cases.len(), 3);
    }

    #[test]
    fn match_report_flags_both_directions() {
        let report = dataset().match_report();

        assert_eq!(report.geometry_only, vec!["beta".to_string()]);
        assert_eq!(report.observation_only, vec!["gamma".to_string()]);
        assert!(!report.is_clean());
    }
}
