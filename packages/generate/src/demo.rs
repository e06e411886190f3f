//! Seeded demo observation generation.
//!
//! Synthesizes a plausible monthly case table for every district in the
//! boundary file, so the whole pipeline can be exercised without real
//! surveillance data.

use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use epi_map_epi_models::{MonthKey, month_range};
use epi_map_geography::loader::load_districts;
use epi_map_geography::{DistrictGeometry, NameRules};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::GenerateError;
use crate::population::load_populations;

/// Columns of the generated observation CSV.
pub const COLUMNS: [&str; 6] = [
    "year",
    "month",
    "district",
    "cases",
    "population",
    "incidence_per_100k",
];

/// Population assumed when a district is absent from the population CSV.
pub const DEFAULT_POPULATION: f64 = 600_000.0;

/// One synthesized observation row.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoRow {
    /// Month the row belongs to.
    pub month: MonthKey,
    /// District display name from the boundary file.
    pub district: String,
    /// Synthesized case count.
    pub cases: i64,
    /// Population used for the case count.
    pub population: f64,
    /// Incidence the cases were derived from.
    pub incidence_per_100k: f64,
}

/// Generates the demo CSV and writes it to `out`.
///
/// Populations come from the optional `district,population` CSV, joined
/// on normalized names; districts not listed there fall back to
/// [`DEFAULT_POPULATION`]. An existing output file is backed up to
/// `<out>.bak` before being replaced.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns an error if the boundary or population file cannot be loaded
/// or the output cannot be written.
pub fn make_demo(
    out: &Path,
    boundaries: &Path,
    rules: &NameRules,
    start: MonthKey,
    end: MonthKey,
    seed: u64,
    population_csv: Option<&Path>,
) -> Result<usize, GenerateError> {
    let districts = load_districts(boundaries, rules)?;
    let populations = match population_csv {
        Some(path) => load_populations(path, rules)?,
        None => BTreeMap::new(),
    };

    let rows = demo_rows(&districts, &populations, start, end, seed);
    write_demo(out, &rows)?;

    log::info!(
        "Wrote {} with {} rows ({} districts x {} months)",
        out.display(),
        rows.len(),
        districts.len(),
        month_range(start, end).len()
    );
    Ok(rows.len())
}

/// Synthesizes one row per district per month in `[start, end]`.
///
/// Incidence follows a sine-shaped seasonal curve with a fresh uniform
/// district factor per row, and cases are the incidence applied to the
/// district population. The same seed always yields the same rows.
#[must_use]
pub fn demo_rows(
    districts: &[DistrictGeometry],
    populations: &BTreeMap<String, f64>,
    start: MonthKey,
    end: MonthKey,
    seed: u64,
) -> Vec<DemoRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::new();

    for month in month_range(start, end) {
        let season = seasonal_level(month.month);
        for district in districts {
            let population = populations
                .get(&district.key)
                .copied()
                .unwrap_or(DEFAULT_POPULATION);
            let factor = rng.gen_range(0.6..1.5);
            let incidence = (22.0_f64.mul_add(season, 18.0) * factor).max(0.0);
            #[allow(clippy::cast_possible_truncation)] // case counts stay far below 2^63
            let cases = (population * incidence / 100_000.0).round() as i64;

            rows.push(DemoRow {
                month,
                district: district.name.clone(),
                cases,
                population,
                incidence_per_100k: incidence,
            });
        }
    }

    rows
}

/// Writes rows as the observation CSV, backing up an existing file to
/// `<out>.bak` first.
///
/// # Errors
///
/// Returns an error if the backup or the CSV cannot be written.
pub fn write_demo(out: &Path, rows: &[DemoRow]) -> Result<(), GenerateError> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if out.exists() {
        let backup = backup_path(out);
        std::fs::copy(out, &backup)?;
        log::info!("Backed up existing CSV to {}", backup.display());
    }

    let mut writer = csv::Writer::from_path(out)?;
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record([
            row.month.year.to_string(),
            row.month.month.to_string(),
            row.district.clone(),
            row.cases.to_string(),
            row.population.to_string(),
            row.incidence_per_100k.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn backup_path(out: &Path) -> PathBuf {
    let mut name = out.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Seasonal multiplier in `[0, 1.5]` from the sine curve
/// `0.75 + 0.75 * sin(2 * pi * (month - 1) / 12 + 0.5)`.
fn seasonal_level(month: u32) -> f64 {
    let angle = (f64::from(month - 1) / 12.0).mul_add(TAU, 0.5);
    0.75_f64.mul_add(angle.sin(), 0.75)
}
