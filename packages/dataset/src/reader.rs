//! Observation CSV parsing.
//!
//! Reads the per-district monthly case table. Structural problems (a
//! required column missing, unreadable CSV) are fatal; per-cell problems
//! are demoted to missing values so one bad row never takes down the
//! rest of the table.

use std::path::Path;

use epi_map_dataset_models::ObservationRecord;
use epi_map_epi_models::MonthKey;
use epi_map_geography::normalize::normalize;
use epi_map_geography_models::NameRules;

use crate::DatasetError;

/// Columns every observation CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["year", "month", "district", "cases", "population"];

/// Optional pre-computed incidence column.
pub const INCIDENCE_COLUMN: &str = "incidence_per_100k";

/// Reads observation rows from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not parsable CSV, or
/// is missing a required column.
pub fn read_observations(
    path: &Path,
    rules: &NameRules,
) -> Result<Vec<ObservationRecord>, DatasetError> {
    let file = std::fs::File::open(path)?;
    let records = observations_from_reader(file, rules)?;
    log::info!(
        "Loaded {} observation rows from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Parses observation rows from any CSV reader.
///
/// # Errors
///
/// Returns an error if the input is not parsable CSV or is missing a
/// required column.
pub fn observations_from_reader<R: std::io::Read>(
    input: R,
    rules: &NameRules,
) -> Result<Vec<ObservationRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0_usize;
    let mut demoted = 0_usize;

    for (index, result) in reader.records().enumerate() {
        let row = result?;
        // +2: rows are 1-based and the header occupies the first line.
        let line = index + 2;

        if let Some(record) = parse_row(&row, &columns, rules, line, &mut demoted) {
            records.push(record);
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} rows without a usable year, month, and district");
    }
    if demoted > 0 {
        log::warn!("Demoted {demoted} unusable numeric cells to no-data");
    }

    Ok(records)
}

/// Positions of the known columns in the header row.
struct ColumnIndex {
    year: usize,
    month: usize,
    district: usize,
    cases: usize,
    population: usize,
    incidence: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &[String]) -> Result<Self, DatasetError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns {
                missing: missing.join(", "),
            });
        }

        Ok(Self {
            year: find("year").unwrap_or_default(),
            month: find("month").unwrap_or_default(),
            district: find("district").unwrap_or_default(),
            cases: find("cases").unwrap_or_default(),
            population: find("population").unwrap_or_default(),
            incidence: find(INCIDENCE_COLUMN),
        })
    }
}

/// Parses one CSV row. Returns `None` when the row has no usable time
/// address or district, which skips it entirely.
fn parse_row(
    row: &csv::StringRecord,
    columns: &ColumnIndex,
    rules: &NameRules,
    line: usize,
    demoted: &mut usize,
) -> Option<ObservationRecord> {
    let field = |index: usize| row.get(index).unwrap_or("").trim();

    let Ok(year) = field(columns.year).parse::<i32>() else {
        log::warn!("Row {line}: unparsable year {:?}", field(columns.year));
        return None;
    };
    let Some(month) = field(columns.month)
        .parse()
        .ok()
        .and_then(|m| MonthKey::new(year, m).ok())
    else {
        log::warn!("Row {line}: unparsable month {:?}", field(columns.month));
        return None;
    };

    let district = field(columns.district);
    if district.is_empty() {
        log::warn!("Row {line}: empty district");
        return None;
    }

    let mut cell = |index: usize, column: &str| match parse_cell(field(index)) {
        Cell::Empty => None,
        Cell::Value(value) => Some(value),
        Cell::Demoted => {
            log::debug!("Row {line}: demoting {column} cell {:?}", field(index));
            *demoted += 1;
            None
        }
    };

    let cases = cell(columns.cases, "cases");
    let population = cell(columns.population, "population");
    let incidence_per_100k = columns
        .incidence
        .and_then(|index| cell(index, INCIDENCE_COLUMN));

    Some(ObservationRecord {
        month,
        district: district.to_string(),
        district_key: normalize(district, rules),
        cases,
        population,
        incidence_per_100k,
    })
}

/// A parsed numeric cell.
enum Cell {
    /// Blank cell: data genuinely absent.
    Empty,
    /// A usable non-negative finite number.
    Value(f64),
    /// Present but unusable (unparsable, negative, or non-finite).
    Demoted,
}

fn parse_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        return Cell::Empty;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Cell::Value(value),
        _ => Cell::Demoted,
    }
}
