//! Population CSV template writing and loading.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use epi_map_geography::NameRules;
use epi_map_geography::loader::load_districts;
use epi_map_geography::normalize::normalize;

use crate::GenerateError;

/// Columns a population CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["district", "population"];

/// Writes a `district,population` skeleton from the boundary file, one
/// row per distinct district in join-key order.
///
/// Populations are left blank for hand-editing.
///
/// # Errors
///
/// Returns an error if the boundary file cannot be loaded or the
/// template cannot be written.
pub fn write_population_template(
    out: &Path,
    boundaries: &Path,
    rules: &NameRules,
) -> Result<usize, GenerateError> {
    let districts = load_districts(boundaries, rules)?;

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(out)?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for district in &districts {
        writer.write_record([district.name.as_str(), ""])?;
    }
    writer.flush()?;

    log::info!(
        "Wrote population template {} ({} districts)",
        out.display(),
        districts.len()
    );
    Ok(districts.len())
}

/// Loads a `district,population` CSV keyed by normalized district name.
///
/// A missing file is not an error: the caller falls back to default
/// populations, matching how hand-maintained files come and go.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read, is not parsable
/// CSV, or lacks the required columns.
pub fn load_populations(
    path: &Path,
    rules: &NameRules,
) -> Result<BTreeMap<String, f64>, GenerateError> {
    if !path.exists() {
        log::warn!(
            "Population CSV not found: {} (using defaults)",
            path.display()
        );
        return Ok(BTreeMap::new());
    }

    let file = std::fs::File::open(path)?;
    let populations = populations_from_reader(file, rules)?;
    log::info!(
        "Loaded {} population rows from {}",
        populations.len(),
        path.display()
    );
    Ok(populations)
}

/// Parses population rows from any CSV reader.
///
/// Headers are matched case-insensitively. Rows with a blank district or
/// an unusable population value are skipped with a warning rather than
/// failing the whole file.
///
/// # Errors
///
/// Returns an error if the input is not parsable CSV or is missing a
/// required column.
pub fn populations_from_reader<R: Read>(
    input: R,
    rules: &NameRules,
) -> Result<BTreeMap<String, f64>, GenerateError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let find = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| find(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(GenerateError::MissingColumns {
            missing: missing.join(", "),
        });
    }
    let district_column = find("district").unwrap_or_default();
    let population_column = find("population").unwrap_or_default();

    let mut populations = BTreeMap::new();
    let mut skipped = 0_usize;

    for (index, result) in reader.records().enumerate() {
        let row = result?;
        // +2: rows are 1-based and the header occupies the first line.
        let line = index + 2;

        let district = row.get(district_column).unwrap_or("").trim();
        if district.is_empty() {
            skipped += 1;
            log::debug!("Skipping line {line}: blank district");
            continue;
        }

        let raw = row.get(population_column).unwrap_or("").trim();
        let Ok(population) = raw.parse::<f64>() else {
            skipped += 1;
            log::debug!("Skipping line {line}: unusable population {raw:?}");
            continue;
        };
        if !population.is_finite() || population < 0.0 {
            skipped += 1;
            log::debug!("Skipping line {line}: unusable population {raw:?}");
            continue;
        }

        populations.insert(normalize(district, rules), population);
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} unusable population rows");
    }
    Ok(populations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_rows_keyed_by_normalized_name() {
        let csv = "district,population\nColombo,2415000\nMannar District,99051\n";
        let populations = populations_from_reader(csv.as_bytes(), &NameRules::default()).unwrap();

        assert_eq!(populations.get("colombo"), Some(&2_415_000.0));
        assert_eq!(populations.get("mannar"), Some(&99_051.0));
    }

    #[test]
    fn headers_match_case_insensitively() {
        let csv = " District , POPULATION \nKandy,1375000\n";
        let populations = populations_from_reader(csv.as_bytes(), &NameRules::default()).unwrap();

        assert_eq!(populations.get("kandy"), Some(&1_375_000.0));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "district,people\nColombo,2415000\n";
        let error = populations_from_reader(csv.as_bytes(), &NameRules::default()).unwrap_err();

        match error {
            GenerateError::MissingColumns { missing } => assert_eq!(missing, "population"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unusable_rows_are_skipped() {
        let csv = "district,population\nColombo,2415000\nGampaha,n/a\n,120000\nKandy,-3\n";
        let populations = populations_from_reader(csv.as_bytes(), &NameRules::default()).unwrap();

        assert_eq!(populations.len(), 1);
        assert!(populations.contains_key("colombo"));
    }

    #[test]
    fn later_rows_override_earlier_spellings() {
        let csv = "district,population\nColombo,1\nCOLOMBO DISTRICT,2415000\n";
        let populations = populations_from_reader(csv.as_bytes(), &NameRules::default()).unwrap();

        assert_eq!(populations.get("colombo"), Some(&2_415_000.0));
    }
}
