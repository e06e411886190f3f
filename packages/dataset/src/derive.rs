//! Incidence derivation.

use epi_map_dataset_models::ObservationRecord;

/// Cases per 100,000 residents, or `None` when it cannot be computed.
///
/// Fails softly: a missing case count, a missing population, or a
/// population of zero all yield `None` rather than an error, so the
/// district renders as no-data instead of sinking the whole frame.
#[must_use]
pub fn derive_incidence(cases: Option<f64>, population: Option<f64>) -> Option<f64> {
    let cases = cases?;
    let population = population?;
    if population <= 0.0 {
        return None;
    }
    Some(cases / population * 100_000.0)
}

/// Fills the incidence column when the CSV left it blank.
///
/// A value already present in the CSV is kept as-is, even when it
/// disagrees with what the raw columns would derive.
#[must_use]
pub fn with_derived_incidence(mut record: ObservationRecord) -> ObservationRecord {
    if record.incidence_per_100k.is_none() {
        record.incidence_per_100k = derive_incidence(record.cases, record.population);
    }
    record
}

#[cfg(test)]
mod tests {
    use epi_map_epi_models::MonthKey;

    use super::*;

    fn record(
        cases: Option<f64>,
        population: Option<f64>,
        incidence: Option<f64>,
    ) -> ObservationRecord {
        ObservationRecord {
            month: MonthKey::new(2023, 1).unwrap(),
            district: "Colombo".to_string(),
            district_key: "colombo".to_string(),
            cases,
            population,
            incidence_per_100k: incidence,
        }
    }

    #[test]
    fn derives_cases_per_100k() {
        let incidence = derive_incidence(Some(120.0), Some(2_400_000.0)).unwrap();
        assert!((incidence - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_population_yields_none() {
        assert_eq!(derive_incidence(Some(10.0), Some(0.0)), None);
    }

    #[test]
    fn missing_inputs_yield_none() {
        assert_eq!(derive_incidence(None, Some(1000.0)), None);
        assert_eq!(derive_incidence(Some(10.0), None), None);
        assert_eq!(derive_incidence(None, None), None);
    }

    #[test]
    fn fills_blank_incidence() {
        let filled = with_derived_incidence(record(Some(120.0), Some(2_400_000.0), None));
        assert!((filled.incidence_per_100k.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn keeps_existing_incidence() {
        let filled = with_derived_incidence(record(Some(120.0), Some(2_400_000.0), Some(9.9)));
        assert_eq!(filled.incidence_per_100k, Some(9.9));
    }

    #[test]
    fn leaves_incidence_blank_when_underivable() {
        let filled = with_derived_incidence(record(Some(120.0), None, None));
        assert_eq!(filled.incidence_per_100k, None);
    }
}
