//! Frame building.
//!
//! A frame is the fully-resolved, renderable state of the map for one
//! (month, metric) selection: one entry per loaded boundary, with color
//! value, true display value, and tooltip texts already resolved. The
//! caller holds the only selection state and rebuilds the frame on every
//! change; nothing here is cached or mutated.

use std::collections::BTreeMap;

use epi_map_dataset::Dataset;
use epi_map_epi_models::{Metric, MonthKey};

use crate::format::{count_text, rate_text};
use crate::scale::MetricDomain;

/// One district of a rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEntry {
    /// District name as written in the boundary file.
    pub district: String,
    /// True metric value, unclamped. `None` marks a no-data district.
    pub display_value: Option<f64>,
    /// Metric value clamped into the color domain, or the domain low
    /// for no-data districts.
    pub color_value: f64,
    /// No data, or a value of zero: rendered in the neutral grey.
    pub is_zero: bool,
    /// Incidence below the high-risk threshold: rendered faded.
    pub dimmed: bool,
    /// Raw case count.
    pub cases: Option<f64>,
    /// District population.
    pub population: Option<f64>,
    /// Incidence per 100,000 residents.
    pub incidence_per_100k: Option<f64>,
    /// Tooltip text for the case count.
    pub cases_text: String,
    /// Tooltip text for the incidence rate.
    pub incidence_text: String,
    /// Tooltip text for the population.
    pub population_text: String,
}

/// A fully-resolved (month, metric) selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Month this frame renders.
    pub month: MonthKey,
    /// Metric driving the coloring.
    pub metric: Metric,
    /// Entries keyed by district join key. Every loaded boundary has
    /// exactly one entry, no-data districts included.
    pub entries: BTreeMap<String, FrameEntry>,
}

/// Builds the frame for one (month, metric) selection.
///
/// Districts without a record that month become no-data entries rather
/// than being dropped, so the map never has holes and their tooltips
/// still show the district name.
///
/// `threshold` is a display hint: when positive, districts whose
/// incidence is below it (or missing) are marked [`FrameEntry::dimmed`].
/// Dimming is always keyed on incidence, even when the colored metric is
/// raw cases, so the fade answers "is this district below the outbreak
/// threshold" regardless of the selected view.
#[must_use]
pub fn build_frame(
    dataset: &Dataset,
    month: MonthKey,
    metric: Metric,
    domain: MetricDomain,
    threshold: f64,
) -> Frame {
    let records = dataset.records_for(month);
    let mut entries = BTreeMap::new();

    for district in dataset.districts() {
        let record = records.get(district.key.as_str()).copied();

        let display_value = record.and_then(|r| r.value(metric));
        let cases = record.and_then(|r| r.cases);
        let population = record.and_then(|r| r.population);
        let incidence = record.and_then(|r| r.incidence_per_100k);

        entries.insert(
            district.key.clone(),
            FrameEntry {
                district: district.name.clone(),
                display_value,
                color_value: display_value.map_or(domain.low, |v| domain.clamp(v)),
                is_zero: display_value.is_none_or(|v| v <= 0.0),
                dimmed: threshold > 0.0 && incidence.is_none_or(|v| v < threshold),
                cases,
                population,
                incidence_per_100k: incidence,
                cases_text: count_text(cases),
                incidence_text: rate_text(incidence),
                population_text: count_text(population),
            },
        );
    }

    Frame {
        month,
        metric,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use epi_map_dataset::derive::with_derived_incidence;
    use epi_map_dataset::reader::observations_from_reader;
    use epi_map_geography::NameRules;
    use epi_map_geography::loader::districts_from_str;

    use super::*;

    const BOUNDARIES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"shapeName":"Alpha District"},"geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]]}},
        {"type":"Feature","properties":{"shapeName":"Beta"},"geometry":{"type":"Polygon","coordinates":[[[2.0,0.0],[3.0,0.0],[3.0,1.0],[2.0,1.0],[2.0,0.0]]]}},
        {"type":"Feature","properties":{"shapeName":"Gamma"},"geometry":{"type":"Polygon","coordinates":[[[4.0,0.0],[5.0,0.0],[5.0,1.0],[4.0,1.0],[4.0,0.0]]]}}
    ]}"#;

    fn dataset(observations: &str) -> Dataset {
        let rules = NameRules::default();
        let districts = districts_from_str(BOUNDARIES, &rules).unwrap();
        let records = observations_from_reader(observations.as_bytes(), &rules)
            .unwrap()
            .into_iter()
            .map(with_derived_incidence)
            .collect();
        Dataset::from_parts(districts, records)
    }

    fn january() -> MonthKey {
        MonthKey::new(2023, 1).unwrap()
    }

    const DOMAIN: MetricDomain = MetricDomain {
        low: 0.0,
        high: 10.0,
    };

    #[test]
    fn one_entry_per_boundary_district() {
        let data = dataset(
            "year,month,district,cases,population\n\
             2023,1,Alpha,120,2400000\n",
        );

        let frame = build_frame(&data, january(), Metric::Cases, DOMAIN, 0.0);

        assert_eq!(frame.entries.len(), 3);
        let no_data = frame
            .entries
            .values()
            .filter(|e| e.display_value.is_none())
            .count();
        assert_eq!(no_data, 2);
    }

    #[test]
    fn sparse_months_still_cover_every_district() {
        let features: Vec<String> = (0..25)
            .map(|i| {
                let x = f64::from(i) * 2.0;
                let x2 = x + 1.0;
                format!(
                    r#"{{"type":"Feature","properties":{{"shapeName":"D{i:02}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x},0.0],[{x2},0.0],[{x2},1.0],[{x},1.0],[{x},0.0]]]}}}}"#
                )
            })
            .collect();
        let boundaries = format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        );

        let rules = NameRules::default();
        let districts = districts_from_str(&boundaries, &rules).unwrap();
        let records = observations_from_reader(
            "year,month,district,cases,population\n\
             2023,1,D03,5,100000\n\
             2023,1,D11,8,100000\n\
             2023,1,D24,2,100000\n"
                .as_bytes(),
            &rules,
        )
        .unwrap()
        .into_iter()
        .map(with_derived_incidence)
        .collect();
        let data = Dataset::from_parts(districts, records);

        let frame = build_frame(&data, january(), Metric::Cases, DOMAIN, 0.0);

        assert_eq!(frame.entries.len(), 25);
        let no_data = frame
            .entries
            .values()
            .filter(|e| e.display_value.is_none())
            .count();
        assert_eq!(no_data, 22);
        assert_eq!(frame.entries["d11"].display_value, Some(8.0));
    }

    #[test]
    fn no_data_districts_render_neutral() {
        let data = dataset(
            "year,month,district,cases,population\n\
             2023,1,Alpha,120,2400000\n",
        );

        let frame = build_frame(&data, january(), Metric::Cases, DOMAIN, 0.0);
        let beta = &frame.entries["beta"];

        assert_eq!(beta.district, "Beta");
        assert_eq!(beta.display_value, None);
        assert!((beta.color_value - DOMAIN.low).abs() < f64::EPSILON);
        assert!(beta.is_zero);
        assert_eq!(beta.cases_text, "");
        assert_eq!(beta.incidence_text, "");
        assert_eq!(beta.population_text, "");
    }

    #[test]
    fn clamps_color_but_keeps_display_value() {
        let data = dataset(
            "year,month,district,cases,population\n\
             2023,1,Alpha,120,2400000\n",
        );

        let frame = build_frame(&data, january(), Metric::Cases, DOMAIN, 0.0);
        let alpha = &frame.entries["alpha"];

        assert_eq!(alpha.display_value, Some(120.0));
        assert!((alpha.color_value - DOMAIN.high).abs() < f64::EPSILON);
        assert!(!alpha.is_zero);
    }

    #[test]
    fn zero_cases_are_flagged() {
        let data = dataset(
            "year,month,district,cases,population\n\
             2023,1,Alpha,0,2400000\n",
        );

        let frame = build_frame(&data, january(), Metric::Cases, DOMAIN, 0.0);
        let alpha = &frame.entries["alpha"];

        assert_eq!(alpha.display_value, Some(0.0));
        assert!(alpha.is_zero);
    }

    #[test]
    fn threshold_dims_low_and_missing_incidence() {
        let data = dataset(
            "year,month,district,cases,population,incidence_per_100k\n\
             2023,1,Alpha,10,1000,2.0\n\
             2023,1,Beta,10,1000,8.0\n",
        );

        let frame = build_frame(&data, january(), Metric::IncidencePer100k, DOMAIN, 5.0);

        assert!(frame.entries["alpha"].dimmed);
        assert!(!frame.entries["beta"].dimmed);
        // Gamma has no record, so no incidence to clear the threshold.
        assert!(frame.entries["gamma"].dimmed);
    }

    #[test]
    fn zero_threshold_dims_nothing() {
        let data = dataset(
            "year,month,district,cases,population,incidence_per_100k\n\
             2023,1,Alpha,10,1000,2.0\n",
        );

        let frame = build_frame(&data, january(), Metric::IncidencePer100k, DOMAIN, 0.0);

        assert!(frame.entries.values().all(|e| !e.dimmed));
    }

    #[test]
    fn dimming_keys_on_incidence_even_for_cases() {
        let data = dataset(
            "year,month,district,cases,population,incidence_per_100k\n\
             2023,1,Alpha,9000,1000,2.0\n",
        );

        let frame = build_frame(&data, january(), Metric::Cases, DOMAIN, 5.0);

        // Large case count, but incidence sits below the threshold.
        assert!(frame.entries["alpha"].dimmed);
    }

    #[test]
    fn identical_inputs_build_identical_frames() {
        let data = dataset(
            "year,month,district,cases,population\n\
             2023,1,Alpha,120,2400000\n\
             2023,1,Beta,3,1000\n",
        );

        let first = build_frame(&data, january(), Metric::Cases, DOMAIN, 2.0);
        let second = build_frame(&data, january(), Metric::Cases, DOMAIN, 2.0);

        assert_eq!(first, second);
    }

    #[test]
    fn tooltip_texts_are_formatted() {
        let data = dataset(
            "year,month,district,cases,population\n\
             2023,1,Alpha,120,2400000\n",
        );

        let frame = build_frame(&data, january(), Metric::IncidencePer100k, DOMAIN, 0.0);
        let alpha = &frame.entries["alpha"];

        assert_eq!(alpha.cases_text, "120");
        assert_eq!(alpha.population_text, "2,400,000");
        // 120 / 2,400,000 * 100,000 = 5.0
        assert_eq!(alpha.incidence_text, "5.0");
    }
}
