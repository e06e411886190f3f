//! `GeoJSON` boundary loading.
//!
//! Converts a feature collection into [`DistrictGeometry`] values. The
//! district name is read from the first recognized property key present
//! in the collection, and features that normalize to the same key are
//! merged into a single multi-polygon so the join table has one row per
//! district.

use std::collections::{BTreeMap, btree_map::Entry};
use std::path::Path;

use epi_map_geography_models::{DistrictGeometry, NameRules};
use geo::MultiPolygon;
use geojson::{Feature, GeoJson, JsonValue};

use crate::{GeoError, normalize::normalize};

/// District-name property keys, in lookup order.
///
/// Covers geoBoundaries (`shapeName`), GADM level-2 (`NAME_2`), and the
/// plain spellings used by hand-rolled boundary files.
pub const DISTRICT_PROPERTY_KEYS: [&str; 5] =
    ["shapeName", "NAME_2", "name", "district", "DISTRICT"];

/// Loads district boundaries from a `GeoJSON` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, no recognized
/// district-name property exists, or every feature was skipped.
pub fn load_districts(path: &Path, rules: &NameRules) -> Result<Vec<DistrictGeometry>, GeoError> {
    let raw = std::fs::read_to_string(path)?;
    let districts = districts_from_str(&raw, rules)?;

    if districts.is_empty() {
        return Err(GeoError::NoDistricts {
            path: path.display().to_string(),
        });
    }

    log::info!(
        "Loaded {} district boundaries from {}",
        districts.len(),
        path.display()
    );
    Ok(districts)
}

/// Parses district boundaries from `GeoJSON` text.
///
/// Returned districts are sorted by join key. Features without usable
/// areal geometry are skipped with a warning; an empty result means the
/// collection had nothing to draw.
///
/// # Errors
///
/// Returns an error if the text is not a `GeoJSON` feature collection or
/// no feature carries a recognized district-name property.
pub fn districts_from_str(
    raw: &str,
    rules: &NameRules,
) -> Result<Vec<DistrictGeometry>, GeoError> {
    let geojson: GeoJson = raw.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeoError::NotACollection);
    };

    if collection.features.is_empty() {
        return Ok(Vec::new());
    }

    let Some(name_key) = pick_district_property(&collection.features) else {
        return Err(GeoError::MissingDistrictProperty {
            tried: DISTRICT_PROPERTY_KEYS.join(", "),
        });
    };
    log::debug!("Using district name property {name_key:?}");

    let mut by_key: BTreeMap<String, DistrictGeometry> = BTreeMap::new();
    let mut skipped = 0_usize;

    for feature in collection.features {
        let Some(name) = feature_name(&feature, name_key) else {
            log::warn!("Skipping feature without a {name_key:?} property");
            skipped += 1;
            continue;
        };

        let Some(boundary) = feature_boundary(feature) else {
            log::warn!("Skipping {name}: no usable polygon geometry");
            skipped += 1;
            continue;
        };

        let key = normalize(&name, rules);
        match by_key.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(DistrictGeometry {
                    name,
                    key,
                    boundary,
                });
            }
            Entry::Occupied(mut slot) => {
                // Same district split across several features.
                slot.get_mut().boundary.0.extend(boundary.0);
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} boundary features");
    }

    Ok(by_key.into_values().collect())
}

/// Picks the first recognized district-name property present (non-null)
/// on any feature.
fn pick_district_property(features: &[Feature]) -> Option<&'static str> {
    DISTRICT_PROPERTY_KEYS.iter().copied().find(|key| {
        features.iter().any(|feature| {
            feature
                .properties
                .as_ref()
                .is_some_and(|props| props.get(*key).is_some_and(|value| !value.is_null()))
        })
    })
}

/// Reads the district name from a feature's properties.
fn feature_name(feature: &Feature, key: &str) -> Option<String> {
    match feature.properties.as_ref()?.get(key)? {
        JsonValue::String(name) => Some(name.clone()),
        JsonValue::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// Converts a feature's geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn feature_boundary(feature: Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(properties: &str, geometry: &str) -> String {
        format!(r#"{{"type":"Feature","properties":{properties},"geometry":{geometry}}}"#)
    }

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        )
    }

    const UNIT_SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]]}"#;
    const TWO_SQUARES: &str = r#"{"type":"MultiPolygon","coordinates":[[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]],[[[2.0,0.0],[3.0,0.0],[3.0,1.0],[2.0,1.0],[2.0,0.0]]]]}"#;

    #[test]
    fn loads_polygons_and_multipolygons() {
        let raw = collection(&[
            feature(r#"{"shapeName":"Alpha District"}"#, UNIT_SQUARE),
            feature(r#"{"shapeName":"Beta"}"#, TWO_SQUARES),
        ]);

        let districts = districts_from_str(&raw, &NameRules::default()).unwrap();

        assert_eq!(districts.len(), 2);
        assert_eq!(districts[0].key, "alpha");
        assert_eq!(districts[0].name, "Alpha District");
        assert_eq!(districts[0].boundary.0.len(), 1);
        assert_eq!(districts[1].key, "beta");
        assert_eq!(districts[1].boundary.0.len(), 2);
    }

    #[test]
    fn merges_features_sharing_a_key() {
        let raw = collection(&[
            feature(r#"{"shapeName":"Gamma District"}"#, UNIT_SQUARE),
            feature(r#"{"shapeName":"GAMMA"}"#, UNIT_SQUARE),
        ]);

        let districts = districts_from_str(&raw, &NameRules::default()).unwrap();

        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].key, "gamma");
        assert_eq!(districts[0].name, "Gamma District");
        assert_eq!(districts[0].boundary.0.len(), 2);
    }

    #[test]
    fn skips_non_areal_geometry() {
        let raw = collection(&[
            feature(r#"{"shapeName":"Alpha"}"#, UNIT_SQUARE),
            feature(
                r#"{"shapeName":"Beacon"}"#,
                r#"{"type":"Point","coordinates":[0.5,0.5]}"#,
            ),
        ]);

        let districts = districts_from_str(&raw, &NameRules::default()).unwrap();

        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].key, "alpha");
    }

    #[test]
    fn picks_name_property_by_priority() {
        let raw = collection(&[feature(
            r#"{"name":"Wrong","NAME_2":"Right"}"#,
            UNIT_SQUARE,
        )]);

        let districts = districts_from_str(&raw, &NameRules::default()).unwrap();

        assert_eq!(districts[0].name, "Right");
    }

    #[test]
    fn missing_name_property_is_fatal() {
        let raw = collection(&[feature(r#"{"region":"Alpha"}"#, UNIT_SQUARE)]);

        let err = districts_from_str(&raw, &NameRules::default()).unwrap_err();

        assert!(matches!(err, GeoError::MissingDistrictProperty { .. }));
    }

    #[test]
    fn rejects_bare_geometry() {
        let err = districts_from_str(UNIT_SQUARE, &NameRules::default()).unwrap_err();

        assert!(matches!(err, GeoError::NotACollection));
    }
}
