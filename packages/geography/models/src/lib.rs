#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District boundary and name-normalization rule types.
//!
//! These types represent the administrative areas a choropleth is drawn
//! over. They are independent of the observation data; the join between
//! the two happens on the normalized district key.

use serde::{Deserialize, Serialize};

/// A district boundary keyed for joining against observation rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictGeometry {
    /// District name as it appears in the boundary file.
    pub name: String,
    /// Normalized join key derived from the name.
    pub key: String,
    /// Boundary in WGS84 lon/lat. Single polygons are stored as a
    /// one-element multi-polygon.
    pub boundary: geo::MultiPolygon<f64>,
}

/// Rules applied to a raw district name to produce its join key.
///
/// The defaults match the common case of boundary files and case
/// reports that disagree only in casing, whitespace, and an
/// administrative suffix ("Mannar" vs "Mannar District"). Loaded from
/// a TOML file when a dataset needs something different.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct NameRules {
    /// Strip leading and trailing whitespace.
    pub trim: bool,
    /// Lowercase the name before any other rule.
    pub lowercase: bool,
    /// Remove all interior whitespace, not just collapse it.
    pub strip_whitespace: bool,
    /// Tokens removed wherever they appear (case-insensitive when
    /// `lowercase` is set, which runs first).
    pub strip_tokens: Vec<String>,
    /// Replace accented Latin letters with their ASCII base form.
    pub fold_diacritics: bool,
}

impl Default for NameRules {
    fn default() -> Self {
        Self {
            trim: true,
            lowercase: true,
            strip_whitespace: true,
            strip_tokens: vec!["district".to_string()],
            fold_diacritics: false,
        }
    }
}
