#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Metric taxonomy and month-key types.
//!
//! This crate defines the canonical metric vocabulary shared across the
//! epi-map system. Every layer (dataset loading, scale computation, frame
//! building, rendering) selects and labels data through [`Metric`], and
//! addresses a month of observations through [`MonthKey`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A renderable metric column of the observation table.
///
/// The serialized names match the CSV column headers, so a `Metric` can be
/// parsed directly from user input (`--metric incidence_per_100k`) or from
/// a column name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Raw monthly case count.
    Cases,
    /// Case count normalized to a 100,000-person base.
    #[serde(rename = "incidence_per_100k")]
    #[strum(serialize = "incidence_per_100k")]
    IncidencePer100k,
}

impl Metric {
    /// Human-readable label used for color-bar and page titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cases => "Cases",
            Self::IncidencePer100k => "Incidence/100k",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Cases, Self::IncidencePer100k]
    }
}

/// A (year, month) pair identifying one month of observations.
///
/// Ordering is chronological (derived from the field order), and the
/// `Display`/`FromStr` round trip uses the `YYYY-MM` form that also names
/// exported files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl MonthKey {
    /// Creates a month key, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not in the range 1-12.
    pub const fn new(year: i32, month: u32) -> Result<Self, InvalidMonthError> {
        match month {
            1..=12 => Ok(Self { year, month }),
            _ => Err(InvalidMonthError { month }),
        }
    }

    /// The month immediately after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Long label for titles and index pages, e.g. `"August 2024"`.
    ///
    /// Falls back to the `YYYY-MM` form for years outside chrono's range.
    #[must_use]
    pub fn display_name(self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).map_or_else(
            || self.to_string(),
            |date| date.format("%B %Y").to_string(),
        )
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthKeyError {
            input: s.to_string(),
        };

        let (year_str, month_str) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = year_str.parse().map_err(|_| err())?;
        let month: u32 = month_str.parse().map_err(|_| err())?;

        Self::new(year, month).map_err(|_| err())
    }
}

/// Every month from `start` through `end`, inclusive on both ends.
///
/// Returns an empty vector when `start > end`.
#[must_use]
pub fn month_range(start: MonthKey, end: MonthKey) -> Vec<MonthKey> {
    let mut months = Vec::new();
    let mut current = start;
    while current <= end {
        months.push(current);
        current = current.next();
    }
    months
}

/// Error returned when a month number is outside 1-12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMonthError {
    /// The invalid month number.
    pub month: u32,
}

impl std::fmt::Display for InvalidMonthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month {}: expected 1-12", self.month)
    }
}

impl std::error::Error for InvalidMonthError {}

/// Error returned when a string does not parse as a `YYYY-MM` month key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthKeyError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for ParseMonthKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month key '{}': expected YYYY-MM", self.input)
    }
}

impl std::error::Error for ParseMonthKeyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_parses_column_names() {
        assert_eq!("cases".parse::<Metric>().unwrap(), Metric::Cases);
        assert_eq!(
            "incidence_per_100k".parse::<Metric>().unwrap(),
            Metric::IncidencePer100k
        );
        assert!("deaths".parse::<Metric>().is_err());
    }

    #[test]
    fn metric_round_trips_through_strum() {
        for metric in Metric::all() {
            assert_eq!(metric.as_ref().parse::<Metric>().unwrap(), *metric);
        }
    }

    #[test]
    fn month_key_formats_zero_padded() {
        let key = MonthKey::new(2024, 3).unwrap();
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn month_key_parses_and_round_trips() {
        let key: MonthKey = "2023-11".parse().unwrap();
        assert_eq!(key, MonthKey::new(2023, 11).unwrap());
        assert_eq!(key.to_string().parse::<MonthKey>().unwrap(), key);
    }

    #[test]
    fn month_key_rejects_bad_input() {
        assert!("2024".parse::<MonthKey>().is_err());
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024-00".parse::<MonthKey>().is_err());
        assert!("abcd-01".parse::<MonthKey>().is_err());
    }

    #[test]
    fn month_key_orders_chronologically() {
        let a = MonthKey::new(2023, 12).unwrap();
        let b = MonthKey::new(2024, 1).unwrap();
        let c = MonthKey::new(2024, 2).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn next_wraps_december() {
        let december = MonthKey::new(2024, 12).unwrap();
        assert_eq!(december.next(), MonthKey::new(2025, 1).unwrap());
    }

    #[test]
    fn month_range_is_inclusive() {
        let start = MonthKey::new(2023, 11).unwrap();
        let end = MonthKey::new(2024, 2).unwrap();
        let months = month_range(start, end);
        assert_eq!(months.len(), 4);
        assert_eq!(months.first().unwrap().to_string(), "2023-11");
        assert_eq!(months.last().unwrap().to_string(), "2024-02");
    }

    #[test]
    fn month_range_empty_when_reversed() {
        let start = MonthKey::new(2024, 2).unwrap();
        let end = MonthKey::new(2023, 11).unwrap();
        assert!(month_range(start, end).is_empty());
    }

    #[test]
    fn display_name_spells_out_month() {
        let key = MonthKey::new(2024, 8).unwrap();
        assert_eq!(key.display_name(), "August 2024");
    }
}
