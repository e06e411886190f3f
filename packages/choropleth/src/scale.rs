//! Color-domain computation.
//!
//! The color domain for a metric is fixed once per dataset load, from
//! every non-missing value across the full time range. A month viewed in
//! March and a month viewed in December therefore map the same value to
//! the same color. The high bound is the 95th percentile rather than the
//! maximum so one outbreak month does not wash out the contrast of every
//! normal month.

use std::collections::BTreeMap;

use epi_map_dataset::Dataset;
use epi_map_epi_models::Metric;

/// Share of observed values the color domain covers.
pub const DOMAIN_PERCENTILE: f64 = 0.95;

/// High bound used when no usable value exists, so the domain never
/// collapses to zero width.
pub const FALLBACK_HIGH: f64 = 1.0;

/// The (low, high) value range mapped onto the color ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDomain {
    /// Lower color bound. Always 0 for these non-negative metrics.
    pub low: f64,
    /// Upper color bound.
    pub high: f64,
}

impl MetricDomain {
    /// Clamps a value into the domain for coloring.
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }

    /// Position of a value inside the domain, in `0.0..=1.0`.
    #[must_use]
    pub fn position(self, value: f64) -> f64 {
        if self.high > self.low {
            ((value - self.low) / (self.high - self.low)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// One fixed domain per metric.
pub type Scales = BTreeMap<Metric, MetricDomain>;

/// Computes the color domain from every non-missing value of a metric.
///
/// `low` is always 0; `high` is the 95th percentile with linear
/// interpolation between the two nearest ranks. With a single usable
/// value the domain runs up to that value, and with none (or only
/// zeros) up to [`FALLBACK_HIGH`].
#[must_use]
pub fn compute_domain(values: &[f64]) -> MetricDomain {
    let mut usable: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if usable.is_empty() {
        return MetricDomain {
            low: 0.0,
            high: FALLBACK_HIGH,
        };
    }

    usable.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let high = percentile(&usable, DOMAIN_PERCENTILE);

    MetricDomain {
        low: 0.0,
        high: if high > 0.0 { high } else { FALLBACK_HIGH },
    }
}

/// Computes the domain of every metric over a loaded dataset.
#[must_use]
pub fn compute_scales(dataset: &Dataset) -> Scales {
    Metric::all()
        .iter()
        .map(|&metric| (metric, compute_domain(&dataset.metric_values(metric))))
        .collect()
}

/// Percentile of already-sorted values, interpolating linearly between
/// the two nearest ranks.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)] // value counts stay far below 2^52
    let rank = p * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // rank is non-negative
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = rank - rank.floor();

    fraction.mul_add(sorted[upper] - sorted[lower], sorted[lower])
}
