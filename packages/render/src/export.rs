//! Writes finished choropleth pages into the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use epi_map_choropleth::frame::build_frame;
use epi_map_choropleth::scale::MetricDomain;
use epi_map_dataset::Dataset;
use epi_map_epi_models::{Metric, MonthKey};

use crate::html;
use crate::svg::render_svg;

/// File name for one month's page inside the output directory.
#[must_use]
pub fn page_file_name(month: MonthKey) -> String {
    format!("choropleth_{:04}_{:02}.html", month.year, month.month)
}

/// Renders one month and writes its standalone page.
///
/// # Errors
///
/// Returns an error when the output directory or the page cannot be
/// written.
pub fn export_month(
    dataset: &Dataset,
    month: MonthKey,
    metric: Metric,
    domain: MetricDomain,
    threshold: f64,
    out_dir: &Path,
) -> std::io::Result<PathBuf> {
    let frame = build_frame(dataset, month, metric, domain, threshold);
    let heading = format!("{} — {}", metric.label(), month.display_name());
    let svg = render_svg(dataset.districts(), &frame, domain, &heading);

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(page_file_name(month));
    fs::write(&path, html::page(&heading, &svg))?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

/// Renders every month in the dataset with one shared domain, then
/// rebuilds the index page.
///
/// Sharing the domain keeps colors comparable across months. The index
/// is built from a directory scan, so pages exported earlier by other
/// runs stay listed.
///
/// # Errors
///
/// Returns an error when any page or the index cannot be written.
pub fn export_all(
    dataset: &Dataset,
    metric: Metric,
    domain: MetricDomain,
    threshold: f64,
    out_dir: &Path,
) -> std::io::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for month in dataset.months() {
        written.push(export_month(
            dataset, month, metric, domain, threshold, out_dir,
        )?);
    }
    written.push(write_index(out_dir)?);
    Ok(written)
}

/// Scans the output directory and writes `index.html` linking every
/// exported month in chronological order.
///
/// # Errors
///
/// Returns an error when the directory cannot be read or the index
/// cannot be written.
pub fn write_index(out_dir: &Path) -> std::io::Result<PathBuf> {
    let mut months = Vec::new();
    for entry in fs::read_dir(out_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(month) = month_from_file_name(name) {
            months.push(month);
        }
    }
    months.sort_unstable();

    let pages: Vec<(String, String)> = months
        .iter()
        .map(|month| (page_file_name(*month), month.display_name()))
        .collect();

    let path = out_dir.join("index.html");
    fs::write(&path, html::index_page(&pages))?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

fn month_from_file_name(name: &str) -> Option<MonthKey> {
    let stem = name.strip_prefix("choropleth_")?.strip_suffix(".html")?;
    let (year, month) = stem.split_once('_')?;
    MonthKey::new(year.parse().ok()?, month.parse().ok()?).ok()
}
