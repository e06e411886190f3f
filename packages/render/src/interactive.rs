//! Interactive menu for the export tool.
//!
//! Presents a menu-driven interface using `dialoguer` so a dataset can
//! be browsed and exported without memorising CLI flags.

use std::path::{Path, PathBuf};

use dialoguer::{Input, Select};
use epi_map_choropleth::scale::{MetricDomain, compute_domain};
use epi_map_dataset::Dataset;
use epi_map_epi_models::Metric;
use epi_map_geography::NameRules;

use crate::export;

/// Runs the interactive export menu loop.
///
/// Loads the dataset once up front, then keeps offering exports until
/// the operator exits.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or an I/O prompt
/// fails.
pub fn run(
    observations: &Path,
    boundaries: &Path,
    rules: &NameRules,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::load(observations, boundaries, rules)?;
    println!(
        "Loaded {} districts and {} months of observations.",
        dataset.districts().len(),
        dataset.months().len()
    );

    loop {
        println!();
        let items = &[
            "Export one month",
            "Export every month",
            "List months",
            "Exit",
        ];
        let selection = Select::new()
            .with_prompt("Choropleth exporter")
            .items(items)
            .default(0)
            .interact()?;

        match selection {
            0 => handle_export_month(&dataset)?,
            1 => handle_export_all(&dataset)?,
            2 => {
                for month in dataset.months() {
                    println!("{month}  {}", month.display_name());
                }
            }
            3 => {
                println!("Goodbye.");
                return Ok(());
            }
            _ => unreachable!(),
        }
    }
}

/// Prompts for a month and frame options, then exports that one page.
fn handle_export_month(dataset: &Dataset) -> Result<(), Box<dyn std::error::Error>> {
    let months = dataset.months();
    let labels: Vec<String> = months.iter().map(|month| month.display_name()).collect();
    let selection = Select::new()
        .with_prompt("Month")
        .items(&labels)
        .default(labels.len().saturating_sub(1))
        .interact()?;
    let month = months[selection];

    let options = prompt_frame_options(dataset)?;
    let path = export::export_month(
        dataset,
        month,
        options.metric,
        options.domain,
        options.threshold,
        &options.out_dir,
    )?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Prompts for frame options, then exports every month plus the index.
fn handle_export_all(dataset: &Dataset) -> Result<(), Box<dyn std::error::Error>> {
    let options = prompt_frame_options(dataset)?;
    let written = export::export_all(
        dataset,
        options.metric,
        options.domain,
        options.threshold,
        &options.out_dir,
    )?;
    println!(
        "Wrote {} files to {}",
        written.len(),
        options.out_dir.display()
    );
    Ok(())
}

/// Options shared by both export flows.
struct FrameOptions {
    metric: Metric,
    domain: MetricDomain,
    threshold: f64,
    out_dir: PathBuf,
}

fn prompt_frame_options(dataset: &Dataset) -> Result<FrameOptions, Box<dyn std::error::Error>> {
    let metrics = Metric::all();
    let labels: Vec<&str> = metrics.iter().map(|metric| metric.label()).collect();
    let default = metrics
        .iter()
        .position(|metric| *metric == Metric::IncidencePer100k)
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Metric")
        .items(&labels)
        .default(default)
        .interact()?;
    let metric = metrics[selection];

    let vmax: String = Input::new()
        .with_prompt("Color scale high (blank for auto)")
        .allow_empty(true)
        .interact_text()?;
    let domain = match vmax.trim().parse::<f64>() {
        Ok(high) if high > 0.0 => MetricDomain { low: 0.0, high },
        _ => compute_domain(&dataset.metric_values(metric)),
    };

    let threshold: String = Input::new()
        .with_prompt("Highlight threshold (0 to disable)")
        .default("0".to_string())
        .interact_text()?;
    let threshold = threshold.trim().parse().unwrap_or(0.0);

    let out_dir: String = Input::new()
        .with_prompt("Output directory")
        .default("docs".to_string())
        .interact_text()?;

    Ok(FrameOptions {
        metric,
        domain,
        threshold,
        out_dir: PathBuf::from(out_dir),
    })
}
