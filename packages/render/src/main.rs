#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the choropleth export tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use epi_map_choropleth::scale::{MetricDomain, compute_domain};
use epi_map_dataset::Dataset;
use epi_map_epi_models::{Metric, MonthKey};
use epi_map_geography::NameRules;
use epi_map_geography::normalize::load_rules;
use epi_map_render::export;

#[derive(Parser)]
#[command(name = "epi_map_render", about = "Monthly incidence choropleth exporter")]
struct Cli {
    /// Observation CSV (year, month, district, cases, population).
    #[arg(long, default_value = "data/observations.csv")]
    observations: PathBuf,

    /// District boundary `GeoJSON`.
    #[arg(long, default_value = "data/districts.geojson")]
    boundaries: PathBuf,

    /// TOML file overriding the district name matching rules.
    #[arg(long)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one month to a standalone HTML page
    Export {
        /// Month to render, as `YYYY-MM`
        #[arg(long)]
        month: MonthKey,
        /// Metric to color by
        #[arg(long, default_value = "incidence_per_100k")]
        metric: Metric,
        /// Override the color scale high (default: 95th percentile)
        #[arg(long)]
        vmax: Option<f64>,
        /// Dim districts whose incidence sits below this value
        #[arg(long, default_value = "0")]
        threshold: f64,
        /// Output directory
        #[arg(long, default_value = "docs")]
        out_dir: PathBuf,
    },
    /// Export every month in the dataset plus an index page
    ExportAll {
        /// Metric to color by
        #[arg(long, default_value = "incidence_per_100k")]
        metric: Metric,
        /// Override the color scale high (default: 95th percentile)
        #[arg(long)]
        vmax: Option<f64>,
        /// Dim districts whose incidence sits below this value
        #[arg(long, default_value = "0")]
        threshold: f64,
        /// Output directory
        #[arg(long, default_value = "docs")]
        out_dir: PathBuf,
    },
    /// List the months present in the observation CSV
    Months,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => load_rules(path)?,
        None => NameRules::default(),
    };

    let Some(command) = cli.command else {
        return epi_map_render::interactive::run(&cli.observations, &cli.boundaries, &rules);
    };

    let dataset = Dataset::load(&cli.observations, &cli.boundaries, &rules)?;

    match command {
        Commands::Export {
            month,
            metric,
            vmax,
            threshold,
            out_dir,
        } => {
            if !dataset.months().contains(&month) {
                return Err(format!("No observations for {month}").into());
            }
            let domain = resolve_domain(&dataset, metric, vmax);
            let path = export::export_month(&dataset, month, metric, domain, threshold, &out_dir)?;
            println!("{}", path.display());
        }
        Commands::ExportAll {
            metric,
            vmax,
            threshold,
            out_dir,
        } => {
            let domain = resolve_domain(&dataset, metric, vmax);
            let written = export::export_all(&dataset, metric, domain, threshold, &out_dir)?;
            log::info!("Exported {} files to {}", written.len(), out_dir.display());
        }
        Commands::Months => {
            let months = dataset.months();
            println!("{:<10} LABEL", "MONTH");
            println!("{}", "-".repeat(30));
            for month in &months {
                let key = month.to_string();
                println!("{:<10} {}", key, month.display_name());
            }
        }
    }

    Ok(())
}

/// Fixed domain for the run: the `--vmax` override when given, else the
/// metric's 95th percentile across the whole dataset.
fn resolve_domain(dataset: &Dataset, metric: Metric, vmax: Option<f64>) -> MetricDomain {
    match vmax {
        Some(high) if high > 0.0 => MetricDomain { low: 0.0, high },
        _ => compute_domain(&dataset.metric_values(metric)),
    }
}
