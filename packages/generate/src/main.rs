#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the data utilities.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use epi_map_epi_models::MonthKey;
use epi_map_generate::demo::make_demo;
use epi_map_generate::population::write_population_template;
use epi_map_geography::NameRules;
use epi_map_geography::normalize::load_rules;

#[derive(Parser)]
#[command(
    name = "epi_map_generate",
    about = "Demo data and population template utilities"
)]
struct Cli {
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
    /// Synthesize a seeded monthly observation CSV
    MakeDemo {
        /// First month, inclusive, as `YYYY-MM`
        #[arg(long, default_value = "2024-01")]
        start: MonthKey,
        /// Last month, inclusive, as `YYYY-MM`
        #[arg(long, default_value = "2024-12")]
        end: MonthKey,
        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,
        /// CSV with `district,population` overriding the default population
        #[arg(long)]
        pop_csv: Option<PathBuf>,
        /// Output CSV
        #[arg(long, default_value = "data/observations.csv")]
        out: PathBuf,
    },
    /// Write a `district,population` template from the boundary file
    PopTemplate {
        /// Output CSV
        #[arg(long, default_value = "data/district_population.csv")]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => load_rules(path)?,
        None => NameRules::default(),
    };

    let Some(command) = cli.command else {
        return epi_map_generate::interactive::run(&cli.boundaries, &rules);
    };

    match command {
        Commands::MakeDemo {
            start,
            end,
            seed,
            pop_csv,
            out,
        } => {
            if end < start {
                return Err(format!("End month {end} precedes start month {start}").into());
            }
            make_demo(
                &out,
                &cli.boundaries,
                &rules,
                start,
                end,
                seed,
                pop_csv.as_deref(),
            )?;
            println!("{}", out.display());
        }
        Commands::PopTemplate { out } => {
            write_population_template(&out, &cli.boundaries, &rules)?;
            println!("{}", out.display());
        }
    }

    Ok(())
}
