//! Interactive menu for the data utilities.
//!
//! Presents a menu-driven interface using `dialoguer` so demo data and
//! population templates can be generated without memorising CLI flags.

use std::path::{Path, PathBuf};

use dialoguer::{Input, Select};
use epi_map_epi_models::MonthKey;
use epi_map_geography::NameRules;

use crate::{demo, population};

/// Runs the interactive data-utilities menu loop.
///
/// # Errors
///
/// Returns an error if generation fails or an I/O prompt fails.
pub fn run(boundaries: &Path, rules: &NameRules) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        println!();
        let items = &[
            "Generate demo observations",
            "Write population template",
            "Exit",
        ];
        let selection = Select::new()
            .with_prompt("Data utilities")
            .items(items)
            .default(0)
            .interact()?;

        match selection {
            0 => handle_make_demo(boundaries, rules)?,
            1 => handle_template(boundaries, rules)?,
            2 => {
                println!("Goodbye.");
                return Ok(());
            }
            _ => unreachable!(),
        }
    }
}

/// Prompts for demo-generation parameters and writes the CSV.
fn handle_make_demo(
    boundaries: &Path,
    rules: &NameRules,
) -> Result<(), Box<dyn std::error::Error>> {
    let start: String = Input::new()
        .with_prompt("Start month (YYYY-MM)")
        .default("2024-01".to_string())
        .interact_text()?;
    let start: MonthKey = start.trim().parse()?;

    let end: String = Input::new()
        .with_prompt("End month (YYYY-MM)")
        .default("2024-12".to_string())
        .interact_text()?;
    let end: MonthKey = end.trim().parse()?;

    let seed: String = Input::new()
        .with_prompt("RNG seed")
        .default("42".to_string())
        .interact_text()?;
    let seed = seed.trim().parse().unwrap_or(42);

    let population_csv: String = Input::new()
        .with_prompt("Population CSV (blank for defaults)")
        .allow_empty(true)
        .interact_text()?;
    let population_csv = if population_csv.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(population_csv.trim()))
    };

    let out: String = Input::new()
        .with_prompt("Output CSV")
        .default("data/observations.csv".to_string())
        .interact_text()?;

    let rows = demo::make_demo(
        Path::new(&out),
        boundaries,
        rules,
        start,
        end,
        seed,
        population_csv.as_deref(),
    )?;
    println!("Wrote {rows} rows to {out}");
    Ok(())
}

/// Prompts for the template path and writes the skeleton.
fn handle_template(boundaries: &Path, rules: &NameRules) -> Result<(), Box<dyn std::error::Error>> {
    let out: String = Input::new()
        .with_prompt("Template path")
        .default("data/district_population.csv".to_string())
        .interact_text()?;

    let districts = population::write_population_template(Path::new(&out), boundaries, rules)?;
    println!("Wrote {districts} district rows to {out}");
    Ok(())
}
