//! The module responsible for writing results to disk and to the console.
use crate::calculator::{CalculationResult, Quantity, RoiRating};
use crate::sweep::{SweepParameter, SweepPoint};
use crate::vehicle::VehicleProfileMap;
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "carbon_roi_results";

/// The output file name for calculation results
const RESULTS_FILE_NAME: &str = "results.csv";

/// Get the default output folder for the scenario file at the specified path
pub fn get_output_dir(scenario_path: &Path) -> Result<PathBuf> {
    let scenario_name = scenario_path
        .file_stem()
        .context("Scenario path has no file name")?
        .to_str()
        .context("Invalid chars in scenario file name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory, deleting an existing one if `allow_overwrite` is set.
///
/// # Returns
///
/// True if an existing, non-empty directory was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            // Folder exists but is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
            --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Write the quantities of a calculation result to `results.csv` in `output_dir`
pub fn write_results(output_dir: &Path, result: &CalculationResult) -> Result<()> {
    let file_path = output_dir.join(RESULTS_FILE_NAME);
    write_csv(&file_path, result.quantities())
}

/// Represents a row in a sweep output CSV file
#[derive(Serialize, Debug, PartialEq)]
struct SweepRow {
    value: f64,
    actual_number_of_cartridges: u32,
    total_recovery_payload: f64,
    total_distribution_payload: f64,
    total_carbon_captured: f64,
    total_carbon_emissions: f64,
    roi_ratio: f64,
    rating: String,
}

impl SweepRow {
    /// Create a new [`SweepRow`]
    fn new(point: &SweepPoint) -> Self {
        let result = &point.result;
        Self {
            value: point.value,
            actual_number_of_cartridges: result.actual_number_of_cartridges,
            total_recovery_payload: result.total_recovery_payload.value(),
            total_distribution_payload: result.total_distribution_payload.value(),
            total_carbon_captured: result.total_carbon_captured.value(),
            total_carbon_emissions: result.total_carbon_emissions.value(),
            roi_ratio: result.roi_ratio.value(),
            rating: result.roi_ratio.rating().to_string(),
        }
    }
}

/// The output file name for a sweep over the given parameter
pub fn sweep_file_name(parameter: SweepParameter) -> String {
    format!("sweep_{parameter}.csv")
}

/// Write the results of a parameter sweep to a CSV file in `output_dir`
pub fn write_sweep(
    output_dir: &Path,
    parameter: SweepParameter,
    points: &[SweepPoint],
) -> Result<()> {
    let file_path = output_dir.join(sweep_file_name(parameter));
    write_csv(&file_path, points.iter().map(SweepRow::new))
}

/// Write a series of records to a new CSV file
fn write_csv<T, I>(file_path: &Path, records: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_path(file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Format a single quantity for display with the given number of decimal places
fn format_quantity(quantity: &Quantity, decimal_places: usize) -> String {
    let value = if quantity.value.is_infinite() {
        "unbounded".to_string()
    } else if quantity.unit == "units" {
        format!("{}", quantity.value)
    } else {
        format!("{:.*}", decimal_places, quantity.value)
    };

    format!("{value} {}", quantity.unit).trim_end().to_string()
}

/// A human-readable summary of a calculation result
pub fn format_report(result: &CalculationResult, decimal_places: usize) -> String {
    let quantities = result.quantities();
    let width = quantities.iter().map(|q| q.name.len()).max().unwrap_or(0);

    let mut out = format!("Formula set: {}\n", result.formula_set());
    for quantity in &quantities {
        writeln!(
            &mut out,
            "  {:<width$}  {}",
            quantity.name,
            format_quantity(quantity, decimal_places)
        )
        .unwrap();
    }

    let rating = result.roi_ratio().rating();
    write!(&mut out, "ROI rating: {rating}").unwrap();
    if rating == RoiRating::Bad {
        write!(&mut out, " (transport emits more than is captured)").unwrap();
    }

    out
}

/// A human-readable table of the results of a parameter sweep
pub fn format_sweep(
    parameter: SweepParameter,
    points: &[SweepPoint],
    decimal_places: usize,
) -> String {
    let name = parameter.to_string();
    let mut out = format!(
        "{name:>24}  {:>10}  {:>12}  {:>12}  {:>10}  rating\n",
        "cartridges", "captured", "emitted", "roi"
    );
    for point in points {
        let result = &point.result;
        writeln!(
            &mut out,
            "{:>24}  {:>10}  {:>12.*}  {:>12.*}  {:>10.*}  {}",
            point.value,
            result.actual_number_of_cartridges,
            decimal_places,
            result.total_carbon_captured.value(),
            decimal_places,
            result.total_carbon_emissions.value(),
            decimal_places,
            result.roi_ratio,
            result.roi_ratio.rating()
        )
        .unwrap();
    }

    out
}

/// A human-readable table of vehicle profiles
pub fn format_vehicles(vehicles: &VehicleProfileMap) -> String {
    let width = vehicles.keys().map(String::len).max().unwrap_or(0);
    let mut out = format!(
        "{:<width$}  {:>8}  {:>12}  {:>12}  {:>16}  {:>12}\n",
        "name", "fuel", "unloaded", "loaded", "emission factor", "max payload"
    );
    for (name, vehicle) in vehicles {
        let unit = vehicle.fuel_type.unit();
        let unloaded = format!("{} mi/{unit}", vehicle.unloaded_efficiency);
        let loaded = format!("{} mi/{unit}", vehicle.loaded_efficiency);
        let emission_factor = format!("{} kg/{unit}", vehicle.emission_factor);
        let max_payload = format!("{} kg", vehicle.max_payload_capacity);
        writeln!(
            &mut out,
            "{name:<width$}  {:>8}  {unloaded:>12}  {loaded:>12}  {emission_factor:>16}  \
            {max_payload:>12}",
            vehicle.fuel_type.to_string(),
        )
        .unwrap();
    }

    out
}
