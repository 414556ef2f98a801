//! Common routines for handling input data.
use crate::scenario::Scenario;
use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read a scenario from a TOML file and check that its parameters are valid.
///
/// Parameters missing from the file take their default values for the selected formula set.
///
/// # Arguments
///
/// * `file_path` - Path to the scenario file
///
/// # Returns
///
/// The scenario or an error if the file is invalid
pub fn load_scenario(file_path: &Path) -> Result<Scenario> {
    let scenario: Scenario = read_toml(file_path)?;
    scenario
        .validate()
        .with_context(|| input_err_msg(file_path))?;
    debug!(
        "Read {} scenario from {}",
        scenario.formula_set(),
        file_path.display()
    );

    Ok(scenario)
}
