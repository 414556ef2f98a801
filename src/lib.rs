//! Common functionality for carbon-roi, a calculator for the carbon return on investment of
//! cartridge-based direct air capture logistics.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod calculator;
pub mod cli;
pub mod emissions;
pub mod input;
pub mod log;
pub mod output;
pub mod scenario;
pub mod settings;
pub mod sweep;
pub mod units;
pub mod vehicle;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program
pub fn get_carbon_roi_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir, so use the current directory
        return PathBuf::default();
    };
    config_dir.push("carbon-roi");

    config_dir
}
