//! Scenario parameters for each of the calculator's formula sets.
//!
//! A scenario is never modified by a calculation. Callers wanting to explore a different set of
//! inputs build a new scenario and recalculate.
use crate::calculator::{CalculationError, FormulaSet};
use crate::units::{Dimensionless, Distance, Mass};
use crate::vehicle::DEFAULT_VEHICLE_TYPE;
use serde::{Deserialize, Serialize};

/// Parameters for the [`FormulaSet::Saturation`] calculation.
///
/// The number of cartridges collected is derived from how many fully saturated cartridges the
/// vehicle could carry and how full the recovery trip is. Defaults describe a gasoline truck
/// making 50 mile trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaturationScenario {
    /// The name of the vehicle used for both trips
    pub vehicle_type: String,
    /// The maximum payload the vehicle can legally and safely carry
    pub max_vehicle_payload: Mass,
    /// How full the recovery trip is, as a fraction of the maximum number of cartridges
    pub recovery_truck_load: Dimensionless,
    /// Average fullness of reclaimed cartridges, as a fraction of their maximum capacity
    pub avg_cartridge_saturation: Dimensionless,
    /// Mass of fresh sorbent required per unit mass of captured carbon
    pub sorbent_to_carbon_ratio: Dimensionless,
    /// Packaging weight as a fraction of the fresh sorbent's weight
    pub packaging_fraction: Dimensionless,
    /// Weight of a single cartridge when fully saturated
    pub full_cartridge_weight: Mass,
    /// Weight of a single empty cartridge
    pub base_cartridge_weight: Mass,
    /// Best-case fraction of a saturated cartridge's contents which is elemental carbon
    pub max_carbon_ratio: Dimensionless,
    /// Round-trip distance of the recovery trip
    pub recovery_distance: Distance,
    /// Round-trip distance of the distribution trip
    pub distribution_distance: Distance,
}

impl Default for SaturationScenario {
    fn default() -> Self {
        Self {
            vehicle_type: DEFAULT_VEHICLE_TYPE.to_string(),
            max_vehicle_payload: Mass(1814.0),
            recovery_truck_load: Dimensionless(0.75),
            avg_cartridge_saturation: Dimensionless(0.85),
            sorbent_to_carbon_ratio: Dimensionless(3.3),
            packaging_fraction: Dimensionless(0.10),
            full_cartridge_weight: Mass(10.0),
            base_cartridge_weight: Mass(1.0),
            max_carbon_ratio: Dimensionless(0.14),
            recovery_distance: Distance(50.0),
            distribution_distance: Distance(50.0),
        }
    }
}

impl SaturationScenario {
    /// Check that every parameter lies within its domain
    pub fn validate(&self) -> Result<(), CalculationError> {
        check_non_negative("max_vehicle_payload", self.max_vehicle_payload.value())?;
        check_proportion("recovery_truck_load", self.recovery_truck_load.value())?;
        check_proportion("avg_cartridge_saturation", self.avg_cartridge_saturation.value())?;
        check_non_negative("sorbent_to_carbon_ratio", self.sorbent_to_carbon_ratio.value())?;
        check_proportion("packaging_fraction", self.packaging_fraction.value())?;
        check_positive("full_cartridge_weight", self.full_cartridge_weight.value())?;
        check_non_negative("base_cartridge_weight", self.base_cartridge_weight.value())?;
        check_proportion("max_carbon_ratio", self.max_carbon_ratio.value())?;
        check_non_negative("recovery_distance", self.recovery_distance.value())?;
        check_non_negative("distribution_distance", self.distribution_distance.value())?;

        if self.base_cartridge_weight > self.full_cartridge_weight {
            return Err(CalculationError::InvalidInput(format!(
                "base_cartridge_weight ({}) cannot exceed full_cartridge_weight ({})",
                self.base_cartridge_weight, self.full_cartridge_weight
            )));
        }

        Ok(())
    }
}

/// Parameters for the [`FormulaSet::MassFraction`] calculation.
///
/// The number of cartridges is given directly and each cartridge's material is split between
/// carbon and sorbent according to a fixed mass ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassFractionScenario {
    /// The name of the vehicle used for both trips
    pub vehicle_type: String,
    /// Round-trip distance of both the recovery and distribution trips
    pub distance: Distance,
    /// Number of cartridges collected
    pub num_cartridges: u32,
    /// Weight of the material held in a single cartridge
    pub material_weight: Mass,
    /// Weight of a single empty cartridge
    pub cartridge_weight: Mass,
    /// Mass of carbon per unit mass of the remaining material
    pub carbon_material_ratio: Dimensionless,
    /// Mass of fresh sorbent required per unit mass of captured carbon
    pub sorbent_carbon_ratio: Dimensionless,
    /// Packaging weight as a fraction of the fresh sorbent's weight
    pub packaging_fraction: Dimensionless,
}

impl Default for MassFractionScenario {
    fn default() -> Self {
        Self {
            vehicle_type: "Electric Van".to_string(),
            distance: Distance(40.0),
            num_cartridges: 75,
            material_weight: Mass(8.0),
            cartridge_weight: Mass(1.0),
            carbon_material_ratio: Dimensionless(0.17),
            sorbent_carbon_ratio: Dimensionless(3.3),
            packaging_fraction: Dimensionless(0.10),
        }
    }
}

impl MassFractionScenario {
    /// Check that every parameter lies within its domain
    pub fn validate(&self) -> Result<(), CalculationError> {
        check_non_negative("distance", self.distance.value())?;
        check_non_negative("material_weight", self.material_weight.value())?;
        check_non_negative("cartridge_weight", self.cartridge_weight.value())?;
        check_non_negative("carbon_material_ratio", self.carbon_material_ratio.value())?;
        check_non_negative("sorbent_carbon_ratio", self.sorbent_carbon_ratio.value())?;
        check_proportion("packaging_fraction", self.packaging_fraction.value())?;

        Ok(())
    }
}

/// A scenario for one of the calculator's formula sets.
///
/// In scenario files, the formula set is selected with the `formula_set` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "formula_set", rename_all = "snake_case")]
pub enum Scenario {
    /// Cartridge count derived from vehicle payload, with saturation-based carbon content
    Saturation(SaturationScenario),
    /// Fixed cartridge count, with a mass-fraction split of carbon content
    MassFraction(MassFractionScenario),
}

impl Scenario {
    /// The formula set used to calculate this scenario
    pub fn formula_set(&self) -> FormulaSet {
        match self {
            Self::Saturation(_) => FormulaSet::Saturation,
            Self::MassFraction(_) => FormulaSet::MassFraction,
        }
    }

    /// The name of the vehicle used in this scenario
    pub fn vehicle_type(&self) -> &str {
        match self {
            Self::Saturation(params) => &params.vehicle_type,
            Self::MassFraction(params) => &params.vehicle_type,
        }
    }

    /// Check that every parameter lies within its domain
    pub fn validate(&self) -> Result<(), CalculationError> {
        match self {
            Self::Saturation(params) => params.validate(),
            Self::MassFraction(params) => params.validate(),
        }
    }
}

impl From<FormulaSet> for Scenario {
    /// The default scenario for the given formula set
    fn from(formula_set: FormulaSet) -> Self {
        match formula_set {
            FormulaSet::Saturation => Self::Saturation(SaturationScenario::default()),
            FormulaSet::MassFraction => Self::MassFraction(MassFractionScenario::default()),
        }
    }
}

/// Check that a parameter is a finite number which is not negative
fn check_non_negative(name: &str, value: f64) -> Result<(), CalculationError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(CalculationError::InvalidInput(format!(
            "{name} must be a finite, non-negative number (got {value})"
        )));
    }

    Ok(())
}

/// Check that a parameter is a finite number greater than zero
fn check_positive(name: &str, value: f64) -> Result<(), CalculationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(CalculationError::InvalidInput(format!(
            "{name} must be a finite number greater than zero (got {value})"
        )));
    }

    Ok(())
}

/// Check that a parameter is between 0 and 1 (inclusive)
fn check_proportion(name: &str, value: f64) -> Result<(), CalculationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CalculationError::InvalidInput(format!(
            "{name} must be between 0 and 1 (got {value})"
        )));
    }

    Ok(())
}
